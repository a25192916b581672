use serde::Serialize;
use serde_json::{json, Value};

use crate::output::{OutputHandler, TransferSummary};
use crate::report::{Completed, Failure, Report};

/// The single JSON document written to stdout per run. Object keys come out
/// sorted because `serde_json::Map` is ordered by key.
#[derive(Debug, Serialize)]
struct Envelope<'a> {
    command: &'a str,
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<&'a Report>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a Failure>,
    warnings: &'a [String],
}

pub(crate) fn success_json(done: &Completed) -> serde_json::Result<Value> {
    serde_json::to_value(Envelope {
        command: done.command,
        ok: true,
        report: Some(&done.report),
        error: None,
        warnings: &done.warnings,
    })
}

pub(crate) fn failure_json(command: &str, failure: &Failure) -> serde_json::Result<Value> {
    serde_json::to_value(Envelope {
        command,
        ok: false,
        report: None,
        error: Some(failure),
        warnings: &[],
    })
}

fn emit(command: &str, rendered: serde_json::Result<Value>) {
    let value = rendered.unwrap_or_else(|err| {
        json!({
            "command": command,
            "ok": false,
            "error": { "code": 9999, "name": "INTERNAL_ERROR", "message": format!("serialization failed: {err}") },
            "warnings": [],
        })
    });
    println!("{value:#}");
}

/// Machine-readable output: nothing but the final document reaches stdout.
#[derive(Debug, Default)]
pub struct AgentOutputHandler;

impl OutputHandler for AgentOutputHandler {
    fn start_operation(&mut self, _operation: &str) {}

    fn progress(&mut self, _message: &str) {}

    fn display_transfer_summary(&mut self, _summary: &TransferSummary) {}

    fn display_validation_errors(&mut self, _errors: &[String]) {}

    fn succeeded(&mut self, done: &Completed) {
        emit(done.command, success_json(done));
    }

    fn failed(&mut self, command: &str, failure: &Failure) {
        emit(command, failure_json(command, failure));
    }
}

#[cfg(test)]
mod tests {
    use crate::report::{FormattedAmount, Report};

    use super::*;

    fn formatted() -> Completed {
        Completed {
            command: "format",
            headline: "1.23".to_string(),
            report: Report::Formatted(FormattedAmount {
                base_units: "1234567".to_string(),
                decimals: 6,
                formatted: "1.23".to_string(),
            }),
            warnings: vec!["warning: unsafe mode".to_string()],
        }
    }

    #[test]
    fn success_carries_report_and_warnings() {
        let value = success_json(&formatted()).unwrap();
        assert_eq!(value["ok"], true);
        assert_eq!(value["command"], "format");
        assert_eq!(value["report"]["baseUnits"], "1234567");
        assert_eq!(value["warnings"][0], "warning: unsafe mode");
        assert!(value.get("error").is_none());
    }

    #[test]
    fn keys_render_in_sorted_order() {
        let rendered = format!("{:#}", success_json(&formatted()).unwrap());
        let command = rendered.find("\"command\"").unwrap();
        let ok = rendered.find("\"ok\"").unwrap();
        let report = rendered.find("\"report\"").unwrap();
        let warnings = rendered.find("\"warnings\"").unwrap();
        assert!(command < ok && ok < report && report < warnings);
        assert!(rendered.find("\"baseUnits\"").unwrap() < rendered.find("\"formatted\"").unwrap());
    }

    #[test]
    fn failure_keeps_code_and_name() {
        let failure = Failure {
            code: 1003,
            name: "INVALID_RECIPIENT",
            message: "invalid recipient address at position 2".to_string(),
            raw: None,
        };
        let value = failure_json("validate", &failure).unwrap();
        assert_eq!(value["ok"], false);
        assert_eq!(value["error"]["code"], 1003);
        assert_eq!(value["error"]["name"], "INVALID_RECIPIENT");
        assert!(value["error"].get("raw").is_none());
        assert!(value.get("report").is_none());
    }

    #[test]
    fn never_reads_from_the_terminal() {
        let source = include_str!("agent.rs");
        assert!(!source.contains(&["std", "in"].concat()));
        assert!(!source.contains(&["read", "_line"].concat()));
    }
}
