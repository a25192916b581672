use std::io::{self, IsTerminal};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Operator,
    Agent,
}

/// `--output json` always wins; `--interactive` forces operator output even
/// when stdout is piped. Otherwise a non-terminal stdout means an agent.
pub fn detect_mode(output_json: bool, interactive: bool) -> Mode {
    select_mode(output_json, interactive, io::stdout().is_terminal())
}

fn select_mode(output_json: bool, interactive: bool, stdout_is_terminal: bool) -> Mode {
    if output_json {
        Mode::Agent
    } else if interactive || stdout_is_terminal {
        Mode::Operator
    } else {
        Mode::Agent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_flag_selects_agent() {
        assert_eq!(select_mode(true, true, true), Mode::Agent);
    }

    #[test]
    fn interactive_overrides_piped_stdout() {
        assert_eq!(select_mode(false, true, false), Mode::Operator);
    }

    #[test]
    fn piped_stdout_defaults_to_agent() {
        assert_eq!(select_mode(false, false, false), Mode::Agent);
        assert_eq!(select_mode(false, false, true), Mode::Operator);
    }
}
