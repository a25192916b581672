//! Recipient/amount pairs from a CSV file, as an alternative to pasting two
//! separate lists. Rows stay positional: the cells reach validation as
//! [`EntryList::Rows`] and are never re-split on commas.

use csv::{ReaderBuilder, StringRecord};

use crate::error::{TaxonomyCode, TsenderError};
use crate::list::EntryList;

const MAX_FILE_SIZE_BYTES: usize = 10 * 1024 * 1024;
const MAX_ROWS: usize = 10_000;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvLists {
    pub recipients: Vec<String>,
    pub amounts: Vec<String>,
}

impl CsvLists {
    pub fn into_entries(self) -> (EntryList, EntryList) {
        (EntryList::Rows(self.recipients), EntryList::Rows(self.amounts))
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct HeaderIndexes {
    address: Option<usize>,
    amount: Option<usize>,
}

pub fn parse_csv(input: &[u8]) -> Result<CsvLists, TsenderError> {
    if input.len() > MAX_FILE_SIZE_BYTES {
        return Err(TsenderError::taxonomy(
            TaxonomyCode::Validation1011,
            format!("CSV input exceeds maximum file size of {MAX_FILE_SIZE_BYTES} bytes"),
        ));
    }

    let normalized = strip_utf8_bom(input);
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(normalized);

    let headers = reader
        .headers()
        .map_err(|err| {
            TsenderError::taxonomy(
                TaxonomyCode::Validation1009,
                format!("failed reading CSV headers: {err}"),
            )
        })?
        .clone();
    let indexes = parse_headers(&headers)?;

    let mut lists = CsvLists::default();
    for (record_idx, record_result) in reader.records().enumerate() {
        let row_number = record_idx + 1;
        if row_number > MAX_ROWS {
            return Err(TsenderError::taxonomy(
                TaxonomyCode::Validation1011,
                format!("CSV has more than {MAX_ROWS} data rows"),
            ));
        }

        let record = record_result.map_err(|err| {
            TsenderError::taxonomy(
                TaxonomyCode::Validation1009,
                format!("failed parsing CSV row {}: {err}", row_number + 1),
            )
        })?;
        check_formula_injection(&record, row_number + 1, Some(&headers))?;

        let address = cell(&record, indexes.address);
        let amount = cell(&record, indexes.amount);
        if address.is_empty() && amount.is_empty() {
            continue;
        }
        lists.recipients.push(address);
        lists.amounts.push(amount);
    }

    tracing::debug!(
        recipients = lists.recipients.len(),
        amounts = lists.amounts.len(),
        "parsed CSV input"
    );
    Ok(lists)
}

fn parse_headers(headers: &StringRecord) -> Result<HeaderIndexes, TsenderError> {
    let mut indexes = HeaderIndexes::default();

    check_formula_injection(headers, 1, None)?;

    for (idx, header) in headers.iter().enumerate() {
        let normalized = header.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "address" | "recipient" | "to" => {
                indexes.address.get_or_insert(idx);
            }
            "amount" | "value" | "wei" => {
                indexes.amount.get_or_insert(idx);
            }
            _ => {}
        }
    }

    if indexes.address.is_none() {
        return Err(TsenderError::taxonomy(
            TaxonomyCode::Validation1012,
            "missing required CSV column: address|recipient|to",
        ));
    }
    if indexes.amount.is_none() {
        return Err(TsenderError::taxonomy(
            TaxonomyCode::Validation1012,
            "missing required CSV column: amount|value|wei",
        ));
    }

    Ok(indexes)
}

fn check_formula_injection(
    record: &StringRecord,
    row_number: usize,
    headers: Option<&StringRecord>,
) -> Result<(), TsenderError> {
    for (idx, cell) in record.iter().enumerate() {
        if has_formula_prefix(cell) {
            let column = headers
                .and_then(|h| h.get(idx))
                .map(ToOwned::to_owned)
                .unwrap_or_else(|| format!("column#{}", idx + 1));
            return Err(TsenderError::taxonomy(
                TaxonomyCode::Validation1010,
                format!("formula injection detected at row {row_number}, column {column}"),
            ));
        }
    }
    Ok(())
}

fn has_formula_prefix(value: &str) -> bool {
    matches!(
        value.chars().next(),
        Some('=') | Some('+') | Some('-') | Some('@') | Some('\t') | Some('\r')
    )
}

fn cell(record: &StringRecord, idx: Option<usize>) -> String {
    idx.and_then(|i| record.get(i))
        .map(|value| value.trim().to_string())
        .unwrap_or_default()
}

fn strip_utf8_bom(input: &[u8]) -> &[u8] {
    input.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::types::{ContractMode, SubmissionForm, SubmissionRequest};
    use crate::validation::validate_submission;

    const ALICE: &str = "0xAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA0001";
    const BOB: &str = "0xAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA0002";

    #[test]
    fn parses_address_amount_pairs() {
        let csv = format!("address,amount\n{ALICE},1.5\n{BOB},2\n");
        let lists = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(lists.recipients, vec![ALICE, BOB]);
        assert_eq!(lists.amounts, vec!["1.5", "2"]);
    }

    #[test]
    fn accepts_header_aliases_and_bom() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(format!("Recipient,Wei,note\r\n{ALICE},100,hi\r\n").as_bytes());
        let lists = parse_csv(&bytes).unwrap();
        assert_eq!(lists.recipients, vec![ALICE]);
        assert_eq!(lists.amounts, vec!["100"]);
    }

    #[test]
    fn skips_blank_rows_but_keeps_half_rows_in_place() {
        let csv = format!("to,value\n{ALICE},1\n,\n{BOB},\n");
        let lists = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(lists.recipients, vec![ALICE, BOB]);
        assert_eq!(lists.amounts, vec!["1", ""]);
    }

    fn validate_csv(csv: &str) -> Result<SubmissionRequest, ValidationError> {
        let (recipients, amounts) = parse_csv(csv.as_bytes()).unwrap().into_entries();
        validate_submission(&SubmissionForm {
            token_address: "0x1111111111111111111111111111111111111111".to_string(),
            recipients,
            amounts,
            decimals: Some(0),
            account: Some("0x9999999999999999999999999999999999999999".to_string()),
            chain_id: 1,
            mode: ContractMode::Standard,
        })
    }

    #[test]
    fn half_filled_rows_never_shift_later_pairs() {
        let err = validate_csv(&format!("address,amount\n{ALICE},\n,5\n{BOB},7\n")).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidRecipient {
                index: 1,
                address: String::new()
            }
        );

        let err = validate_csv(&format!("address,amount\n{ALICE},\n{BOB},7\n")).unwrap_err();
        assert_eq!(err, ValidationError::EmptyAmountValue { index: 0 });
    }

    #[test]
    fn quoted_cell_with_comma_stays_one_amount() {
        let csv = format!("address,amount\n{ALICE},\"1,000\"\n{BOB},\n");
        let lists = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(lists.amounts, vec!["1,000", ""]);

        let csv = format!("address,amount\n{ALICE},\"1,000\"\n{BOB},2\n");
        assert!(matches!(
            validate_csv(&csv),
            Err(ValidationError::UnparsableAmount { index: 0, .. })
        ));
    }

    #[test]
    fn complete_rows_validate_in_order() {
        let request = validate_csv(&format!("address,amount\n{ALICE},3\n{BOB},7\n")).unwrap();
        assert_eq!(request.recipients(), &[ALICE.to_string(), BOB.to_string()]);
        assert_eq!(request.total().to_string(), "10");
    }

    #[test]
    fn rejects_missing_amount_column() {
        let csv = format!("address,memo\n{ALICE},hello\n");
        let err = parse_csv(csv.as_bytes()).unwrap_err();
        assert_eq!(err.code(), TaxonomyCode::Validation1012);
    }

    #[test]
    fn rejects_formula_injection() {
        let csv = format!("address,amount\n{ALICE},=1+1\n");
        let err = parse_csv(csv.as_bytes()).unwrap_err();
        assert_eq!(err.code(), TaxonomyCode::Validation1010);
        assert!(err.to_string().contains("row 2"));
    }

    #[test]
    fn rejects_oversized_input() {
        let oversized = vec![b'a'; MAX_FILE_SIZE_BYTES + 1];
        let err = parse_csv(&oversized).unwrap_err();
        assert_eq!(err.code(), TaxonomyCode::Validation1011);
    }
}
