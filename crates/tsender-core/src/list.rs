use serde::{Deserialize, Serialize};

/// Split free text on any run of commas and newlines into trimmed,
/// non-empty tokens, preserving order, duplicates and case.
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split([',', '\n'])
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// One side of the form: free text or cells that are already positional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntryList {
    /// Typed or pasted text, split with [`parse_list`].
    Text(String),
    /// One cell per row, as read from a CSV file. Blank cells keep their
    /// position so validation reports the row they came from.
    Rows(Vec<String>),
}

impl EntryList {
    pub fn entries(&self) -> Vec<String> {
        match self {
            Self::Text(raw) => parse_list(raw),
            Self::Rows(cells) => cells.iter().map(|cell| cell.trim().to_owned()).collect(),
        }
    }
}

impl Default for EntryList {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl From<String> for EntryList {
    fn from(raw: String) -> Self {
        Self::Text(raw)
    }
}

impl From<&str> for EntryList {
    fn from(raw: &str) -> Self {
        Self::Text(raw.to_owned())
    }
}

impl From<Vec<String>> for EntryList {
    fn from(cells: Vec<String>) -> Self {
        Self::Rows(cells)
    }
}
