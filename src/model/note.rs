use std::collections::BTreeSet;

use serde::Deserialize;

/// One timestamped key-press event within a chart.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Note {
    /// Time in milliseconds from chart start.
    pub time: u64,
    /// Key identifier, e.g. "1Key7".
    pub key: String,
}

/// A parsed chart: a name plus the ordered note list.
///
/// Charts are read-only input; they are fully materialized before
/// scheduling begins, never streamed.
#[derive(Debug, Clone, Deserialize)]
pub struct Chart {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "songNotes")]
    pub notes: Vec<Note>,
}

impl Chart {
    /// Distinct key identifiers used by this chart, sorted.
    pub fn distinct_keys(&self) -> Vec<&str> {
        let keys: BTreeSet<&str> = self.notes.iter().map(|n| n.key.as_str()).collect();
        keys.into_iter().collect()
    }
}
