use std::collections::BTreeSet;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One input record: an ordered mapping from column name to cell text.
/// All values are treated as text; missing cells are empty strings.
#[derive(Debug, Clone, Default)]
pub struct RawRow {
    cells: Vec<(String, String)>,
}

impl RawRow {
    pub fn new(cells: Vec<(String, String)>) -> Self {
        Self { cells }
    }

    /// Look up a cell by exact column name.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    /// Iterate cells in input column order.
    pub fn cells(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cells.iter().map(|(c, v)| (c.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// An address harvested from one row, paired with its row context.
/// Lives only for the duration of one pipeline pass.
#[derive(Debug, Clone)]
pub struct CandidateAddress {
    /// Lowercased email address
    pub address: String,
    /// Columns of the source row where the address was seen
    pub source_columns: BTreeSet<String>,
    /// Zero-based index of the source row
    pub row_index: usize,
    /// Parsed sent timestamp of the source row, if any
    pub sent_at: Option<NaiveDateTime>,
    /// Subject text of the source row
    pub subject: String,
}

/// Recency label for a merged contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecencyLabel {
    /// Activity inside the lookback window
    Recent,
    /// No activity inside the window, or no timestamp at all
    FollowUp,
}

impl RecencyLabel {
    /// Label text as it appears in the exported tables.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecencyLabel::Recent => "Cliente reciente",
            RecencyLabel::FollowUp => "Cliente para seguimiento",
        }
    }
}

impl std::fmt::Display for RecencyLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A finalized, deduplicated contact as it lands in the Contacts table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactRecord {
    /// Lowercased email address, unique across the run
    pub address: String,
    pub first_name: String,
    pub last_name: String,
    /// Lowercased domain part of the address
    pub domain: String,
    /// Company label derived from the domain
    pub company: String,
    /// Country derived from the domain's ccTLD, empty when unmapped
    pub country: String,
    /// Latest sent timestamp seen for this address
    pub last_sent_at: Option<NaiveDateTime>,
    /// Subject of the row bearing the latest timestamp
    pub last_subject: String,
    /// Recency classification relative to the lookback window
    pub status: RecencyLabel,
    /// Sorted union of all columns this address was seen in
    pub source_columns: Vec<String>,
    /// Number of rows this address was seen in
    pub messages: u64,
}

/// Per-(company, domain) rollup row for the Companies table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanySummary {
    pub company: String,
    pub domain: String,
    /// First non-empty country observed among member contacts
    pub country: String,
    /// Number of distinct member addresses
    pub unique_contacts: usize,
    /// Total messages across member contacts
    pub total_messages: u64,
    /// Latest sent timestamp across member contacts
    pub last_sent_at: Option<NaiveDateTime>,
}

/// Terminal record for an address dropped by the exclusion filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExclusionRecord {
    /// Lowercased email address
    pub address: String,
    /// Which rule set dropped it
    pub reason: String,
    /// One-based source row number
    pub source_row: usize,
    /// Sorted columns the address was seen in
    pub source_columns: Vec<String>,
}

/// Formats an optional timestamp the way the exported tables expect it.
pub fn format_sent_at(sent_at: &Option<NaiveDateTime>) -> String {
    sent_at
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}
