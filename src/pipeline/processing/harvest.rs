use std::collections::{BTreeMap, BTreeSet};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::RawRow;

/// Matches email-like tokens anywhere inside free text. Legacy Exchange
/// entries without an "@" never match.
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}")
        .expect("email regex is valid")
});

/// Scans every cell of a row for email addresses.
///
/// Outlook exports scatter addresses across To/CC/BCC and display-name
/// columns, so no column is privileged: every cell is treated as raw text
/// and all matches are kept.
#[derive(Debug, Default)]
pub struct AddressHarvester;

impl AddressHarvester {
    pub fn new() -> Self {
        Self
    }

    /// Returns every address found in the row, lowercased, mapped to the
    /// set of columns it appeared in. A row with no matches yields an
    /// empty map; that is not a failure.
    pub fn harvest(&self, row: &RawRow) -> BTreeMap<String, BTreeSet<String>> {
        let mut found: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (column, value) in row.cells() {
            if value.is_empty() {
                continue;
            }
            for m in EMAIL_REGEX.find_iter(value) {
                let address = m.as_str().to_lowercase();
                found
                    .entry(address)
                    .or_default()
                    .insert(column.to_string());
            }
        }
        found
    }
}
