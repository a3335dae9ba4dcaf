use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDateTime;

use crate::domain::CandidateAddress;
use crate::pipeline::processing::classify::Classification;

/// The mutable aggregate for one unique address while the run is in
/// flight. `domain` and `company` are fixed at creation; names and
/// country follow first-non-empty-wins; timestamp and subject follow
/// latest-strictly-greater-wins.
#[derive(Debug, Clone)]
pub struct ContactIdentity {
    pub address: String,
    pub first_name: String,
    pub last_name: String,
    pub domain: String,
    pub company: String,
    pub country: String,
    pub last_sent_at: Option<NaiveDateTime>,
    pub last_subject: String,
    pub source_columns: BTreeSet<String>,
    /// Number of sightings (rows) for this address
    pub messages: u64,
}

/// One record per unique lowercased address across all rows, in first-
/// sighting order.
#[derive(Debug, Default)]
pub struct ContactTable {
    records: HashMap<String, ContactIdentity>,
    order: Vec<String>,
}

impl ContactTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one sighting of an address. Creates the identity on first
    /// sight, otherwise merges under the field-level policy. Replaying an
    /// identical row changes only the sighting count.
    pub fn upsert(&mut self, candidate: &CandidateAddress, classification: Classification) {
        match self.records.get_mut(&candidate.address) {
            None => {
                let domain = candidate
                    .address
                    .split_once('@')
                    .map(|(_, d)| d.to_lowercase())
                    .unwrap_or_default();
                self.order.push(candidate.address.clone());
                self.records.insert(
                    candidate.address.clone(),
                    ContactIdentity {
                        address: candidate.address.clone(),
                        first_name: classification.first_name,
                        last_name: classification.last_name,
                        domain,
                        company: classification.company,
                        country: classification.country,
                        last_sent_at: candidate.sent_at,
                        last_subject: candidate.subject.clone(),
                        source_columns: candidate.source_columns.clone(),
                        messages: 1,
                    },
                );
            }
            Some(existing) => {
                existing.messages += 1;
                if let Some(sent_at) = candidate.sent_at {
                    if existing.last_sent_at.map_or(true, |prev| sent_at > prev) {
                        existing.last_sent_at = Some(sent_at);
                        existing.last_subject = candidate.subject.clone();
                    }
                }
                if existing.first_name.is_empty() && !classification.first_name.is_empty() {
                    existing.first_name = classification.first_name;
                }
                if existing.last_name.is_empty() && !classification.last_name.is_empty() {
                    existing.last_name = classification.last_name;
                }
                if existing.country.is_empty() && !classification.country.is_empty() {
                    existing.country = classification.country;
                }
                existing
                    .source_columns
                    .extend(candidate.source_columns.iter().cloned());
            }
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Consumes the table, yielding identities in first-sighting order.
    pub fn into_records(mut self) -> Vec<ContactIdentity> {
        self.order
            .iter()
            .filter_map(|address| self.records.remove(address))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn candidate(
        address: &str,
        columns: &[&str],
        sent_at: Option<NaiveDateTime>,
        subject: &str,
    ) -> CandidateAddress {
        CandidateAddress {
            address: address.to_string(),
            source_columns: columns.iter().map(|c| c.to_string()).collect(),
            row_index: 0,
            sent_at,
            subject: subject.to_string(),
        }
    }

    fn classification(first: &str, last: &str, company: &str, country: &str) -> Classification {
        Classification {
            first_name: first.to_string(),
            last_name: last.to_string(),
            company: company.to_string(),
            country: country.to_string(),
        }
    }

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn latest_timestamp_wins_and_carries_its_subject() {
        let mut table = ContactTable::new();
        let cls = || classification("Juan", "", "Startup", "");
        table.upsert(
            &candidate("juan@startup.io", &["To"], Some(at(10, 9)), "first"),
            cls(),
        );
        table.upsert(
            &candidate("juan@startup.io", &["To"], Some(at(12, 9)), "latest"),
            cls(),
        );
        // Older sighting must not roll the timestamp back
        table.upsert(
            &candidate("juan@startup.io", &["To"], Some(at(11, 9)), "middle"),
            cls(),
        );

        let records = table.into_records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].last_sent_at, Some(at(12, 9)));
        assert_eq!(records[0].last_subject, "latest");
        assert_eq!(records[0].messages, 3);
    }

    #[test]
    fn equal_timestamp_does_not_replace() {
        let mut table = ContactTable::new();
        let cls = || classification("Juan", "", "Startup", "");
        table.upsert(
            &candidate("juan@startup.io", &["To"], Some(at(10, 9)), "first"),
            cls(),
        );
        table.upsert(
            &candidate("juan@startup.io", &["To"], Some(at(10, 9)), "second"),
            cls(),
        );
        let records = table.into_records();
        assert_eq!(records[0].last_subject, "first");
    }

    #[test]
    fn names_and_country_backfill_from_empty_only() {
        let mut table = ContactTable::new();
        table.upsert(
            &candidate("x@acme.com", &["To"], None, ""),
            classification("", "", "Acme", ""),
        );
        table.upsert(
            &candidate("x@acme.com", &["To"], None, ""),
            classification("Ana", "Lopez", "Acme", "México"),
        );
        // A later, different guess never overwrites
        table.upsert(
            &candidate("x@acme.com", &["To"], None, ""),
            classification("Otra", "Cosa", "Acme", "Chile"),
        );

        let records = table.into_records();
        assert_eq!(records[0].first_name, "Ana");
        assert_eq!(records[0].last_name, "Lopez");
        assert_eq!(records[0].country, "México");
    }

    #[test]
    fn source_columns_grow_monotonically() {
        let mut table = ContactTable::new();
        let cls = || classification("Ana", "", "Acme", "");
        table.upsert(&candidate("x@acme.com", &["To"], None, ""), cls());
        table.upsert(&candidate("x@acme.com", &["CC", "Body"], None, ""), cls());

        let records = table.into_records();
        let columns: Vec<&str> = records[0].source_columns.iter().map(|s| s.as_str()).collect();
        assert_eq!(columns, vec!["Body", "CC", "To"]);
    }

    #[test]
    fn identity_fields_idempotent_under_replay() {
        let make = || candidate("x@acme.com", &["To"], Some(at(10, 9)), "s");
        let cls = || classification("Ana", "Lopez", "Acme", "México");

        let mut once = ContactTable::new();
        once.upsert(&make(), cls());
        let mut twice = ContactTable::new();
        twice.upsert(&make(), cls());
        twice.upsert(&make(), cls());

        let a = once.into_records().remove(0);
        let b = twice.into_records().remove(0);
        assert_eq!(a.first_name, b.first_name);
        assert_eq!(a.last_name, b.last_name);
        assert_eq!(a.company, b.company);
        assert_eq!(a.country, b.country);
        assert_eq!(a.last_sent_at, b.last_sent_at);
        assert_eq!(a.last_subject, b.last_subject);
        assert_eq!(a.source_columns, b.source_columns);
        // Counts are the one thing duplication is allowed to change
        assert_eq!(a.messages, 1);
        assert_eq!(b.messages, 2);
    }

    #[test]
    fn insertion_order_is_preserved() {
        let mut table = ContactTable::new();
        let cls = || Classification::default();
        table.upsert(&candidate("z@acme.com", &["To"], None, ""), cls());
        table.upsert(&candidate("a@acme.com", &["To"], None, ""), cls());
        let records = table.into_records();
        assert_eq!(records[0].address, "z@acme.com");
        assert_eq!(records[1].address, "a@acme.com");
    }
}
