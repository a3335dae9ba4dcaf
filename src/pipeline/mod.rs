// Extraction-normalization-aggregation pipeline: harvest, parse, filter,
// classify, merge, then finalize into the three output tables.

pub mod processing;

use chrono::NaiveDateTime;
use tracing::{debug, info, warn};

use crate::config::{PipelineConfig, SUBJECT_COLUMN_CANDIDATES};
use crate::domain::{CandidateAddress, CompanySummary, ContactRecord, ExclusionRecord, RawRow, RecencyLabel};
use crate::pipeline::processing::classify::IdentityClassifier;
use crate::pipeline::processing::dates::DateParser;
use crate::pipeline::processing::exclusion::ExclusionFilter;
use crate::pipeline::processing::harvest::AddressHarvester;
use crate::pipeline::processing::merge::ContactTable;
use crate::pipeline::processing::{recency, rollup};

/// The three derived tables plus run counters.
#[derive(Debug)]
pub struct PipelineOutput {
    pub contacts: Vec<ContactRecord>,
    pub companies: Vec<CompanySummary>,
    pub excluded: Vec<ExclusionRecord>,
    pub stats: PipelineStats,
}

/// Counters for the run summary.
#[derive(Debug, Default, Clone)]
pub struct PipelineStats {
    pub rows_processed: usize,
    /// Address sightings across all rows, kept and excluded
    pub addresses_harvested: usize,
    pub excluded: usize,
    pub unique_contacts: usize,
    pub recent: usize,
    pub follow_up: usize,
    pub companies: usize,
}

/// One batch run over an in-memory row sequence. All mutable state is
/// local to `run`; a fresh pipeline per invocation shares nothing.
pub struct ContactPipeline {
    config: PipelineConfig,
    harvester: AddressHarvester,
    date_parser: DateParser,
    classifier: IdentityClassifier,
    filter: ExclusionFilter,
}

impl ContactPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        let filter = ExclusionFilter::new(&config.exclusion);
        Self {
            config,
            harvester: AddressHarvester::new(),
            date_parser: DateParser::new(),
            classifier: IdentityClassifier::new(),
            filter,
        }
    }

    /// Processes every row and finalizes the contact, company, and
    /// exclusion tables. `now` anchors the recency window.
    pub fn run(&self, rows: &[RawRow], now: NaiveDateTime) -> PipelineOutput {
        info!(rows = rows.len(), "Starting contact extraction run");

        let mut table = ContactTable::new();
        let mut excluded: Vec<ExclusionRecord> = Vec::new();
        let mut addresses_harvested = 0usize;

        for (index, row) in rows.iter().enumerate() {
            let sent_at = self
                .config
                .date_column
                .as_deref()
                .and_then(|column| row.get(column))
                .and_then(|text| self.date_parser.parse(text));
            let subject = SUBJECT_COLUMN_CANDIDATES
                .iter()
                .find_map(|column| row.get(column).filter(|s| !s.is_empty()))
                .unwrap_or("")
                .to_string();

            for (address, source_columns) in self.harvester.harvest(row) {
                addresses_harvested += 1;

                // The harvester regex guarantees an '@'; this branch only
                // fires if that contract breaks.
                let Some((local_part, _)) = address.split_once('@') else {
                    warn!(address = %address, "Harvested address without '@', discarding");
                    continue;
                };

                if let Some(reason) = self.filter.evaluate(local_part) {
                    debug!(address = %address, reason = %reason, "Address excluded");
                    excluded.push(ExclusionRecord {
                        address,
                        reason: reason.to_string(),
                        source_row: index + 1,
                        source_columns: source_columns.into_iter().collect(),
                    });
                    continue;
                }

                let classification = self.classifier.classify(&address);
                let candidate = CandidateAddress {
                    address,
                    source_columns,
                    row_index: index,
                    sent_at,
                    subject: subject.clone(),
                };
                table.upsert(&candidate, classification);
            }
        }

        let lookback = self.config.lookback_months;
        let contacts: Vec<ContactRecord> = table
            .into_records()
            .into_iter()
            .map(|identity| {
                let status = recency::classify(identity.last_sent_at, lookback, now);
                ContactRecord {
                    address: identity.address,
                    first_name: identity.first_name,
                    last_name: identity.last_name,
                    domain: identity.domain,
                    company: identity.company,
                    country: identity.country,
                    last_sent_at: identity.last_sent_at,
                    last_subject: identity.last_subject,
                    status,
                    source_columns: identity.source_columns.into_iter().collect(),
                    messages: identity.messages,
                }
            })
            .collect();

        let companies = rollup::rollup(&contacts);

        let recent = contacts
            .iter()
            .filter(|c| c.status == RecencyLabel::Recent)
            .count();
        let stats = PipelineStats {
            rows_processed: rows.len(),
            addresses_harvested,
            excluded: excluded.len(),
            unique_contacts: contacts.len(),
            recent,
            follow_up: contacts.len() - recent,
            companies: companies.len(),
        };

        info!(
            contacts = stats.unique_contacts,
            companies = stats.companies,
            excluded = stats.excluded,
            "Contact extraction run finished"
        );

        PipelineOutput {
            contacts,
            companies,
            excluded,
            stats,
        }
    }
}
