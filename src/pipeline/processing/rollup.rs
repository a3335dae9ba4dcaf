use std::collections::BTreeMap;
use std::collections::BTreeSet;

use chrono::NaiveDateTime;

use crate::domain::{CompanySummary, ContactRecord};

/// Working aggregate for one (company, domain) group.
#[derive(Debug, Default)]
struct CompanyAggregate {
    country: String,
    unique_contacts: BTreeSet<String>,
    total_messages: u64,
    last_sent_at: Option<NaiveDateTime>,
}

/// Groups finalized contacts into per-organization summary rows.
///
/// The key is (company, domain), not company alone: two clients that both
/// prettify to "Acme Corp" under different domains stay separate rows.
/// Output is sorted by company then domain.
pub fn rollup(contacts: &[ContactRecord]) -> Vec<CompanySummary> {
    let mut groups: BTreeMap<(String, String), CompanyAggregate> = BTreeMap::new();

    for contact in contacts {
        let key = (contact.company.clone(), contact.domain.clone());
        let group = groups.entry(key).or_default();
        group.unique_contacts.insert(contact.address.clone());
        group.total_messages += contact.messages;
        if group.country.is_empty() && !contact.country.is_empty() {
            group.country = contact.country.clone();
        }
        if let Some(sent_at) = contact.last_sent_at {
            if group.last_sent_at.map_or(true, |prev| sent_at > prev) {
                group.last_sent_at = Some(sent_at);
            }
        }
    }

    groups
        .into_iter()
        .map(|((company, domain), group)| CompanySummary {
            company,
            domain,
            country: group.country,
            unique_contacts: group.unique_contacts.len(),
            total_messages: group.total_messages,
            last_sent_at: group.last_sent_at,
        })
        .collect()
}
