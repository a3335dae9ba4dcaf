use chrono::{Duration, NaiveDateTime};

use crate::domain::RecencyLabel;

/// Labels a contact against the lookback window. The cutoff uses a fixed
/// 30-day month approximation, not calendar months, and the boundary is
/// inclusive: a contact last seen exactly at the cutoff is recent. No
/// timestamp always means follow-up.
pub fn classify(
    last_sent_at: Option<NaiveDateTime>,
    lookback_months: u32,
    now: NaiveDateTime,
) -> RecencyLabel {
    let cutoff = now - Duration::days(30 * i64::from(lookback_months));
    match last_sent_at {
        Some(sent_at) if sent_at >= cutoff => RecencyLabel::Recent,
        _ => RecencyLabel::FollowUp,
    }
}
