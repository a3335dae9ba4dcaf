use anyhow::Result;
use async_trait::async_trait;

use crate::domain::{CompanySummary, ContactRecord, ExclusionRecord};

/// Output port for the three derived tables. Implementations decide the
/// destination and format (CSV files, a workbook, a test buffer); the
/// pipeline never does.
#[async_trait]
pub trait ContactSink: Send + Sync {
    async fn write_contacts(&self, contacts: &[ContactRecord]) -> Result<()>;
    async fn write_companies(&self, companies: &[CompanySummary]) -> Result<()>;
    async fn write_excluded(&self, excluded: &[ExclusionRecord]) -> Result<()>;
}
