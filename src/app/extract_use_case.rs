use anyhow::Result;
use chrono::NaiveDateTime;
use std::sync::Arc;
use tracing::info;

use crate::app::ports::ContactSink;
use crate::config::PipelineConfig;
use crate::domain::RawRow;
use crate::pipeline::{ContactPipeline, PipelineStats};

/// Use case running one full extraction over a row batch and handing the
/// three tables to the output port.
pub struct ExtractContactsUseCase {
    pipeline: ContactPipeline,
    sink: Arc<dyn ContactSink>,
}

impl ExtractContactsUseCase {
    pub fn new(config: PipelineConfig, sink: Arc<dyn ContactSink>) -> Self {
        Self {
            pipeline: ContactPipeline::new(config),
            sink,
        }
    }

    /// Runs the pipeline and writes all three tables. Returns the run
    /// counters for the caller's summary.
    pub async fn run(&self, rows: &[RawRow], now: NaiveDateTime) -> Result<PipelineStats> {
        let output = self.pipeline.run(rows, now);

        self.sink.write_contacts(&output.contacts).await?;
        self.sink.write_companies(&output.companies).await?;
        self.sink.write_excluded(&output.excluded).await?;

        info!(
            contacts = output.stats.unique_contacts,
            companies = output.stats.companies,
            excluded = output.stats.excluded,
            "Extraction output written"
        );
        Ok(output.stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CompanySummary, ContactRecord, ExclusionRecord};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockContactSink {
        contacts: Mutex<Vec<ContactRecord>>,
        companies: Mutex<Vec<CompanySummary>>,
        excluded: Mutex<Vec<ExclusionRecord>>,
    }

    #[async_trait]
    impl ContactSink for MockContactSink {
        async fn write_contacts(&self, contacts: &[ContactRecord]) -> Result<()> {
            self.contacts.lock().unwrap().extend_from_slice(contacts);
            Ok(())
        }

        async fn write_companies(&self, companies: &[CompanySummary]) -> Result<()> {
            self.companies.lock().unwrap().extend_from_slice(companies);
            Ok(())
        }

        async fn write_excluded(&self, excluded: &[ExclusionRecord]) -> Result<()> {
            self.excluded.lock().unwrap().extend_from_slice(excluded);
            Ok(())
        }
    }

    fn row(cells: &[(&str, &str)]) -> RawRow {
        RawRow::new(
            cells
                .iter()
                .map(|(c, v)| (c.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[tokio::test]
    async fn writes_all_three_tables_through_the_sink() {
        let sink = Arc::new(MockContactSink::default());
        let config = PipelineConfig {
            date_column: Some("Sent".to_string()),
            ..PipelineConfig::default()
        };
        let use_case = ExtractContactsUseCase::new(config, sink.clone());

        let rows = vec![
            row(&[
                ("To", "maria.perez@acme-corp.com.mx"),
                ("Sent", "2024-05-20 10:00:00"),
                ("Subject", "Propuesta"),
            ]),
            row(&[("To", "ventas@acme.com"), ("Sent", "2024-05-21 10:00:00")]),
        ];
        let now = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();

        let stats = use_case.run(&rows, now).await.unwrap();

        assert_eq!(stats.unique_contacts, 1);
        assert_eq!(stats.excluded, 1);
        assert_eq!(sink.contacts.lock().unwrap().len(), 1);
        assert_eq!(sink.companies.lock().unwrap().len(), 1);
        assert_eq!(sink.excluded.lock().unwrap().len(), 1);
    }
}
