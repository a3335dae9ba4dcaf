use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

use crate::app::ports::ContactSink;
use crate::domain::{format_sent_at, CompanySummary, ContactRecord, ExclusionRecord};

pub const CONTACTS_FILE: &str = "contactos_limpios.csv";
pub const COMPANIES_FILE: &str = "empresas_resumen.csv";
pub const EXCLUDED_FILE: &str = "excluidos.csv";

/// Writes the three derived tables as CSV files in one output directory.
/// The Pais column is optional so the same exporter covers both the
/// with-country and without-country export variants.
pub struct CsvExporter {
    output_dir: PathBuf,
    emit_country: bool,
}

impl CsvExporter {
    pub fn new(output_dir: impl Into<PathBuf>, emit_country: bool) -> Result<Self> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir)?;
        Ok(Self {
            output_dir,
            emit_country,
        })
    }

    fn path(&self, file: &str) -> PathBuf {
        self.output_dir.join(file)
    }

    fn write_table(&self, path: &Path, header: &[&str], rows: Vec<Vec<String>>) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(header)?;
        let count = rows.len();
        for row in rows {
            writer.write_record(&row)?;
        }
        writer.flush()?;
        info!(path = %path.display(), rows = count, "Wrote export table");
        Ok(())
    }
}

#[async_trait]
impl ContactSink for CsvExporter {
    async fn write_contacts(&self, contacts: &[ContactRecord]) -> Result<()> {
        let mut header = vec!["Email", "Nombre", "Apellido", "Dominio", "Empresa"];
        if self.emit_country {
            header.push("Pais");
        }
        header.extend(["UltimoEnvio", "EstadoCliente", "AsuntoUltimo", "ColumnasOrigen"]);

        let rows = contacts
            .iter()
            .map(|c| {
                let mut row = vec![
                    c.address.clone(),
                    c.first_name.clone(),
                    c.last_name.clone(),
                    c.domain.clone(),
                    c.company.clone(),
                ];
                if self.emit_country {
                    row.push(c.country.clone());
                }
                row.extend([
                    format_sent_at(&c.last_sent_at),
                    c.status.to_string(),
                    c.last_subject.clone(),
                    c.source_columns.join(";"),
                ]);
                row
            })
            .collect();
        self.write_table(&self.path(CONTACTS_FILE), &header, rows)
    }

    async fn write_companies(&self, companies: &[CompanySummary]) -> Result<()> {
        let mut header = vec!["Empresa", "Dominio"];
        if self.emit_country {
            header.push("Pais");
        }
        header.extend(["ContactosUnicos", "TotalEmails", "UltimoEnvio"]);

        let rows = companies
            .iter()
            .map(|c| {
                let mut row = vec![c.company.clone(), c.domain.clone()];
                if self.emit_country {
                    row.push(c.country.clone());
                }
                row.extend([
                    c.unique_contacts.to_string(),
                    c.total_messages.to_string(),
                    format_sent_at(&c.last_sent_at),
                ]);
                row
            })
            .collect();
        self.write_table(&self.path(COMPANIES_FILE), &header, rows)
    }

    async fn write_excluded(&self, excluded: &[ExclusionRecord]) -> Result<()> {
        let header = ["Email", "Motivo", "FilaOrigen", "ColumnasOrigen"];
        let rows = excluded
            .iter()
            .map(|e| {
                vec![
                    e.address.clone(),
                    e.reason.clone(),
                    e.source_row.to_string(),
                    e.source_columns.join(";"),
                ]
            })
            .collect();
        self.write_table(&self.path(EXCLUDED_FILE), &header, rows)
    }
}
