use std::path::Path;

use tracing::info;

use crate::domain::RawRow;
use crate::error::Result;

/// Reads an exported CSV into headers plus rows. Every value stays text;
/// cells missing from short records become empty strings, mirroring how
/// the rest of the pipeline treats absence.
pub fn read_rows(path: &Path) -> Result<(Vec<String>, Vec<RawRow>)> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let cells = headers
            .iter()
            .enumerate()
            .map(|(i, header)| (header.clone(), record.get(i).unwrap_or("").to_string()))
            .collect();
        rows.push(RawRow::new(cells));
    }

    info!(
        path = %path.display(),
        rows = rows.len(),
        columns = headers.len(),
        "Loaded input table"
    );
    Ok((headers, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_headers_and_rows_as_text() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "To,Sent,Subject").unwrap();
        writeln!(file, "ana@acme.com,2024-05-20 10:00:00,Propuesta").unwrap();
        writeln!(file, "juan@startup.io,,").unwrap();
        file.flush().unwrap();

        let (headers, rows) = read_rows(file.path()).unwrap();
        assert_eq!(headers, vec!["To", "Sent", "Subject"]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("Subject"), Some("Propuesta"));
        assert_eq!(rows[1].get("Sent"), Some(""));
    }

    #[test]
    fn short_records_pad_with_empty_cells() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "To,Sent,Subject").unwrap();
        writeln!(file, "ana@acme.com").unwrap();
        file.flush().unwrap();

        let (_, rows) = read_rows(file.path()).unwrap();
        assert_eq!(rows[0].get("To"), Some("ana@acme.com"));
        assert_eq!(rows[0].get("Subject"), Some(""));
    }
}
