//! Flat, single-header table persisted as tab-separated text between the
//! normalization and loading steps.

use super::error::{PipelineError, Result};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl FlatTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the column named exactly `name`.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Index of the first column whose name contains `fragment`.
    pub fn column_containing(&self, fragment: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.contains(fragment))
    }

    /// Cell value, with short rows read as empty.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map_or("", String::as_str)
    }

    pub fn trim_headers(&mut self) {
        for header in &mut self.headers {
            *header = header.trim().to_string();
        }
    }

    pub fn read_tsv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| PipelineError::source_unavailable(path, e))?;
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .flexible(true)
            .from_reader(BufReader::new(file));

        let headers = rdr.headers()?.iter().map(str::to_string).collect();
        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        debug!("Read {} rows from {}", rows.len(), path.display());
        Ok(Self { headers, rows })
    }

    pub fn write_tsv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)?;
        let mut wtr = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .flexible(true)
            .from_writer(BufWriter::new(file));
        wtr.write_record(&self.headers)?;
        for row in &self.rows {
            wtr.write_record(row)?;
        }
        wtr.flush()?;
        debug!("Wrote {} rows to {}", self.rows.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample() -> FlatTable {
        FlatTable::new(
            vec!["Fondo_Fondo".into(), "Variac. %".into(), "30/12/24".into()],
            vec![
                vec!["Alpha - Clase A".into(), "0.12".into(), "3.4".into()],
                vec!["Beta, \"quoted\"".into(), "".into(), "1".into()],
            ],
        )
    }

    #[test]
    fn test_tsv_preserves_headers_and_cells() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fci.tsv");
        let table = sample();

        table.write_tsv(&path).unwrap();
        let loaded = FlatTable::read_tsv(&path).unwrap();

        assert_eq!(loaded, table);
    }

    #[test]
    fn test_missing_file_is_source_unavailable() {
        let dir = tempdir().unwrap();
        let err = FlatTable::read_tsv(dir.path().join("absent.tsv")).unwrap_err();
        assert!(matches!(err, PipelineError::SourceUnavailable { .. }));
    }

    #[test]
    fn test_column_lookup() {
        let table = sample();
        assert_eq!(table.column("30/12/24"), Some(2));
        assert_eq!(table.column("Variac."), None);
        assert_eq!(table.column_containing("Variac."), Some(1));
        assert_eq!(table.cell(1, 1), "");
        assert_eq!(table.cell(5, 0), "");
    }
}
