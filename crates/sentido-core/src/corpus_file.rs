//! CSV reading and writing for corpus files.
//!
//! Stage 1 writes typed [`CommentRecord`] rows. Later stages read the file as
//! an untyped [`CorpusTable`] so extra columns added by hand survive a
//! dedup pass unchanged.

use std::path::Path;

use csv::StringRecord;
use thiserror::Error;

use crate::record::{CommentRecord, TEXT_COLUMN};

#[derive(Debug, Error)]
pub enum CorpusFileError {
    #[error("CSV error in {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} has no \"{column}\" column")]
    MissingColumn { path: String, column: String },
}

impl CorpusFileError {
    fn csv(path: &Path, source: csv::Error) -> Self {
        Self::Csv {
            path: path.display().to_string(),
            source,
        }
    }

    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

/// A corpus file held in memory: header row plus data rows, in file order.
#[derive(Debug, Clone)]
pub struct CorpusTable {
    pub headers: StringRecord,
    pub rows: Vec<StringRecord>,
}

impl CorpusTable {
    /// Index of the named column, if present.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Write comment records with a header row, replacing any existing file.
///
/// # Errors
///
/// Returns [`CorpusFileError`] if the file cannot be created or written.
pub fn write_records(path: &Path, records: &[CommentRecord]) -> Result<(), CorpusFileError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| CorpusFileError::csv(path, e))?;
    for record in records {
        writer
            .serialize(record)
            .map_err(|e| CorpusFileError::csv(path, e))?;
    }
    writer.flush().map_err(|e| CorpusFileError::io(path, e))?;
    Ok(())
}

/// Read any headered CSV into a [`CorpusTable`].
///
/// Rows may have differing lengths; they are carried through as-is.
///
/// # Errors
///
/// Returns [`CorpusFileError`] if the file cannot be opened or parsed.
pub fn read_table(path: &Path) -> Result<CorpusTable, CorpusFileError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| CorpusFileError::csv(path, e))?;
    let headers = reader
        .headers()
        .map_err(|e| CorpusFileError::csv(path, e))?
        .clone();
    let rows = reader
        .records()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| CorpusFileError::csv(path, e))?;
    Ok(CorpusTable { headers, rows })
}

/// Write a [`CorpusTable`] back out, header first.
///
/// # Errors
///
/// Returns [`CorpusFileError`] if the file cannot be created or written.
pub fn write_table(path: &Path, table: &CorpusTable) -> Result<(), CorpusFileError> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| CorpusFileError::csv(path, e))?;
    writer
        .write_record(&table.headers)
        .map_err(|e| CorpusFileError::csv(path, e))?;
    for row in &table.rows {
        writer
            .write_record(row)
            .map_err(|e| CorpusFileError::csv(path, e))?;
    }
    writer.flush().map_err(|e| CorpusFileError::io(path, e))?;
    Ok(())
}

/// Read the comment texts of a corpus file, skipping rows whose text cell is
/// missing or blank.
///
/// # Errors
///
/// Returns [`CorpusFileError::MissingColumn`] if the file has no `texto`
/// column, or any read error.
pub fn read_text_column(path: &Path) -> Result<Vec<String>, CorpusFileError> {
    let table = read_table(path)?;
    let column = table
        .column(TEXT_COLUMN)
        .ok_or_else(|| CorpusFileError::MissingColumn {
            path: path.display().to_string(),
            column: TEXT_COLUMN.to_string(),
        })?;

    let texts: Vec<String> = table
        .rows
        .iter()
        .filter_map(|row| row.get(column))
        .filter(|text| !text.trim().is_empty())
        .map(ToString::to_string)
        .collect();

    let dropped = table.len() - texts.len();
    if dropped > 0 {
        tracing::debug!(path = %path.display(), dropped, "skipped rows without text");
    }
    Ok(texts)
}
