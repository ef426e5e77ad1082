use std::path::Path;

use sentido_core::{read_table, write_table, CorpusFileError, CorpusTable, TEXT_COLUMN};

use crate::error::DedupError;
use crate::similarity::SimilarityMatrix;
use crate::tfidf::TfidfVectorizer;

/// Row counts of one dedup pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DedupReport {
    pub before: usize,
    pub after: usize,
    pub removed: usize,
}

/// Indices of rows to drop, ascending.
///
/// Pairs `(i, j)` with `i < j` are scanned in index order. A pair is skipped
/// when either row has already been removed; otherwise `j` is removed when
/// `sim(i, j) > threshold`. The lowest-index row of every near-duplicate
/// group therefore always survives, and a removed row never causes further
/// removals.
#[must_use]
pub fn find_near_duplicates(matrix: &SimilarityMatrix, threshold: f32) -> Vec<usize> {
    let n = matrix.len();
    let mut removed = vec![false; n];

    for i in 0..n {
        if removed[i] {
            continue;
        }
        for j in (i + 1)..n {
            if !removed[j] && matrix.get(i, j) > threshold {
                removed[j] = true;
            }
        }
    }

    removed
        .iter()
        .enumerate()
        .filter_map(|(idx, &gone)| gone.then_some(idx))
        .collect()
}

/// Drop near-duplicate rows from `table`, judged on the `texto` column.
///
/// # Errors
///
/// Returns [`DedupError::InvalidThreshold`] for a threshold outside (0, 1]
/// and [`CorpusFileError::MissingColumn`] when there is no `texto` column.
pub fn dedup_table(
    table: &CorpusTable,
    threshold: f32,
) -> Result<(CorpusTable, DedupReport), DedupError> {
    if !(threshold > 0.0 && threshold <= 1.0) {
        return Err(DedupError::InvalidThreshold(threshold));
    }
    let column = table
        .column(TEXT_COLUMN)
        .ok_or_else(|| CorpusFileError::MissingColumn {
            path: "<table>".to_string(),
            column: TEXT_COLUMN.to_string(),
        })?;

    let texts: Vec<&str> = table
        .rows
        .iter()
        .map(|row| row.get(column).unwrap_or(""))
        .collect();
    let (vectorizer, vectors) = TfidfVectorizer::fit_transform(&texts);
    tracing::debug!(vocabulary = vectorizer.vocabulary_len(), "fitted tf-idf");

    let matrix = SimilarityMatrix::from_vectors(&vectors);
    let removed = find_near_duplicates(&matrix, threshold);

    let mut drop = vec![false; table.len()];
    for idx in &removed {
        drop[*idx] = true;
    }
    let rows = table
        .rows
        .iter()
        .zip(&drop)
        .filter(|(_, gone)| !**gone)
        .map(|(row, _)| row.clone())
        .collect::<Vec<_>>();

    let report = DedupReport {
        before: table.len(),
        after: rows.len(),
        removed: removed.len(),
    };
    Ok((
        CorpusTable {
            headers: table.headers.clone(),
            rows,
        },
        report,
    ))
}

/// Read `input`, drop near-duplicates, write the survivors to `output`.
///
/// # Errors
///
/// Returns [`DedupError`] on any read, write or validation failure. Nothing
/// is written when reading or validation fails.
pub fn dedup_file(input: &Path, output: &Path, threshold: f32) -> Result<DedupReport, DedupError> {
    let table = read_table(input)?;
    if table.column(TEXT_COLUMN).is_none() {
        return Err(CorpusFileError::MissingColumn {
            path: input.display().to_string(),
            column: TEXT_COLUMN.to_string(),
        }
        .into());
    }

    let (clean, report) = dedup_table(&table, threshold)?;
    write_table(output, &clean)?;

    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        before = report.before,
        after = report.after,
        removed = report.removed,
        "dedup complete"
    );
    Ok(report)
}

#[cfg(test)]
#[path = "dedup_test.rs"]
mod tests;
