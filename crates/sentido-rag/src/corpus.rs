//! Chunks paired with their embeddings and cluster labels.

use crate::chunking::Chunk;
use crate::error::RagError;

/// One indexed chunk: its text, its vector, and the cluster it fell into.
#[derive(Debug, Clone)]
pub struct EmbeddedChunk {
    pub chunk: Chunk,
    pub embedding: Vec<f32>,
    /// Set once clustering has run.
    pub cluster: Option<usize>,
}

impl EmbeddedChunk {
    /// Pair chunks with embeddings positionally.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Misaligned`] when the two sequences differ in
    /// length and [`RagError::Dimension`] when the vectors are not all the
    /// same length.
    pub fn pair(chunks: Vec<Chunk>, embeddings: Vec<Vec<f32>>) -> Result<Vec<Self>, RagError> {
        if chunks.len() != embeddings.len() {
            return Err(RagError::Misaligned {
                chunks: chunks.len(),
                embeddings: embeddings.len(),
            });
        }
        if let Some(first) = embeddings.first() {
            let dim = first.len();
            if let Some(bad) = embeddings.iter().find(|e| e.len() != dim) {
                return Err(RagError::Dimension {
                    expected: dim,
                    got: bad.len(),
                });
            }
        }

        Ok(chunks
            .into_iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| Self {
                chunk,
                embedding,
                cluster: None,
            })
            .collect())
    }
}

/// Attach cluster labels to `entries`, positionally.
///
/// # Errors
///
/// Returns [`RagError::Misaligned`] when `labels` does not have one entry
/// per chunk.
pub fn assign_clusters(entries: &mut [EmbeddedChunk], labels: &[usize]) -> Result<(), RagError> {
    if entries.len() != labels.len() {
        return Err(RagError::Misaligned {
            chunks: entries.len(),
            embeddings: labels.len(),
        });
    }
    for (entry, label) in entries.iter_mut().zip(labels) {
        entry.cluster = Some(*label);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(record: usize, text: &str) -> Chunk {
        Chunk {
            record,
            text: text.to_string(),
        }
    }

    #[test]
    fn pairs_in_order() {
        let entries = EmbeddedChunk::pair(
            vec![chunk(0, "a"), chunk(1, "b")],
            vec![vec![1.0, 0.0], vec![0.0, 1.0]],
        )
        .unwrap();
        assert_eq!(entries[1].chunk.text, "b");
        assert_eq!(entries[1].embedding, vec![0.0, 1.0]);
        assert!(entries[1].cluster.is_none());
    }

    #[test]
    fn length_mismatch_is_rejected() {
        let err = EmbeddedChunk::pair(vec![chunk(0, "a"), chunk(0, "b")], vec![vec![1.0]])
            .unwrap_err();
        assert!(matches!(
            err,
            RagError::Misaligned {
                chunks: 2,
                embeddings: 1
            }
        ));
    }

    #[test]
    fn ragged_vectors_are_rejected() {
        let err = EmbeddedChunk::pair(
            vec![chunk(0, "a"), chunk(0, "b")],
            vec![vec![1.0, 2.0], vec![1.0]],
        )
        .unwrap_err();
        assert!(matches!(err, RagError::Dimension { expected: 2, got: 1 }));
    }

    #[test]
    fn assigns_labels() {
        let mut entries =
            EmbeddedChunk::pair(vec![chunk(0, "a"), chunk(1, "b")], vec![vec![1.0], vec![2.0]])
                .unwrap();
        assign_clusters(&mut entries, &[1, 0]).unwrap();
        assert_eq!(entries[0].cluster, Some(1));
        assert!(assign_clusters(&mut entries, &[0]).is_err());
    }
}
