//! Exact nearest-neighbour search by squared Euclidean distance.

use crate::error::RagError;

/// One search result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchHit {
    /// Position of the vector in insertion order.
    pub position: usize,
    /// Squared L2 distance to the query.
    pub distance: f32,
}

/// Brute-force index over fixed-width vectors stored contiguously.
#[derive(Debug, Clone)]
pub struct FlatL2Index {
    dim: usize,
    data: Vec<f32>,
}

impl FlatL2Index {
    #[must_use]
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            data: Vec::new(),
        }
    }

    /// Build an index holding `vectors` in order.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::EmptyCorpus`] for no vectors and
    /// [`RagError::Dimension`] for vectors of differing length.
    pub fn from_vectors<'a, I>(vectors: I) -> Result<Self, RagError>
    where
        I: IntoIterator<Item = &'a [f32]>,
    {
        let mut iter = vectors.into_iter().peekable();
        let dim = iter.peek().map(|v| v.len()).ok_or(RagError::EmptyCorpus)?;
        let mut index = Self::new(dim);
        for v in iter {
            index.add(v)?;
        }
        Ok(index)
    }

    /// Append one vector.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Dimension`] if `vector` has the wrong length.
    pub fn add(&mut self, vector: &[f32]) -> Result<(), RagError> {
        self.check_dim(vector)?;
        self.data.extend_from_slice(vector);
        Ok(())
    }

    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }

    #[must_use]
    pub fn len(&self) -> usize {
        if self.dim == 0 {
            0
        } else {
            self.data.len() / self.dim
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The `k` nearest vectors to `query`, closest first.
    ///
    /// `k` is clamped to the number of stored vectors. Equal distances are
    /// ordered by position.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Dimension`] if `query` has the wrong length.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchHit>, RagError> {
        self.check_dim(query)?;
        if self.dim == 0 {
            return Ok(Vec::new());
        }

        let mut hits: Vec<SearchHit> = self
            .data
            .chunks_exact(self.dim)
            .enumerate()
            .map(|(position, v)| SearchHit {
                position,
                distance: v
                    .iter()
                    .zip(query)
                    .map(|(a, b)| (a - b) * (a - b))
                    .sum(),
            })
            .collect();

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits.truncate(k.min(self.len()));
        Ok(hits)
    }

    fn check_dim(&self, vector: &[f32]) -> Result<(), RagError> {
        if vector.len() == self.dim {
            Ok(())
        } else {
            Err(RagError::Dimension {
                expected: self.dim,
                got: vector.len(),
            })
        }
    }
}
