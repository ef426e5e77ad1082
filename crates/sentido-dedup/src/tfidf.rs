//! TF-IDF vectorization with a vocabulary shared across all documents.
//!
//! Tokens are lowercased runs of two or more word characters. Weights are raw
//! term counts scaled by the smoothed inverse document frequency
//! `ln((1 + n) / (1 + df)) + 1`, and every document vector is L2-normalized,
//! so the dot product of two vectors is their cosine similarity.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("valid token regex"));

/// A document vector: `(term index, weight)` pairs sorted by term index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(usize, f32)>,
}

impl SparseVector {
    #[must_use]
    pub fn entries(&self) -> &[(usize, f32)] {
        &self.entries
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    /// Dot product by merging the two sorted index lists.
    #[must_use]
    pub fn dot(&self, other: &Self) -> f32 {
        let (mut a, mut b) = (0, 0);
        let mut sum = 0.0f32;
        while a < self.entries.len() && b < other.entries.len() {
            let (ia, wa) = self.entries[a];
            let (ib, wb) = other.entries[b];
            match ia.cmp(&ib) {
                std::cmp::Ordering::Less => a += 1,
                std::cmp::Ordering::Greater => b += 1,
                std::cmp::Ordering::Equal => {
                    sum += wa * wb;
                    a += 1;
                    b += 1;
                }
            }
        }
        sum
    }
}

/// Split `text` into lowercase tokens.
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    TOKEN_RE
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Fitted vocabulary and idf weights.
#[derive(Debug, Default)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f32>,
}

impl TfidfVectorizer {
    /// Learn the vocabulary and idf weights from `documents` and return
    /// their normalized vectors, in input order.
    #[must_use]
    pub fn fit_transform<S: AsRef<str>>(documents: &[S]) -> (Self, Vec<SparseVector>) {
        let tokenized: Vec<Vec<String>> = documents.iter().map(|d| tokenize(d.as_ref())).collect();

        let mut vocabulary: HashMap<String, usize> = HashMap::new();
        let mut doc_freq: Vec<usize> = Vec::new();
        let mut counts: Vec<HashMap<usize, u32>> = Vec::with_capacity(tokenized.len());

        for tokens in &tokenized {
            let mut doc_counts: HashMap<usize, u32> = HashMap::new();
            for token in tokens {
                let next = vocabulary.len();
                let idx = *vocabulary.entry(token.clone()).or_insert(next);
                if idx == doc_freq.len() {
                    doc_freq.push(0);
                }
                *doc_counts.entry(idx).or_insert(0) += 1;
            }
            for idx in doc_counts.keys() {
                doc_freq[*idx] += 1;
            }
            counts.push(doc_counts);
        }

        #[allow(clippy::cast_precision_loss)]
        let n = documents.len() as f64;
        #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
        let idf: Vec<f32> = doc_freq
            .iter()
            .map(|&df| (((1.0 + n) / (1.0 + df as f64)).ln() + 1.0) as f32)
            .collect();

        let vectorizer = Self { vocabulary, idf };
        let vectors = counts
            .into_iter()
            .map(|doc| vectorizer.weigh(doc))
            .collect();
        (vectorizer, vectors)
    }

    /// Number of distinct terms seen during fitting.
    #[must_use]
    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    fn weigh(&self, counts: HashMap<usize, u32>) -> SparseVector {
        #[allow(clippy::cast_precision_loss)]
        let mut entries: Vec<(usize, f32)> = counts
            .into_iter()
            .map(|(idx, count)| (idx, count as f32 * self.idf[idx]))
            .collect();
        entries.sort_unstable_by_key(|(idx, _)| *idx);

        let norm = entries.iter().map(|(_, w)| w * w).sum::<f32>().sqrt();
        if norm > 0.0 {
            for (_, w) in &mut entries {
                *w /= norm;
            }
        }
        SparseVector { entries }
    }
}
