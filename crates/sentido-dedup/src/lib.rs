//! Near-duplicate removal for comment corpora.
//!
//! Rows are vectorized with TF-IDF over a shared vocabulary, compared with a
//! full pairwise cosine matrix, and pruned greedily so the earliest row of
//! every near-duplicate group survives.

pub mod dedup;
pub mod error;
pub mod similarity;
pub mod tfidf;

pub use dedup::{dedup_file, dedup_table, find_near_duplicates, DedupReport};
pub use error::DedupError;
pub use similarity::SimilarityMatrix;
pub use tfidf::{SparseVector, TfidfVectorizer};
