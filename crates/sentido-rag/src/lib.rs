//! Retrieval-augmented analysis of the cleaned comment corpus.
//!
//! Comments are normalized, chunked, embedded via TEI, clustered and indexed
//! once; each research question then retrieves its nearest chunks, reads
//! their emotional tone, and asks an external generator for an answer that
//! is appended to a Markdown report.

pub mod chunking;
pub mod cluster;
pub mod corpus;
pub mod embeddings;
pub mod emotion;
pub mod error;
pub mod generator;
pub mod glossary;
pub mod index;
pub mod normalize;
pub mod pipeline;
pub mod projection;
pub mod prompt;
pub mod report;

pub use chunking::Chunk;
pub use corpus::EmbeddedChunk;
pub use embeddings::{Embedder, TeiClient};
pub use emotion::{detect_emotion, EmotionReading};
pub use error::RagError;
pub use generator::{OllamaGenerator, TextGenerator};
pub use index::{FlatL2Index, SearchHit};
pub use pipeline::{answer_questions, KnowledgeBase, RagSettings, Retrieval};
pub use report::ReportWriter;
