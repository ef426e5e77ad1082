use sentido_core::CorpusFileError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RagError {
    #[error(transparent)]
    CorpusFile(#[from] CorpusFileError),

    #[error("TEI embed error: {0}")]
    Tei(String),

    #[error("{chunks} chunks but {embeddings} embeddings")]
    Misaligned { chunks: usize, embeddings: usize },

    #[error("embedding dimension mismatch: expected {expected}, got {got}")]
    Dimension { expected: usize, got: usize },

    #[error("corpus produced no chunks to index")]
    EmptyCorpus,

    #[error("generator error: {0}")]
    Generator(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl RagError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}
