use sentido_core::CorpusFileError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DedupError {
    #[error(transparent)]
    File(#[from] CorpusFileError),

    #[error("similarity threshold must be in (0, 1], got {0}")]
    InvalidThreshold(f32),
}
