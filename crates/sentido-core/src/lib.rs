//! Shared configuration, source lists and corpus file schema for the
//! sentido pipeline.

pub mod app_config;
pub mod config;
pub mod corpus_file;
pub mod record;
pub mod sources;

pub use app_config::PipelineConfig;
pub use config::{load_config, load_config_from_env, MAX_COMMENTS_PER_VIDEO};
pub use corpus_file::{
    read_table, read_text_column, write_records, write_table, CorpusFileError, CorpusTable,
};
pub use record::{CommentRecord, CORPUS_COLUMNS, TEXT_COLUMN};
pub use sources::{load_questions, load_videos, QuestionsFile, VideoSource, VideosFile};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("config validation failed: {0}")]
    Validation(String),

    #[error("failed to read sources file {path}: {source}")]
    SourcesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse sources file: {0}")]
    SourcesFileParse(#[from] serde_yaml::Error),
}
