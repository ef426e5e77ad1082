use thiserror::Error;

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("comment source returned status {status} for video {video_id}: {message}")]
    UnexpectedStatus {
        status: u16,
        video_id: String,
        message: String,
    },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("pagination limit reached for video {video_id}: exceeded {max_pages} pages")]
    PaginationLimit { video_id: String, max_pages: usize },

    #[error("missing API key: {0}")]
    MissingApiKey(String),
}
