//! Row schema of the comment corpus files.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Column order of the stage-1 corpus CSV. Downstream stages depend on these
/// exact names.
pub const CORPUS_COLUMNS: [&str; 8] = [
    "id",
    "fecha",
    "usuario",
    "texto",
    "tema",
    "sentimiento",
    "likes",
    "reposts",
];

/// Name of the column holding the comment body.
pub const TEXT_COLUMN: &str = "texto";

/// Placeholder date stamped on every fetched comment.
#[must_use]
pub fn placeholder_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).expect("2024-01-01 is a valid date")
}

pub const ANONYMOUS_USER: &str = "anom_user_yt";
pub const DEFAULT_TOPIC: &str = "Opinión Pública / Testimonio";
pub const DEFAULT_SENTIMENT_TAG: &str = "real";

/// One accepted comment. Created once by the fetcher and never mutated;
/// later stages may only drop rows.
///
/// Field order matches [`CORPUS_COLUMNS`]; the `csv` serializer writes the
/// header from the serde names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRecord {
    pub id: String,
    pub fecha: NaiveDate,
    pub usuario: String,
    pub texto: String,
    pub tema: String,
    pub sentimiento: String,
    pub likes: u64,
    pub reposts: u64,
}

impl CommentRecord {
    /// Build the record for a YouTube comment, applying the fixed
    /// anonymization and labelling.
    #[must_use]
    pub fn from_youtube(comment_id: &str, text: String, likes: u64) -> Self {
        Self {
            id: format!("yt_comm_{comment_id}"),
            fecha: placeholder_date(),
            usuario: ANONYMOUS_USER.to_string(),
            texto: text,
            tema: DEFAULT_TOPIC.to_string(),
            sentimiento: DEFAULT_SENTIMENT_TAG.to_string(),
            likes,
            reposts: 0,
        }
    }
}
