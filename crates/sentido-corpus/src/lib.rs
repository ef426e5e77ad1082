//! Comment harvesting for the sentido corpus.
//!
//! Pulls the most popular comments of each configured video through a
//! [`CommentSource`], keeps the ones long enough to carry an opinion, and
//! normalizes them into [`sentido_core::CommentRecord`] rows.

pub mod error;
pub mod fetch;
pub mod source;
pub mod youtube;

pub use error::CorpusError;
pub use fetch::{
    collect_corpus, collect_video, meets_min_length, FetchOutcome, FetchSettings, SkippedVideo,
};
pub use source::{CommentSource, CommentStream, RawComment};
pub use youtube::YouTubeClient;
