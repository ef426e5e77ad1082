//! The comment-source capability.

use futures::stream::BoxStream;

use crate::error::CorpusError;

/// A comment as delivered by a source, before filtering and normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawComment {
    /// Source-assigned comment identifier.
    pub id: String,
    pub text: String,
    /// Like/vote count; `0` when the source does not report one.
    pub likes: u64,
}

/// Lazily produced comments, most popular first.
pub type CommentStream<'a> = BoxStream<'a, Result<RawComment, CorpusError>>;

/// Anything that can enumerate the comments of a piece of content.
///
/// The stream is conceptually unbounded: implementations must only do work
/// (e.g. request the next page) when the consumer polls for more items, so a
/// consumer that stops after N items never pays for item N+1's page.
pub trait CommentSource {
    fn comments<'a>(&'a self, video_id: &'a str) -> CommentStream<'a>;
}
