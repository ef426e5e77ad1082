//! YouTube Data API v3 `commentThreads` client.
//!
//! Comments are requested in relevance order (the API's popularity ranking),
//! 100 per page, following `nextPageToken` until the consumer stops polling or
//! the thread list ends.

use std::time::Duration;

use futures::stream::{self, StreamExt, TryStreamExt};
use reqwest::Client;
use serde::Deserialize;

use crate::error::CorpusError;
use crate::source::{CommentSource, CommentStream, RawComment};

/// Largest page size the API accepts.
const PAGE_SIZE: u32 = 100;

/// Guard against cycling page tokens. Together with [`PAGE_SIZE`] this
/// covers [`sentido_core::MAX_COMMENTS_PER_VIDEO`].
pub(crate) const MAX_PAGES: usize = 500;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThreadListResponse {
    next_page_token: Option<String>,
    #[serde(default)]
    items: Vec<CommentThread>,
}

#[derive(Debug, Deserialize)]
struct CommentThread {
    snippet: ThreadSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThreadSnippet {
    top_level_comment: TopLevelComment,
}

#[derive(Debug, Deserialize)]
struct TopLevelComment {
    id: String,
    snippet: CommentSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentSnippet {
    text_original: Option<String>,
    text_display: Option<String>,
    #[serde(default)]
    like_count: u64,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

impl From<CommentThread> for RawComment {
    fn from(thread: CommentThread) -> Self {
        let comment = thread.snippet.top_level_comment;
        let text = comment
            .snippet
            .text_original
            .or(comment.snippet.text_display)
            .unwrap_or_default();
        RawComment {
            id: comment.id,
            text,
            likes: comment.snippet.like_count,
        }
    }
}

/// One page of top-level comments plus the cursor for the next one.
#[derive(Debug)]
pub struct CommentPage {
    pub comments: Vec<RawComment>,
    pub next_page_token: Option<String>,
}

enum Cursor {
    Start,
    Next(String),
}

/// HTTP client for the `commentThreads` endpoint.
pub struct YouTubeClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl YouTubeClient {
    /// Creates a client against `base_url` (normally
    /// `https://www.googleapis.com/youtube/v3`).
    ///
    /// # Errors
    ///
    /// Returns [`CorpusError::MissingApiKey`] for a blank key and
    /// [`CorpusError::Http`] if the underlying `reqwest::Client` cannot be built.
    pub fn new(
        base_url: &str,
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, CorpusError> {
        if api_key.trim().is_empty() {
            return Err(CorpusError::MissingApiKey(
                "YOUTUBE_API_KEY must be set to fetch comments".to_string(),
            ));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Fetches a single page of top-level comments for `video_id`.
    ///
    /// # Errors
    ///
    /// - [`CorpusError::UnexpectedStatus`] for any non-2xx response (unknown
    ///   video, comments disabled, quota exhausted, ...).
    /// - [`CorpusError::Http`] for network failures.
    /// - [`CorpusError::Deserialize`] if the body is not the expected JSON.
    pub async fn fetch_page(
        &self,
        video_id: &str,
        page_token: Option<&str>,
    ) -> Result<CommentPage, CorpusError> {
        let url = format!("{}/commentThreads", self.base_url);
        let page_size = PAGE_SIZE.to_string();
        let mut params: Vec<(&str, &str)> = vec![
            ("part", "snippet"),
            ("videoId", video_id),
            ("order", "relevance"),
            ("textFormat", "plainText"),
            ("maxResults", &page_size),
            ("key", &self.api_key),
        ];
        if let Some(token) = page_token {
            params.push(("pageToken", token));
        }

        let response = self.client.get(&url).query(&params).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| body.chars().take(200).collect());
            return Err(CorpusError::UnexpectedStatus {
                status: status.as_u16(),
                video_id: video_id.to_string(),
                message,
            });
        }

        let parsed: ThreadListResponse =
            serde_json::from_str(&body).map_err(|source| CorpusError::Deserialize {
                context: format!("commentThreads page for {video_id}"),
                source,
            })?;

        Ok(CommentPage {
            comments: parsed.items.into_iter().map(RawComment::from).collect(),
            next_page_token: parsed.next_page_token.filter(|t| !t.is_empty()),
        })
    }
}

impl CommentSource for YouTubeClient {
    fn comments<'a>(&'a self, video_id: &'a str) -> CommentStream<'a> {
        stream::try_unfold(
            (Some(Cursor::Start), 0usize),
            move |(cursor, pages)| async move {
                let Some(cursor) = cursor else {
                    return Ok(None);
                };
                if pages >= MAX_PAGES {
                    return Err(CorpusError::PaginationLimit {
                        video_id: video_id.to_string(),
                        max_pages: MAX_PAGES,
                    });
                }

                let token = match &cursor {
                    Cursor::Start => None,
                    Cursor::Next(token) => Some(token.as_str()),
                };
                let page = self.fetch_page(video_id, token).await?;
                tracing::debug!(
                    video_id,
                    page = pages + 1,
                    count = page.comments.len(),
                    "fetched comment page"
                );

                let next = page.next_page_token.map(Cursor::Next);
                let items = stream::iter(page.comments.into_iter().map(Ok::<_, CorpusError>));
                Ok(Some((items, (next, pages + 1))))
            },
        )
        .try_flatten()
        .boxed()
    }
}
