//! Bounded, per-video comment collection.

use futures::stream::{StreamExt, TryStreamExt};
use sentido_core::CommentRecord;

use crate::error::CorpusError;
use crate::source::CommentSource;

/// Limits applied to every video.
#[derive(Debug, Clone, Copy)]
pub struct FetchSettings {
    /// Most comments consumed from each video's stream.
    pub per_video: usize,
    /// Minimum comment length in characters (inclusive).
    pub min_chars: usize,
}

/// A video that produced an error and contributed no records.
#[derive(Debug)]
pub struct SkippedVideo {
    pub video_id: String,
    pub reason: String,
}

/// Everything a collection run produced, in video order.
#[derive(Debug, Default)]
pub struct FetchOutcome {
    pub records: Vec<CommentRecord>,
    pub skipped: Vec<SkippedVideo>,
}

/// Returns `true` when `text` has at least `min_chars` characters.
#[must_use]
pub fn meets_min_length(text: &str, min_chars: usize) -> bool {
    text.chars().count() >= min_chars
}

/// Consume at most `settings.per_video` comments of one video and keep the
/// ones long enough to carry an opinion.
///
/// The cap counts comments read from the stream, before the length filter,
/// so a video may yield fewer records than `per_video`.
///
/// # Errors
///
/// Returns the first [`CorpusError`] the stream yields; records gathered
/// before the error are dropped.
pub async fn collect_video<S>(
    source: &S,
    video_id: &str,
    settings: FetchSettings,
) -> Result<Vec<CommentRecord>, CorpusError>
where
    S: CommentSource + ?Sized,
{
    source
        .comments(video_id)
        .take(settings.per_video)
        .try_filter(|c| futures::future::ready(meets_min_length(&c.text, settings.min_chars)))
        .map_ok(|c| CommentRecord::from_youtube(&c.id, c.text, c.likes))
        .try_collect()
        .await
}

/// Collect every video in order. A failing video is logged and skipped; the
/// run continues with the next one.
pub async fn collect_corpus<S>(
    source: &S,
    video_ids: &[String],
    settings: FetchSettings,
) -> FetchOutcome
where
    S: CommentSource + ?Sized,
{
    let mut outcome = FetchOutcome::default();

    for video_id in video_ids {
        match collect_video(source, video_id, settings).await {
            Ok(records) => {
                tracing::info!(video_id, count = records.len(), "collected comments");
                outcome.records.extend(records);
            }
            Err(e) => {
                tracing::warn!(video_id, error = %e, "skipping video");
                outcome.skipped.push(SkippedVideo {
                    video_id: video_id.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use futures::stream;

    use super::*;
    use crate::source::{CommentStream, RawComment};

    fn comment(id: &str, text: &str) -> RawComment {
        RawComment {
            id: id.to_string(),
            text: text.to_string(),
            likes: 1,
        }
    }

    /// Serves canned comments per video; unknown videos fail.
    struct FakeSource {
        videos: HashMap<String, Vec<RawComment>>,
    }

    impl CommentSource for FakeSource {
        fn comments<'a>(&'a self, video_id: &'a str) -> CommentStream<'a> {
            match self.videos.get(video_id) {
                Some(list) => stream::iter(list.clone().into_iter().map(Ok)).boxed(),
                None => stream::iter(vec![Err(CorpusError::UnexpectedStatus {
                    status: 404,
                    video_id: video_id.to_string(),
                    message: "videoNotFound".to_string(),
                })])
                .boxed(),
            }
        }
    }

    /// Endless source that counts how many items were pulled.
    struct CountingSource {
        pulled: AtomicUsize,
    }

    impl CommentSource for CountingSource {
        fn comments<'a>(&'a self, _video_id: &'a str) -> CommentStream<'a> {
            stream::repeat_with(move || {
                let n = self.pulled.fetch_add(1, Ordering::SeqCst);
                Ok::<_, CorpusError>(comment(
                    &format!("c{n}"),
                    "un comentario suficientemente largo",
                ))
            })
            .boxed()
        }
    }

    /// Yields one good comment, then an error.
    struct FailsMidway;

    impl CommentSource for FailsMidway {
        fn comments<'a>(&'a self, video_id: &'a str) -> CommentStream<'a> {
            stream::iter(vec![
                Ok(comment("ok", "comentario válido y largo")),
                Err(CorpusError::PaginationLimit {
                    video_id: video_id.to_string(),
                    max_pages: 1,
                }),
            ])
            .boxed()
        }
    }

    fn settings(per_video: usize) -> FetchSettings {
        FetchSettings {
            per_video,
            min_chars: 15,
        }
    }

    #[test]
    fn length_boundary_is_inclusive() {
        assert!(meets_min_length("exactamente 15.", 15));
        assert!(!meets_min_length("catorce letras", 15));
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        // 15 chars, more than 15 bytes
        assert!(meets_min_length("ñañañañañañañañ", 15));
        assert!(!meets_min_length("ñañañañañañaña", 15));
    }

    #[tokio::test]
    async fn one_failing_video_among_nine_valid() {
        let mut videos = HashMap::new();
        let mut ids = Vec::new();
        for i in 0..9 {
            let id = format!("vid{i}");
            videos.insert(
                id.clone(),
                vec![comment(&format!("{id}-a"), "opinión bastante larga")],
            );
            ids.push(id);
        }
        ids.insert(4, "broken".to_string());
        let source = FakeSource { videos };

        let outcome = collect_corpus(&source, &ids, settings(10)).await;
        assert_eq!(outcome.records.len(), 9);
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].video_id, "broken");
        assert!(outcome.skipped[0].reason.contains("404"));
        assert_eq!(outcome.records[4].id, "yt_comm_vid4-a");
    }

    #[tokio::test]
    async fn take_stops_pulling_at_the_cap() {
        let source = CountingSource {
            pulled: AtomicUsize::new(0),
        };
        let records = collect_video(&source, "any", settings(25)).await.unwrap();
        assert_eq!(records.len(), 25);
        assert_eq!(source.pulled.load(Ordering::SeqCst), 25);
    }

    #[tokio::test]
    async fn short_comments_are_filtered_after_the_cap() {
        let mut videos = HashMap::new();
        videos.insert(
            "v".to_string(),
            vec![
                comment("1", "jaja"),
                comment("2", "esto sí es una opinión"),
                comment("3", "otra opinión bastante larga"),
            ],
        );
        let source = FakeSource { videos };
        let records = collect_video(&source, "v", settings(2)).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "yt_comm_2");
    }

    #[tokio::test]
    async fn partial_records_are_discarded_on_error() {
        let ids = vec!["x".to_string()];
        let outcome = collect_corpus(&FailsMidway, &ids, settings(100)).await;
        assert!(outcome.records.is_empty());
        assert_eq!(outcome.skipped.len(), 1);
        assert!(outcome.skipped[0].reason.contains("pagination limit"));
    }
}
