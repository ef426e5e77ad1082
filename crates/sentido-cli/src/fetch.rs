//! `sentido fetch`: harvest comments into the stage-1 corpus.

use std::path::Path;

use anyhow::Context;
use sentido_core::{load_videos, write_records, PipelineConfig, MAX_COMMENTS_PER_VIDEO};
use sentido_corpus::{collect_corpus, FetchSettings, YouTubeClient};

/// Collect comments for every configured video and write the corpus CSV.
///
/// Videos that fail are reported and skipped. When nothing is accepted no
/// file is written.
///
/// # Errors
///
/// Returns an error if the video list cannot be loaded, the API key is
/// missing, or the corpus cannot be written.
pub(crate) async fn run_fetch(
    config: &PipelineConfig,
    output: Option<&Path>,
    per_video: Option<usize>,
) -> anyhow::Result<()> {
    let output = output.unwrap_or(&config.corpus_path);
    let per_video = per_video.unwrap_or(config.comments_per_video);
    anyhow::ensure!(
        (1..=MAX_COMMENTS_PER_VIDEO).contains(&per_video),
        "--per-video must be between 1 and {MAX_COMMENTS_PER_VIDEO}"
    );

    let videos = load_videos(&config.videos_path)
        .with_context(|| format!("loading {}", config.videos_path.display()))?;
    let video_ids = videos.ids();

    let api_key = config.youtube_api_key.as_deref().unwrap_or_default();
    let client = YouTubeClient::new(
        &config.youtube_api_url,
        api_key,
        config.request_timeout_secs,
        &config.user_agent,
    )?;

    let settings = FetchSettings {
        per_video,
        min_chars: config.min_comment_chars,
    };
    tracing::info!(
        videos = video_ids.len(),
        per_video,
        min_chars = settings.min_chars,
        "starting comment harvest"
    );

    let outcome = collect_corpus(&client, &video_ids, settings).await;
    for skipped in &outcome.skipped {
        println!("skipped video {}: {}", skipped.video_id, skipped.reason);
    }

    if outcome.records.is_empty() {
        println!("no comments found; {} not written", output.display());
        return Ok(());
    }

    write_records(output, &outcome.records)?;
    println!(
        "wrote {} comments from {} videos to {}",
        outcome.records.len(),
        video_ids.len() - outcome.skipped.len(),
        output.display()
    );
    Ok(())
}
