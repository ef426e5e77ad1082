use std::path::PathBuf;

/// Every tunable of the pipeline, resolved once at startup and passed down
/// explicitly. Defaults are listed on [`crate::config::load_config`].
#[derive(Clone)]
pub struct PipelineConfig {
    pub log_level: String,

    // fetch
    pub youtube_api_key: Option<String>,
    pub youtube_api_url: String,
    pub videos_path: PathBuf,
    pub comments_per_video: usize,
    pub min_comment_chars: usize,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub corpus_path: PathBuf,

    // dedup
    pub clean_corpus_path: PathBuf,
    pub dedup_threshold: f32,

    // analyze
    pub questions_path: PathBuf,
    pub tei_url: String,
    pub embed_model: String,
    pub generation_command: String,
    pub generation_model: String,
    pub chunk_size: usize,
    pub top_k: usize,
    pub num_clusters: usize,
    pub cluster_seed: u64,
    pub max_visualized: usize,
    pub map_path: PathBuf,
    pub report_path: PathBuf,
}

impl std::fmt::Debug for PipelineConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineConfig")
            .field("log_level", &self.log_level)
            .field(
                "youtube_api_key",
                &self.youtube_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("youtube_api_url", &self.youtube_api_url)
            .field("videos_path", &self.videos_path)
            .field("comments_per_video", &self.comments_per_video)
            .field("min_comment_chars", &self.min_comment_chars)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("corpus_path", &self.corpus_path)
            .field("clean_corpus_path", &self.clean_corpus_path)
            .field("dedup_threshold", &self.dedup_threshold)
            .field("questions_path", &self.questions_path)
            .field("tei_url", &self.tei_url)
            .field("embed_model", &self.embed_model)
            .field("generation_command", &self.generation_command)
            .field("generation_model", &self.generation_model)
            .field("chunk_size", &self.chunk_size)
            .field("top_k", &self.top_k)
            .field("num_clusters", &self.num_clusters)
            .field("cluster_seed", &self.cluster_seed)
            .field("max_visualized", &self.max_visualized)
            .field("map_path", &self.map_path)
            .field("report_path", &self.report_path)
            .finish()
    }
}
