use crate::app_config::PipelineConfig;
use crate::ConfigError;

/// Most comments the YouTube client will page through for one video
/// (500 pages of 100).
pub const MAX_COMMENTS_PER_VIDEO: usize = 50_000;

/// Load pipeline configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// | Variable | Default |
/// |----------|---------|
/// | `SENTIDO_LOG_LEVEL` | `info` |
/// | `YOUTUBE_API_KEY` | unset (only `fetch` needs it) |
/// | `SENTIDO_YOUTUBE_API_URL` | `https://www.googleapis.com/youtube/v3` |
/// | `SENTIDO_VIDEOS_PATH` | `./config/videos.yaml` |
/// | `SENTIDO_COMMENTS_PER_VIDEO` | `2000` (max 50000) |
/// | `SENTIDO_MIN_COMMENT_CHARS` | `15` |
/// | `SENTIDO_REQUEST_TIMEOUT_SECS` | `30` |
/// | `SENTIDO_USER_AGENT` | `sentido/0.1 (corpus-research)` |
/// | `SENTIDO_CORPUS_PATH` | `dataset_comentarios_reales.csv` |
/// | `SENTIDO_CLEAN_CORPUS_PATH` | `dataset_comentarios_LIMPIO.csv` |
/// | `SENTIDO_DEDUP_THRESHOLD` | `0.85` |
/// | `SENTIDO_QUESTIONS_PATH` | `./config/questions.yaml` |
/// | `SENTIDO_TEI_URL` | `http://127.0.0.1:8080` |
/// | `SENTIDO_EMBED_MODEL` | `all-mpnet-base-v2` |
/// | `SENTIDO_GENERATION_COMMAND` | `ollama` |
/// | `SENTIDO_GENERATION_MODEL` | `mistral` |
/// | `SENTIDO_CHUNK_SIZE` | `400` |
/// | `SENTIDO_TOP_K` | `5` |
/// | `SENTIDO_NUM_CLUSTERS` | `5` |
/// | `SENTIDO_CLUSTER_SEED` | `42` |
/// | `SENTIDO_MAX_VISUALIZED` | `2000` |
/// | `SENTIDO_MAP_PATH` | `mapa_semantico_gen_z.svg` |
/// | `SENTIDO_REPORT_PATH` | `Preguntas.md` |
///
/// # Errors
///
/// Returns `ConfigError` if a value cannot be parsed or fails validation.
pub fn load_config() -> Result<PipelineConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_config_from_env()
}

/// Load pipeline configuration from environment variables already in the process.
///
/// Unlike [`load_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value cannot be parsed or fails validation.
pub fn load_config_from_env() -> Result<PipelineConfig, ConfigError> {
    build_config(|key| std::env::var(key))
}

/// Build the configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can drive it with a
/// plain `HashMap`.
fn build_config<F>(lookup: F) -> Result<PipelineConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;
    use std::str::FromStr;

    fn parse_as<T>(var: &str, raw: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        raw.trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    }

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        parse_as::<usize>(var, &or_default(var, default))
    };
    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        parse_as::<u64>(var, &or_default(var, default))
    };
    let parse_f32 = |var: &str, default: &str| -> Result<f32, ConfigError> {
        parse_as::<f32>(var, &or_default(var, default))
    };

    let log_level = or_default("SENTIDO_LOG_LEVEL", "info");

    let youtube_api_key = lookup("YOUTUBE_API_KEY")
        .ok()
        .filter(|k| !k.trim().is_empty());
    let youtube_api_url = or_default(
        "SENTIDO_YOUTUBE_API_URL",
        "https://www.googleapis.com/youtube/v3",
    )
    .trim_end_matches('/')
    .to_string();
    let videos_path = PathBuf::from(or_default("SENTIDO_VIDEOS_PATH", "./config/videos.yaml"));
    let comments_per_video = parse_usize("SENTIDO_COMMENTS_PER_VIDEO", "2000")?;
    let min_comment_chars = parse_usize("SENTIDO_MIN_COMMENT_CHARS", "15")?;
    let request_timeout_secs = parse_u64("SENTIDO_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("SENTIDO_USER_AGENT", "sentido/0.1 (corpus-research)");
    let corpus_path = PathBuf::from(or_default(
        "SENTIDO_CORPUS_PATH",
        "dataset_comentarios_reales.csv",
    ));

    let clean_corpus_path = PathBuf::from(or_default(
        "SENTIDO_CLEAN_CORPUS_PATH",
        "dataset_comentarios_LIMPIO.csv",
    ));
    let dedup_threshold = parse_f32("SENTIDO_DEDUP_THRESHOLD", "0.85")?;

    let questions_path = PathBuf::from(or_default(
        "SENTIDO_QUESTIONS_PATH",
        "./config/questions.yaml",
    ));
    let tei_url = or_default("SENTIDO_TEI_URL", "http://127.0.0.1:8080")
        .trim_end_matches('/')
        .to_string();
    let embed_model = or_default("SENTIDO_EMBED_MODEL", "all-mpnet-base-v2");
    let generation_command = or_default("SENTIDO_GENERATION_COMMAND", "ollama");
    let generation_model = or_default("SENTIDO_GENERATION_MODEL", "mistral");
    let chunk_size = parse_usize("SENTIDO_CHUNK_SIZE", "400")?;
    let top_k = parse_usize("SENTIDO_TOP_K", "5")?;
    let num_clusters = parse_usize("SENTIDO_NUM_CLUSTERS", "5")?;
    let cluster_seed = parse_u64("SENTIDO_CLUSTER_SEED", "42")?;
    let max_visualized = parse_usize("SENTIDO_MAX_VISUALIZED", "2000")?;
    let map_path = PathBuf::from(or_default("SENTIDO_MAP_PATH", "mapa_semantico_gen_z.svg"));
    let report_path = PathBuf::from(or_default("SENTIDO_REPORT_PATH", "Preguntas.md"));

    let config = PipelineConfig {
        log_level,
        youtube_api_key,
        youtube_api_url,
        videos_path,
        comments_per_video,
        min_comment_chars,
        request_timeout_secs,
        user_agent,
        corpus_path,
        clean_corpus_path,
        dedup_threshold,
        questions_path,
        tei_url,
        embed_model,
        generation_command,
        generation_model,
        chunk_size,
        top_k,
        num_clusters,
        cluster_seed,
        max_visualized,
        map_path,
        report_path,
    };
    validate_config(&config)?;
    Ok(config)
}

/// Reject values that parse but make no sense for the pipeline.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] naming the offending variable.
pub fn validate_config(config: &PipelineConfig) -> Result<(), ConfigError> {
    let invalid = |var: &str, reason: &str| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason: reason.to_string(),
    };

    if !(config.dedup_threshold > 0.0 && config.dedup_threshold <= 1.0) {
        return Err(invalid(
            "SENTIDO_DEDUP_THRESHOLD",
            "must be in the range (0, 1]",
        ));
    }
    if config.comments_per_video == 0 {
        return Err(invalid("SENTIDO_COMMENTS_PER_VIDEO", "must be at least 1"));
    }
    if config.comments_per_video > MAX_COMMENTS_PER_VIDEO {
        return Err(invalid(
            "SENTIDO_COMMENTS_PER_VIDEO",
            "must be at most 50000",
        ));
    }
    if config.chunk_size == 0 {
        return Err(invalid("SENTIDO_CHUNK_SIZE", "must be at least 1"));
    }
    if config.top_k == 0 {
        return Err(invalid("SENTIDO_TOP_K", "must be at least 1"));
    }
    if config.num_clusters == 0 {
        return Err(invalid("SENTIDO_NUM_CLUSTERS", "must be at least 1"));
    }
    if config.generation_command.trim().is_empty() {
        return Err(invalid("SENTIDO_GENERATION_COMMAND", "must be non-empty"));
    }
    if config.generation_model.trim().is_empty() {
        return Err(invalid("SENTIDO_GENERATION_MODEL", "must be non-empty"));
    }
    Ok(())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
