//! YAML-backed lists driving the pipeline: the videos to harvest and the
//! research questions to answer.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoSource {
    pub id: String,
    /// Free-text note on what the video is about.
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VideosFile {
    pub videos: Vec<VideoSource>,
}

impl VideosFile {
    /// Video IDs in file order.
    #[must_use]
    pub fn ids(&self) -> Vec<String> {
        self.videos.iter().map(|v| v.id.clone()).collect()
    }
}

#[derive(Debug, Deserialize)]
pub struct QuestionsFile {
    pub questions: Vec<String>,
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|e| ConfigError::SourcesFileIo {
        path: path.display().to_string(),
        source: e,
    })
}

/// Load and validate the video list from a YAML file. Ids are trimmed.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_videos(path: &Path) -> Result<VideosFile, ConfigError> {
    let content = read_file(path)?;
    let mut videos_file: VideosFile = serde_yaml::from_str(&content)?;
    for video in &mut videos_file.videos {
        video.id = video.id.trim().to_string();
    }
    validate_videos(&videos_file)?;
    Ok(videos_file)
}

/// Load and validate the research questions from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_questions(path: &Path) -> Result<QuestionsFile, ConfigError> {
    let content = read_file(path)?;
    let questions_file: QuestionsFile = serde_yaml::from_str(&content)?;
    validate_questions(&questions_file)?;
    Ok(questions_file)
}

fn validate_videos(videos_file: &VideosFile) -> Result<(), ConfigError> {
    if videos_file.videos.is_empty() {
        return Err(ConfigError::Validation(
            "video list must contain at least one entry".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for video in &videos_file.videos {
        let id = video.id.trim();
        if id.is_empty() {
            return Err(ConfigError::Validation(
                "video id must be non-empty".to_string(),
            ));
        }
        if id.chars().any(char::is_whitespace) {
            return Err(ConfigError::Validation(format!(
                "video id '{id}' must not contain whitespace"
            )));
        }
        if !seen.insert(id.to_string()) {
            return Err(ConfigError::Validation(format!(
                "duplicate video id: '{id}'"
            )));
        }
    }

    Ok(())
}

fn validate_questions(questions_file: &QuestionsFile) -> Result<(), ConfigError> {
    if questions_file.questions.is_empty() {
        return Err(ConfigError::Validation(
            "question list must contain at least one entry".to_string(),
        ));
    }
    if let Some(pos) = questions_file
        .questions
        .iter()
        .position(|q| q.trim().is_empty())
    {
        return Err(ConfigError::Validation(format!(
            "question {} is blank",
            pos + 1
        )));
    }
    Ok(())
}
