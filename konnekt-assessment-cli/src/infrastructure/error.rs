use konnekt_assessment_core::{CaptureError, ConfigError};
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Capture failed: {0}")]
    Capture(#[from] CaptureError),

    #[error("Schema generation failed: {0}")]
    SchemaGeneration(String),

    #[error("Invalid schema directory: {path}")]
    InvalidSchemaDirectory { path: PathBuf },

    #[error("Invalid question file {path}: {reason}")]
    InvalidQuestionFile { path: PathBuf, reason: String },

    #[error("Unknown question: {0}")]
    UnknownQuestion(String),

    #[error("Question {0} does not take a spoken response")]
    NotSpoken(String),
}

impl CliError {
    pub fn invalid_directory(path: PathBuf) -> Self {
        CliError::InvalidSchemaDirectory { path }
    }

    pub fn invalid_questions(path: PathBuf, reason: impl Into<String>) -> Self {
        CliError::InvalidQuestionFile {
            path,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CliError>;
