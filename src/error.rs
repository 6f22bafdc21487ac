//! Error type shared by the library and the CLI.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmotionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unknown emotion: {0}")]
    UnknownEmotion(String),

    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    #[error("Document extraction failed: {0}")]
    Document(String),

    #[error("Path does not exist: {0}")]
    MissingPath(PathBuf),

    #[error("No input text to analyze")]
    EmptyInput,

    #[error("No file could be analyzed ({0} failed)")]
    NothingAnalyzed(usize),

    #[error("Invalid {name}: {value} (expected a finite number >= 0)")]
    InvalidSetting { name: &'static str, value: f64 },
}

pub type Result<T> = std::result::Result<T, EmotionError>;

/// Rejects negative and non-finite weights and factors.
pub(crate) fn non_negative(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(EmotionError::InvalidSetting { name, value })
    }
}
