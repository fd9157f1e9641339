use std::path::PathBuf;
use thiserror::Error;

/// Failures while emitting the harvested document or copying the cache
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to serialize document to JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to serialize document to YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to walk sketch cache: {0}")]
    Walk(#[from] walkdir::Error),
}

impl OutputError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        OutputError::Io {
            action,
            path: path.into(),
            source,
        }
    }

    pub fn classification(&self) -> &'static str {
        match self {
            OutputError::Json(_) | OutputError::Yaml(_) => "SerializationError",
            OutputError::Io { .. } | OutputError::Walk(_) => "IoError",
        }
    }
}
