//! Mining failures

use thiserror::Error;

use crate::transcript::{SourceKind, Stage};
use crate::util::TokenizeError;

#[derive(Error, Debug)]
pub enum MiningError {
    /// A required stage has no (matching) lines at all
    #[error("Failed to find any output for build stage: {stage}{}", source_suffix(.for_source))]
    MissingStage {
        stage: Stage,
        for_source: Option<SourceKind>,
    },

    /// More than one line matched a lookup that must be unique
    #[error("Found multiple invocations in build stage {stage}:\n\t{}", .lines.join("\n\t"))]
    MultipleInvocation { stage: Stage, lines: Vec<String> },

    #[error(transparent)]
    Tokenization(#[from] TokenizeError),

    #[error("No tokens available in line: '{0}'")]
    EmptyInvocation(String),

    /// Token classification left tokens no rule accounts for
    #[error("Internal consistency failure: {0}")]
    InternalConsistency(String),

    #[error("Invalid match pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

fn source_suffix(for_source: &Option<SourceKind>) -> String {
    for_source
        .map(|kind| format!(" (invocation for {})", kind))
        .unwrap_or_default()
}

impl MiningError {
    pub fn missing(stage: Stage) -> Self {
        MiningError::MissingStage {
            stage,
            for_source: None,
        }
    }

    /// Classification shown to users
    pub fn classification(&self) -> &'static str {
        match self {
            MiningError::MissingStage { .. } => "MissingStage",
            MiningError::MultipleInvocation { .. } => "MultipleInvocation",
            MiningError::Tokenization(_) | MiningError::EmptyInvocation(_) => {
                "TokenizationFailure"
            }
            MiningError::InternalConsistency(_) | MiningError::InvalidPattern(_) => {
                "InternalConsistency"
            }
        }
    }
}
