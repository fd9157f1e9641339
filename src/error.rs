//! Top-level error type and user-facing failure classification

use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;
use crate::mining::MiningError;
use crate::output::OutputError;
use crate::probe::BuildError;

/// Any failure that aborts a harvest run
#[derive(Error, Debug)]
pub enum HarvestError {
    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Mining(#[from] MiningError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Output(#[from] OutputError),

    #[error("Failed to read transcript {}: {source}", .path.display())]
    Transcript {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl HarvestError {
    /// Error class printed in the `[ERROR] <class> occurred.` line
    pub fn classification(&self) -> &'static str {
        match self {
            HarvestError::Build(BuildError::Sketch(_)) => "IoError",
            HarvestError::Build(_) => "BuildFailure",
            HarvestError::Mining(e) => e.classification(),
            HarvestError::Config(_) => "ConfigurationError",
            HarvestError::Output(e) => e.classification(),
            HarvestError::Transcript { .. } => "IoError",
        }
    }

    /// Extra diagnostic text, such as the build tool's stderr
    pub fn verbose(&self) -> Option<String> {
        match self {
            HarvestError::Build(e) => e.verbose(),
            _ => None,
        }
    }

    /// The full report for stderr
    pub fn report(&self) -> String {
        let mut report = format!("[ERROR] {} occurred. {}", self.classification(), self);
        if let Some(verbose) = self.verbose().filter(|text| !text.is_empty()) {
            report.push_str("\n\t");
            report.push_str(&verbose);
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::Stage;

    #[test]
    fn test_classifications() {
        let err: HarvestError = MiningError::missing(Stage::Core).into();
        assert_eq!(err.classification(), "MissingStage");

        let err: HarvestError = ConfigError::ValidationFailed("x".to_string()).into();
        assert_eq!(err.classification(), "ConfigurationError");

        let err: HarvestError = BuildError::Failed {
            program: "arduino-cli".to_string(),
            code: Some(1),
            stderr: String::new(),
        }
        .into();
        assert_eq!(err.classification(), "BuildFailure");

        let err = HarvestError::Transcript {
            path: PathBuf::from("/missing.txt"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(err.classification(), "IoError");
    }

    #[test]
    fn test_report_includes_build_stderr() {
        let err: HarvestError = BuildError::Failed {
            program: "arduino-cli".to_string(),
            code: Some(1),
            stderr: "Error during build: Platform 'arduino:avr' not found\nTry installing it".to_string(),
        }
        .into();
        assert_eq!(
            err.report(),
            "[ERROR] BuildFailure occurred. arduino-cli failed with return code: 1\n\
             \tError during build: Platform 'arduino:avr' not found\n\
             \tTry installing it"
        );
    }

    #[test]
    fn test_report_for_mining_error() {
        let err: HarvestError = MiningError::missing(Stage::Link).into();
        assert_eq!(
            err.report(),
            "[ERROR] MissingStage occurred. Failed to find any output for build stage: LINK"
        );
    }
}
