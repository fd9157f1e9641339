//! Serialization of the harvested document
//!
//! JSON is what downstream build systems consume; YAML is offered for
//! reading and diffing by hand.

use serde::Serialize;

use super::OutputError;

/// Output format enumeration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Pretty-printed JSON (machine-readable)
    #[default]
    Json,
    /// YAML (human-friendly, version-control friendly)
    Yaml,
}

/// Formats documents in the configured format
pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format_kind(&self) -> OutputFormat {
        self.format
    }

    pub fn format<T: Serialize + ?Sized>(&self, document: &T) -> Result<String, OutputError> {
        match self.format {
            OutputFormat::Json => {
                let mut text = serde_json::to_string_pretty(document)?;
                text.push('\n');
                Ok(text)
            }
            OutputFormat::Yaml => Ok(serde_yaml::to_string(document)?),
        }
    }
}
