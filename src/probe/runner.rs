//! Running arduino-cli against a probe sketch

use std::path::Path;
use std::process::Command;
use thiserror::Error;
use tracing::{debug, info};

use super::sketch::make_sketch;
use crate::transcript::SourceMap;

/// Prefix of the probe directory; sketch names must not start with a dot
const PROBE_PREFIX: &str = "harvest_";

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Failed to launch {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    /// The build tool ran and reported failure
    #[error("{program} failed with return code: {}", .code.map(|c| c.to_string()).unwrap_or_else(|| "signal".to_string()))]
    Failed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Failed to prepare probe sketch: {0}")]
    Sketch(#[from] std::io::Error),
}

impl BuildError {
    /// Diagnostic text the build tool printed, tab-indented per line
    pub fn verbose(&self) -> Option<String> {
        match self {
            BuildError::Failed { stderr, .. } => Some(stderr.lines().collect::<Vec<_>>().join("\n\t")),
            _ => None,
        }
    }
}

/// Raw console output of one build
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Something that can compile a sketch directory for a board
pub trait BuildTool {
    fn compile(&self, board: &str, sketch_dir: &Path) -> Result<BuildOutput, BuildError>;
}

/// The real `arduino-cli compile`
#[derive(Debug, Clone)]
pub struct ArduinoCli {
    program: String,
    properties: Vec<String>,
    extra_args: Vec<String>,
}

impl Default for ArduinoCli {
    fn default() -> Self {
        Self::new("arduino-cli")
    }
}

impl ArduinoCli {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            properties: Vec::new(),
            extra_args: Vec::new(),
        }
    }

    /// Build properties forwarded as `--build-property`
    pub fn with_properties(mut self, properties: Vec<String>) -> Self {
        self.properties = properties;
        self
    }

    /// Arguments passed through verbatim before the sketch directory
    pub fn with_extra_args(mut self, extra_args: Vec<String>) -> Self {
        self.extra_args = extra_args;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Full argument list for a verbose, clean build of `sketch_dir`
    pub fn arguments(&self, board: &str, sketch_dir: &Path) -> Vec<String> {
        let mut arguments: Vec<String> = ["compile", "-v", "--clean", "-b", board]
            .iter()
            .map(|s| s.to_string())
            .collect();
        for property in &self.properties {
            arguments.push("--build-property".to_string());
            arguments.push(property.clone());
        }
        arguments.extend(self.extra_args.iter().cloned());
        arguments.push(sketch_dir.to_string_lossy().into_owned());
        arguments
    }
}

impl BuildTool for ArduinoCli {
    fn compile(&self, board: &str, sketch_dir: &Path) -> Result<BuildOutput, BuildError> {
        let arguments = self.arguments(board, sketch_dir);
        debug!("Invoking: {} {}", self.program, arguments.join(" "));

        let output = Command::new(&self.program)
            .args(&arguments)
            .output()
            .map_err(|source| BuildError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        if !output.status.success() {
            return Err(BuildError::Failed {
                program: self.program.clone(),
                code: output.status.code(),
                stderr,
            });
        }
        Ok(BuildOutput { stdout, stderr })
    }
}

/// Probe files and console output of a finished probe build
#[derive(Debug, Clone)]
pub struct ProbeBuild {
    pub sources: SourceMap,
    pub stdout: String,
    pub stderr: String,
}

/// Builds a fresh probe sketch for `board` and captures the transcript
///
/// The probe directory is removed when this returns, whatever the outcome.
pub fn run_probe_build<T>(tool: &T, board: &str, libraries: &[String]) -> Result<ProbeBuild, BuildError>
where
    T: BuildTool + ?Sized,
{
    let probe_dir = tempfile::Builder::new().prefix(PROBE_PREFIX).tempdir()?;
    let sources = make_sketch(probe_dir.path(), libraries)?;

    info!(board, dir = %probe_dir.path().display(), "Running probe build");
    let output = tool.compile(board, probe_dir.path())?;

    Ok(ProbeBuild {
        sources,
        stdout: output.stdout,
        stderr: output.stderr,
    })
}
