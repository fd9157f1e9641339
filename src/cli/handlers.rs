//! Subcommand handlers
//!
//! Each handler returns the process exit code. Failures are printed as
//! `[ERROR] <class> occurred. <message>` on stderr.

use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info};

use super::commands::{DocumentArgs, HarvestArgs, MineArgs};
use crate::config::HarvestConfig;
use crate::error::HarvestError;
use crate::output::{copy_cache, OutputFormatter};
use crate::pipeline::{Harvest, HarvestPipeline, HarvestRequest};
use crate::progress::LoggingHandler;
use crate::transcript::{source_map_for, SearchPathResolver};

/// Runs a probe build and emits the document
///
/// `arguments` is echoed into the document as given (program name excluded).
pub fn handle_harvest(args: &HarvestArgs, config: &HarvestConfig, arguments: &[String]) -> i32 {
    info!(board = %args.board, "Starting harvest");
    exit_code(run_harvest(args, config, arguments))
}

/// Mines a captured transcript and emits the document
pub fn handle_mine(args: &MineArgs, arguments: &[String]) -> i32 {
    info!(transcript = %args.transcript.display(), "Mining transcript");
    exit_code(run_mine(args, arguments))
}

fn run_harvest(args: &HarvestArgs, config: &HarvestConfig, arguments: &[String]) -> Result<()> {
    config.validate().map_err(HarvestError::from)?;
    debug!("Configuration:\n{}", config);

    let tool = config
        .build_tool(args.properties.clone())
        .map_err(HarvestError::from)?;
    let request = HarvestRequest {
        board: args.board.clone(),
        libraries: args.libraries.clone(),
        output: args.document.output.clone(),
        sections: args.document.sections(),
    };

    let pipeline = HarvestPipeline::new(Arc::new(LoggingHandler));
    let harvest = pipeline.run(&tool, &request)?;
    emit(harvest, &args.document, arguments)
}

fn run_mine(args: &MineArgs, arguments: &[String]) -> Result<()> {
    let stdout = read_transcript(&args.transcript)?;
    let sources = source_map_for(Path::new(&args.sketch_name), &args.sketch_name);

    let pipeline = HarvestPipeline::new(Arc::new(LoggingHandler))
        .with_resolver(SearchPathResolver::new(args.search_path.clone()));
    let harvest = pipeline.run_transcript(
        &stdout,
        sources,
        &args.document.output,
        args.document.sections(),
    )?;
    emit(harvest, &args.document, arguments)
}

fn read_transcript(path: &Path) -> Result<String, HarvestError> {
    let result = if path == Path::new("-") {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text).map(|_| text)
    } else {
        fs::read_to_string(path)
    };
    result.map_err(|source| HarvestError::Transcript {
        path: path.to_path_buf(),
        source,
    })
}

/// Adds `arguments`, writes the document and exports the cache when asked
fn emit(harvest: Harvest, document_args: &DocumentArgs, arguments: &[String]) -> Result<()> {
    let mut document = harvest.document;
    if let Value::Object(members) = &mut document {
        members.insert("arguments".to_string(), Value::from(arguments.to_vec()));
    }

    let text = OutputFormatter::new(document_args.format.into())
        .format(&document)
        .map_err(HarvestError::from)?;

    match &document_args.json_file {
        Some(path) => {
            fs::write(path, &text)
                .with_context(|| format!("Failed to write document to {}", path.display()))?;
            info!(path = %path.display(), "Wrote document");
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(text.as_bytes())
                .and_then(|_| stdout.flush())
                .context("Failed to write document to stdout")?;
        }
    }

    if document_args.generate_code {
        copy_cache(&harvest.cache, &document_args.output).map_err(HarvestError::from)?;
    }
    Ok(())
}

fn exit_code(result: Result<()>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            error!(class = classification(&e), "Harvest failed");
            eprintln!("{}", report(&e));
            1
        }
    }
}

/// Classification of a failure; unclassified failures come from file output
pub fn classification(err: &anyhow::Error) -> &'static str {
    match err.downcast_ref::<HarvestError>() {
        Some(harvest_error) => harvest_error.classification(),
        None => "IoError",
    }
}

pub fn report(err: &anyhow::Error) -> String {
    match err.downcast_ref::<HarvestError>() {
        Some(harvest_error) => harvest_error.report(),
        None => format!("[ERROR] {} occurred. {:#}", classification(err), err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::OutputFormatArg;
    use crate::mining::MiningError;
    use crate::output::DocumentSections;
    use crate::transcript::{SourceMap, StageMap, Stage};
    use serde_json::json;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn document_args(output: PathBuf, json_file: Option<PathBuf>) -> DocumentArgs {
        DocumentArgs {
            output,
            json_file,
            detect_settings: true,
            includes: false,
            post_link: false,
            generate_code: false,
            format: OutputFormatArg::Json,
        }
    }

    fn harvest(cache: PathBuf) -> Harvest {
        Harvest {
            document: json!({"tools": {"CXX": "avr-g++"}}),
            cache,
            sources: SourceMap::new(),
            stages: StageMap::new(),
        }
    }

    #[test]
    fn test_emit_writes_document_with_arguments() {
        let temp_dir = TempDir::new().unwrap();
        let json_file = temp_dir.path().join("settings.json");
        let args = document_args(temp_dir.path().join("out"), Some(json_file.clone()));
        let arguments = vec!["harvest".to_string(), "-b".to_string(), "arduino:avr:uno".to_string()];

        emit(harvest(temp_dir.path().join("cache")), &args, &arguments).unwrap();

        let written: Value = serde_json::from_str(&fs::read_to_string(json_file).unwrap()).unwrap();
        assert_eq!(
            written,
            json!({
                "tools": {"CXX": "avr-g++"},
                "arguments": ["harvest", "-b", "arduino:avr:uno"]
            })
        );
        assert!(!temp_dir.path().join("out").exists());
    }

    #[test]
    fn test_emit_copies_cache_when_generating_code() {
        let temp_dir = TempDir::new().unwrap();
        let cache = temp_dir.path().join("cache");
        fs::create_dir_all(cache.join("core")).unwrap();
        fs::write(cache.join("core/core.a"), b"archive").unwrap();

        let mut args = document_args(
            temp_dir.path().join("out"),
            Some(temp_dir.path().join("settings.json")),
        );
        args.generate_code = true;

        emit(harvest(cache), &args, &[]).unwrap();
        assert!(temp_dir.path().join("out/core/core.a").exists());
    }

    #[test]
    fn test_missing_transcript() {
        let err = read_transcript(Path::new("/nonexistent/arduino-harvest/log.txt")).unwrap_err();
        assert_eq!(err.classification(), "IoError");
    }

    #[test]
    fn test_report_formats() {
        let err = anyhow::Error::from(HarvestError::from(MiningError::missing(Stage::Core)));
        assert_eq!(classification(&err), "MissingStage");
        assert_eq!(
            report(&err),
            "[ERROR] MissingStage occurred. Failed to find any output for build stage: CORE"
        );

        let err = anyhow::Error::from(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
            .context("Failed to write document to out.json");
        assert_eq!(
            report(&err),
            "[ERROR] IoError occurred. Failed to write document to out.json: denied"
        );
    }

    #[test]
    fn test_mine_with_invalid_transcript_path_exits_nonzero() {
        let args = MineArgs {
            transcript: PathBuf::from("/nonexistent/arduino-harvest/log.txt"),
            sketch_name: "probe".to_string(),
            search_path: vec![],
            document: document_args(PathBuf::from("out"), None),
        };
        assert_eq!(handle_mine(&args, &[]), 1);
    }

    #[test]
    fn test_sections_from_args() {
        let args = document_args(PathBuf::from("out"), None);
        assert_eq!(
            args.sections(),
            DocumentSections {
                detect: true,
                ..Default::default()
            }
        );
    }
}
