//! Compiler invocation mining, one probe source at a time

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

use super::error::MiningError;
use super::filters::{chain, sort_line, FileNameFilter, Flag, FlagFilter};
use super::lookup::{identify_line, Pick};
use crate::transcript::{compiled_names, object_names, SourceKind, SourceMap, Stage, StageMap};
use crate::util::shell::{prefixed_join, PatternSet};

const INCLUDE_PREFIX: &str = "-I";

/// How one kind of source gets compiled
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolRecord {
    pub tool: String,
    pub include_paths: Vec<String>,
    pub flags: Vec<String>,
}

/// Finds the single COMPILATION line compiling the probe file at `path`
pub fn compile_line<'a>(
    stages: &'a StageMap,
    kind: SourceKind,
    path: &Path,
) -> Result<&'a str, MiningError> {
    // A quote may close the path when arduino-cli quotes arguments
    let pattern = format!(r#"{}["']?(\s|$)"#, regex::escape(&kind.compiled_name(path)));
    let matcher = PatternSet::new([pattern])?;

    identify_line(
        stages,
        Stage::Compilation,
        |line| matcher.matches_all(line),
        Pick::Unique,
    )
    .map_err(|err| match err {
        MiningError::MissingStage { stage, .. } => MiningError::MissingStage {
            stage,
            for_source: Some(kind),
        },
        other => other,
    })
}

/// Mines compiler, include paths and flags for every probe source
///
/// The compile-only flag, the output flag with its argument and the probe
/// file names are build specific and dropped before classification.
pub fn build_tokens(
    stages: &StageMap,
    sources: &SourceMap,
) -> Result<BTreeMap<SourceKind, ToolRecord>, MiningError> {
    let mut names = compiled_names(sources);
    names.extend(object_names(sources));

    let flags = FlagFilter::new([Flag::switch("-c"), Flag::with_argument("-o")]);
    let files = FileNameFilter::new(names);
    let cleaner = chain(&flags, &files);
    let sorter = FlagFilter::new([Flag::with_argument(INCLUDE_PREFIX)]);

    let mut records = BTreeMap::new();
    for (kind, path) in sources {
        let line = compile_line(stages, *kind, path)?;
        let sorted = sort_line(line, &cleaner, &sorter)?;

        let mut include_paths: Vec<String> = Vec::new();
        for token in sorted.claimed.iter().filter(|token| *token != INCLUDE_PREFIX) {
            let include = token.strip_prefix(INCLUDE_PREFIX).unwrap_or(token).to_string();
            if !include_paths.contains(&include) {
                include_paths.push(include);
            }
        }

        records.insert(
            *kind,
            ToolRecord {
                tool: sorted.program,
                include_paths,
                flags: sorted.unclaimed,
            },
        );
    }

    debug!(
        "Detected compilers:{}",
        prefixed_join(
            "\n\t",
            &records
                .iter()
                .map(|(kind, record)| format!("{}: {}", kind, record.tool))
                .collect::<Vec<_>>()
        )
    );
    for (kind, record) in &records {
        debug!(
            "Detected include paths for {}:{}",
            kind,
            prefixed_join("\n\t", &record.include_paths)
        );
        debug!("Detected build flags for {}:{}", kind, prefixed_join("\n\t", &record.flags));
    }

    Ok(records)
}
