//! Linker invocation and post-link step mining

use serde::Serialize;
use tracing::debug;

use super::error::MiningError;
use super::filters::{chain, sort_line, FileNameFilter, Flag, FlagFilter, PatternFilter, TokenFilter};
use super::lookup::{identify_line, Pick};
use crate::transcript::{object_names, SourceMap, Stage, StageMap};
use crate::util::shell::{prefixed_join, PatternSet};

const OBJECT_PATTERNS: &[&str] = &[r"\.o$"];
const LIBRARY_PATTERNS: &[&str] = &[r"\.a$", r"^-l", r"^--start-group$", r"^--end-group$"];

/// How the final executable gets linked
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkRecord {
    pub linker: String,
    pub flags: Vec<String>,
    pub objects: Vec<String>,
    pub libraries: Vec<String>,
}

/// Finds the LINK line that names every probe object
pub fn link_line<'a>(stages: &'a StageMap, sources: &SourceMap) -> Result<&'a str, MiningError> {
    let objects = PatternSet::literal(object_names(sources));
    let line = identify_line(
        stages,
        Stage::Link,
        |line| objects.matches_all(line),
        Pick::First,
    )?;
    debug!("Linking line: {}", line);
    Ok(line)
}

/// Mines linker, flags, extra objects and libraries from the link line
pub fn link_tokens(stages: &StageMap, sources: &SourceMap) -> Result<LinkRecord, MiningError> {
    let line = link_line(stages, sources)?;

    let output = FlagFilter::new([Flag::with_argument("-o")]);
    let probe_objects = FileNameFilter::new(object_names(sources));
    let cleaner = chain(&output, &probe_objects);

    let objects = PatternFilter::new(OBJECT_PATTERNS.iter().copied())?;
    let libraries = PatternFilter::new(LIBRARY_PATTERNS.iter().copied())?;
    let linkables = PatternFilter::new(OBJECT_PATTERNS.iter().chain(LIBRARY_PATTERNS).copied())?;

    let sorted = sort_line(line, &cleaner, &linkables)?;
    let record = LinkRecord {
        linker: sorted.program,
        flags: sorted.unclaimed,
        objects: objects.apply(&sorted.claimed, true),
        libraries: libraries.apply(&sorted.claimed, true),
    };

    debug!("Detected linker: {}", record.linker);
    debug!("Detected linker flags:{}", prefixed_join("\n\t", &record.flags));
    debug!("Detected link libraries:{}", prefixed_join("\n\t", &record.libraries));
    debug!("Detected link objects:{}", prefixed_join("\n\t", &record.objects));
    Ok(record)
}

/// LINK lines after the link line, verbatim
pub fn post_link_lines(stages: &StageMap, sources: &SourceMap) -> Result<Vec<String>, MiningError> {
    let line = link_line(stages, sources)?;
    let lines = stages.lines(Stage::Link);
    let steps: Vec<String> = lines
        .iter()
        .position(|candidate| candidate == line)
        .map(|index| lines[index + 1..].to_vec())
        .unwrap_or_default();

    debug!("Post link steps:{}", prefixed_join("\n\t", &steps));
    Ok(steps)
}
