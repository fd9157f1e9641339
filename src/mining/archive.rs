//! Core archive mining: archiver invocation and the sketch cache location

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::error::MiningError;
use super::filters::{sort_line, PatternFilter};
use super::lookup::{identify_line, Pick};
use crate::transcript::{Stage, StageMap};
use crate::util::shell::{prefixed_join, split_line, PatternSet};

/// Marker identifying the core archive in CORE stage lines
pub const ARCHIVE_MARKER: &str = r"core\.a";
const ARCHIVE_FILE: &str = "core.a";

/// How the core archive gets built
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveRecord {
    pub archiver: String,
    pub flags: Vec<String>,
}

/// The authoritative archiver line: the last CORE line touching the core archive
pub fn archive_line(stages: &StageMap) -> Result<&str, MiningError> {
    let marker = PatternSet::new([ARCHIVE_MARKER])?;
    let line = identify_line(stages, Stage::Core, |line| marker.matches_any(line), Pick::Last)?;
    debug!("Archive line: {}", line);
    Ok(line)
}

/// Archiver options whose value is the following token
const ARGUMENT_OPTIONS: &[&str] = &["--plugin", "--target", "--output"];

/// Claims path-like tokens that are neither options nor an option's value
fn residue(tokens: &[String]) -> Vec<bool> {
    tokens
        .iter()
        .enumerate()
        .map(|(index, token)| {
            let option_value = index
                .checked_sub(1)
                .is_some_and(|previous| ARGUMENT_OPTIONS.contains(&tokens[previous].as_str()));
            !token.starts_with('-') && !option_value && token.contains(['/', '\\'])
        })
        .collect()
}

/// Mines archiver and flags from the archive line
///
/// Once the archive and its members are removed every remaining argument is
/// an archiver flag, including the values of options such as `--plugin`. Any
/// other leftover path is a token no rule accounts for and fails the run.
pub fn archive_tokens(stages: &StageMap) -> Result<ArchiveRecord, MiningError> {
    let line = archive_line(stages)?;
    let cleaner = PatternFilter::new([r"core\.a$", r"\.o$"])?;
    let sorted = sort_line(line, &cleaner, &residue)?;

    if !sorted.claimed.is_empty() {
        return Err(MiningError::InternalConsistency(format!(
            "unexpected archiver tokens: {}",
            sorted.claimed.join(" ")
        )));
    }

    let record = ArchiveRecord {
        archiver: sorted.program,
        flags: sorted.unclaimed,
    };
    debug!("Detected archive tool: {}", record.archiver);
    debug!("Detected archive flags:{}", prefixed_join("\n\t", &record.flags));
    Ok(record)
}

/// Locates the build cache arduino-cli used: two levels above the core archive
pub fn sketch_cache(stages: &StageMap) -> Result<PathBuf, MiningError> {
    if stages.lines(Stage::Core).is_empty() {
        return Err(MiningError::missing(Stage::Core));
    }

    let line = archive_line(stages)?;
    let archive = split_line(line)?
        .into_iter()
        .find(|token| token.ends_with(ARCHIVE_FILE))
        .ok_or_else(|| {
            MiningError::InternalConsistency(format!("no {} token in '{}'", ARCHIVE_FILE, line))
        })?;

    let cache = Path::new(&archive)
        .parent()
        .and_then(Path::parent)
        .filter(|cache| !cache.as_os_str().is_empty())
        .ok_or_else(|| {
            MiningError::InternalConsistency(format!("{} has no cache directory", archive))
        })?
        .to_path_buf();

    debug!("Found Arduino sketch cache: {}", cache.display());
    Ok(cache)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn core_stage(lines: &[&str]) -> StageMap {
        let mut stages = StageMap::new();
        stages.extend(Stage::Core, lines.iter().map(|s| s.to_string()));
        stages
    }

    #[test]
    fn test_last_archive_line_wins() {
        let stages = core_stage(&[
            r#""/opt/avr/bin/avr-gcc-ar" rcs "/tmp/arduino/sketches/ABC/core/core.a" "/tmp/arduino/sketches/ABC/core/wiring.c.o""#,
            r#""/opt/avr/bin/avr-gcc" -c -g wiring_pulse.c -o wiring_pulse.c.o"#,
            r#""/opt/avr/bin/avr-gcc-ar" rcsT "/tmp/arduino/sketches/ABC/core/core.a" "/tmp/arduino/sketches/ABC/core/main.cpp.o""#,
        ]);

        let record = archive_tokens(&stages).unwrap();
        assert_eq!(record.archiver, "/opt/avr/bin/avr-gcc-ar");
        assert_eq!(record.flags, vec!["rcsT"]);

        assert_eq!(
            sketch_cache(&stages).unwrap(),
            PathBuf::from("/tmp/arduino/sketches/ABC")
        );
    }

    #[test]
    fn test_plugin_path_is_a_flag() {
        let stages = core_stage(&[
            "ar rcs --plugin /usr/lib/gcc/avr/7.3.0/liblto_plugin.so /b/core/core.a /b/core/x.o",
        ]);
        let record = archive_tokens(&stages).unwrap();
        assert_eq!(record.archiver, "ar");
        assert_eq!(
            record.flags,
            vec!["rcs", "--plugin", "/usr/lib/gcc/avr/7.3.0/liblto_plugin.so"]
        );

        let stages = core_stage(&["ar rcs --plugin=/usr/lib/liblto_plugin.so /b/core/core.a"]);
        assert_eq!(
            archive_tokens(&stages).unwrap().flags,
            vec!["rcs", "--plugin=/usr/lib/liblto_plugin.so"]
        );
    }

    #[test]
    fn test_unrecognized_archiver_token() {
        let stages = core_stage(&["ar rcs /b/core/core.a /b/core/x.o /b/core/notes.txt"]);
        let err = archive_tokens(&stages).unwrap_err();
        assert!(matches!(err, MiningError::InternalConsistency(ref msg) if msg.contains("notes.txt")));
    }

    #[test]
    fn test_empty_core_stage() {
        let stages = core_stage(&[]);
        let err = sketch_cache(&stages).unwrap_err();
        assert!(matches!(err, MiningError::MissingStage { stage: Stage::Core, .. }));

        let err = sketch_cache(&StageMap::new()).unwrap_err();
        assert!(matches!(err, MiningError::MissingStage { stage: Stage::Core, .. }));
    }

    #[test]
    fn test_core_without_archive() {
        let stages = core_stage(&["avr-gcc -c wiring.c -o wiring.c.o"]);
        assert!(matches!(
            archive_tokens(&stages).unwrap_err(),
            MiningError::MissingStage { stage: Stage::Core, .. }
        ));
    }

    #[test]
    fn test_shallow_archive_path() {
        let stages = core_stage(&["ar rcs core.a x.o"]);
        assert!(matches!(
            sketch_cache(&stages).unwrap_err(),
            MiningError::InternalConsistency(_)
        ));
    }
}
