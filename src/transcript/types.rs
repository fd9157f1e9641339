//! Core types shared by the transcript parser and the miner

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::util::shell::prefixed_join;

/// Named phase of an arduino-cli build transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    LibraryDetection,
    Prototypes,
    Compilation,
    Libraries,
    Core,
    Link,
    Unknown,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::LibraryDetection => "LIBRARY_DETECTION",
            Stage::Prototypes => "PROTOTYPES",
            Stage::Compilation => "COMPILATION",
            Stage::Libraries => "LIBRARIES",
            Stage::Core => "CORE",
            Stage::Link => "LINK",
            Stage::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Probe file categories compiled by the synthetic build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SourceKind {
    C,
    Cpp,
    Asm,
    /// The sketch entry file; arduino-cli preprocesses it into a `.cpp` before compiling
    Sketch,
}

impl SourceKind {
    pub const ALL: [SourceKind; 4] = [
        SourceKind::C,
        SourceKind::Cpp,
        SourceKind::Asm,
        SourceKind::Sketch,
    ];

    /// Extension of the probe file on disk
    pub fn extension(&self) -> &'static str {
        match self {
            SourceKind::C => "c",
            SourceKind::Cpp => "cpp",
            SourceKind::Asm => "S",
            SourceKind::Sketch => "ino",
        }
    }

    /// Label used for this kind inside a freshly mined document
    pub fn label(&self) -> &'static str {
        match self {
            SourceKind::C => "source:C",
            SourceKind::Cpp => "source:CPP",
            SourceKind::Asm => "source:ASM",
            SourceKind::Sketch => "source:INO",
        }
    }

    /// Tag the label is rewritten to in the emitted document
    pub fn external_tag(&self) -> &'static str {
        match self {
            SourceKind::C => "C",
            SourceKind::Cpp => "CXX",
            SourceKind::Asm => "ASM",
            SourceKind::Sketch => "INO",
        }
    }

    /// Name of the file the compiler actually sees for a probe file at `path`
    pub fn compiled_name(&self, path: &Path) -> String {
        let name = file_name(path);
        match self {
            SourceKind::Sketch => format!("{}.cpp", name),
            _ => name,
        }
    }

    /// Name of the object file produced for a probe file at `path`
    pub fn object_name(&self, path: &Path) -> String {
        format!("{}.o", self.compiled_name(path))
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "*.{}", self.extension())
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Probe files used for one build, keyed by kind
pub type SourceMap = BTreeMap<SourceKind, PathBuf>;

/// Builds the source map for a sketch directory named `sketch_name` under `dir`
pub fn source_map_for(dir: &Path, sketch_name: &str) -> SourceMap {
    SourceKind::ALL
        .iter()
        .map(|kind| {
            (
                *kind,
                dir.join(format!("{}.{}", sketch_name, kind.extension())),
            )
        })
        .collect()
}

/// Compiled names of every probe file, in source map order
pub fn compiled_names(sources: &SourceMap) -> Vec<String> {
    sources
        .iter()
        .map(|(kind, path)| kind.compiled_name(path))
        .collect()
}

/// Object names of every probe file, in source map order
pub fn object_names(sources: &SourceMap) -> Vec<String> {
    sources
        .iter()
        .map(|(kind, path)| kind.object_name(path))
        .collect()
}

/// An announced transcript section: the announcement line and what followed it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    pub lines: Vec<String>,
}

impl Section {
    pub fn new(title: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            title: title.into(),
            lines,
        }
    }
}

/// Invocation lines grouped by stage, stages kept in order of first appearance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageMap {
    entries: Vec<(Stage, Vec<String>)>,
}

impl StageMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends lines to a stage, creating the stage entry on first use
    pub fn extend(&mut self, stage: Stage, lines: impl IntoIterator<Item = String>) {
        match self.entries.iter_mut().find(|(existing, _)| *existing == stage) {
            Some((_, existing_lines)) => existing_lines.extend(lines),
            None => self.entries.push((stage, lines.into_iter().collect())),
        }
    }

    /// Lines for `stage`; empty when the stage never appeared
    pub fn lines(&self, stage: Stage) -> &[String] {
        self.entries
            .iter()
            .find(|(existing, _)| *existing == stage)
            .map(|(_, lines)| lines.as_slice())
            .unwrap_or(&[])
    }

    pub fn contains(&self, stage: Stage) -> bool {
        self.entries.iter().any(|(existing, _)| *existing == stage)
    }

    pub fn stages(&self) -> impl Iterator<Item = Stage> + '_ {
        self.entries.iter().map(|(stage, _)| *stage)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Stage, &[String])> {
        self.entries
            .iter()
            .map(|(stage, lines)| (*stage, lines.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for StageMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (stage, lines) in &self.entries {
            write!(f, "\n\t{}{}", stage, prefixed_join("\n\t\t", lines))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_display() {
        assert_eq!(Stage::LibraryDetection.to_string(), "LIBRARY_DETECTION");
        assert_eq!(Stage::Link.to_string(), "LINK");
    }

    #[test]
    fn test_compiled_and_object_names() {
        let path = Path::new("/tmp/harvest_x/harvest_x.ino");
        assert_eq!(SourceKind::Sketch.compiled_name(path), "harvest_x.ino.cpp");
        assert_eq!(SourceKind::Sketch.object_name(path), "harvest_x.ino.cpp.o");

        let path = Path::new("/tmp/harvest_x/harvest_x.S");
        assert_eq!(SourceKind::Asm.compiled_name(path), "harvest_x.S");
        assert_eq!(SourceKind::Asm.object_name(path), "harvest_x.S.o");
    }

    #[test]
    fn test_source_map_for() {
        let sources = source_map_for(Path::new("/tmp/probe"), "probe");
        assert_eq!(sources.len(), 4);
        assert_eq!(sources[&SourceKind::Cpp], PathBuf::from("/tmp/probe/probe.cpp"));
        assert_eq!(
            object_names(&sources),
            vec!["probe.c.o", "probe.cpp.o", "probe.S.o", "probe.ino.cpp.o"]
        );
    }

    #[test]
    fn test_stage_map_merges_in_order() {
        let mut map = StageMap::new();
        map.extend(Stage::Core, vec!["a".to_string()]);
        map.extend(Stage::Link, vec!["l".to_string()]);
        map.extend(Stage::Core, vec!["b".to_string()]);

        assert_eq!(map.lines(Stage::Core), ["a", "b"]);
        assert_eq!(map.stages().collect::<Vec<_>>(), vec![Stage::Core, Stage::Link]);
        assert!(map.lines(Stage::Compilation).is_empty());
        assert!(!map.contains(Stage::Compilation));
    }

    #[test]
    fn test_stage_map_display() {
        let mut map = StageMap::new();
        map.extend(Stage::Link, vec!["ld a.o".to_string()]);
        assert_eq!(map.to_string(), "\n\tLINK\n\t\tld a.o");
    }
}
