//! Maps announced section titles onto build stages

use tracing::{debug, warn};

use super::filter::{invocation_filter, ExecutableResolver};
use super::sectioner::sectioner;
use super::types::{Section, Stage, StageMap};

/// Announcement titles arduino-cli prints for each stage
pub const ANNOTATIONS: &[(&str, Stage)] = &[
    ("Detecting libraries used...", Stage::LibraryDetection),
    ("Generating function prototypes...", Stage::Prototypes),
    ("Compiling sketch...", Stage::Compilation),
    ("Compiling libraries...", Stage::Libraries),
    ("Compiling core...", Stage::Core),
    ("Linking everything together...", Stage::Link),
];

/// Stage announced by `title`, `Stage::Unknown` when the title is not recognized
pub fn stage_for_title(title: &str) -> Stage {
    ANNOTATIONS
        .iter()
        .find(|(known, _)| *known == title)
        .map(|(_, stage)| *stage)
        .unwrap_or(Stage::Unknown)
}

/// Pairs each section with its stage, preserving section order
pub fn annotate(sections: &[Section]) -> Vec<(Stage, &Section)> {
    sections
        .iter()
        .map(|section| (stage_for_title(&section.title), section))
        .collect()
}

/// Merges annotated sections into a stage map, concatenating same-stage sections in order
pub fn merge(annotated: &[(Stage, &Section)]) -> StageMap {
    let unknown: Vec<&str> = annotated
        .iter()
        .filter(|(stage, _)| *stage == Stage::Unknown)
        .map(|(_, section)| section.title.as_str())
        .collect();
    if !unknown.is_empty() {
        warn!(
            "Unknown sections detected with titles: {}",
            unknown.join(",")
        );
    }

    let mut stages = StageMap::new();
    for (stage, section) in annotated {
        stages.extend(*stage, section.lines.iter().cloned());
    }
    stages
}

/// Parses raw arduino-cli standard output into invocation lines per stage
pub fn parse_transcript<R>(stdout: &str, resolver: &R) -> StageMap
where
    R: ExecutableResolver + ?Sized,
{
    let sections: Vec<Section> = sectioner(stdout)
        .into_iter()
        .map(|section| {
            let lines = invocation_filter(&section.lines, resolver);
            Section::new(section.title, lines)
        })
        .collect();

    let stages = merge(&annotate(&sections));
    debug!("Detected build stages:{}", stages);
    stages
}
