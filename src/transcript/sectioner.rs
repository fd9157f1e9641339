//! Splits raw arduino-cli output into announced sections
//!
//! arduino-cli announces each build phase with a line ending in `...`
//! ("Compiling sketch...", "Linking everything together..."). Everything up to
//! the next announcement belongs to that phase.

use super::types::Section;

const ANNOUNCEMENT_SUFFIX: &str = "...";

/// True iff the trimmed line is a section announcement
pub fn is_announcement(line: &str) -> bool {
    line.trim().ends_with(ANNOUNCEMENT_SUFFIX)
}

/// Splits `stdout` into ordered sections
///
/// Lines are trimmed. Output before the first announcement carries no stage
/// and is discarded; adjacent announcements produce empty sections.
pub fn sectioner(stdout: &str) -> Vec<Section> {
    let mut sections: Vec<Section> = Vec::new();

    for line in stdout.lines().map(str::trim) {
        if is_announcement(line) {
            sections.push(Section::new(line, Vec::new()));
        } else if let Some(current) = sections.last_mut() {
            current.lines.push(line.to_string());
        }
    }

    sections
}
