//! Locating specific invocation lines inside a stage

use super::error::MiningError;
use crate::transcript::{Stage, StageMap};

/// Which of several matching lines a lookup settles on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pick {
    /// Exactly one line may match
    Unique,
    First,
    Last,
}

/// Finds the line of `stage` accepted by `matcher`
///
/// No match is reported as [`MiningError::MissingStage`]; more than one match
/// under [`Pick::Unique`] as [`MiningError::MultipleInvocation`].
pub fn identify_line<'a, M>(
    stages: &'a StageMap,
    stage: Stage,
    matcher: M,
    pick: Pick,
) -> Result<&'a str, MiningError>
where
    M: Fn(&str) -> bool,
{
    let matching: Vec<&str> = stages
        .lines(stage)
        .iter()
        .map(String::as_str)
        .filter(|line| matcher(line))
        .collect();

    match (pick, matching.as_slice()) {
        (_, []) => Err(MiningError::missing(stage)),
        (Pick::Unique, [line]) => Ok(*line),
        (Pick::Unique, lines) => Err(MiningError::MultipleInvocation {
            stage,
            lines: lines.iter().map(|line| line.to_string()).collect(),
        }),
        (Pick::First, [first, ..]) => Ok(*first),
        (Pick::Last, [.., last]) => Ok(*last),
    }
}
