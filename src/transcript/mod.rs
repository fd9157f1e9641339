//! Transcript parsing: sectioner, invocation filter and annotator
//!
//! Turns the raw verbose output of `arduino-cli compile` into a [`StageMap`]:
//! for each build stage, the ordered list of tool invocations it ran.

pub mod annotate;
pub mod filter;
pub mod sectioner;
pub mod types;

pub use annotate::{annotate, merge, parse_transcript, stage_for_title, ANNOTATIONS};
pub use filter::{
    invocation_filter, ExecutableResolver, KnownPrograms, PathResolver, SearchPathResolver,
};
pub use sectioner::sectioner;
pub use types::{
    compiled_names, object_names, source_map_for, Section, SourceKind, SourceMap, Stage, StageMap,
};
