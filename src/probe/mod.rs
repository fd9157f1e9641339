//! Probe build harness
//!
//! Creates a throwaway sketch containing one file per [`SourceKind`](crate::transcript::SourceKind),
//! compiles it with arduino-cli in verbose clean-rebuild mode, and hands the
//! console transcript to the parser.

pub mod runner;
pub mod sketch;

pub use runner::{run_probe_build, ArduinoCli, BuildError, BuildOutput, BuildTool, ProbeBuild};
pub use sketch::{make_sketch, sketch_source};
