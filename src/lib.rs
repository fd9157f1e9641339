//! arduino-harvest - toolchain settings mined from arduino-cli
//!
//! arduino-cli knows how to compile for every installed board, but only tells
//! you when asked to build a sketch verbosely. This library builds a throwaway
//! probe sketch, parses the verbose transcript and extracts the compilers,
//! flags, include paths, linker, archiver and post-link steps it used, so a
//! foreign build system can reproduce the build.
//!
//! # Example Usage
//!
//! ```no_run
//! use arduino_harvest::output::DocumentSections;
//! use arduino_harvest::pipeline::{HarvestPipeline, HarvestRequest};
//! use arduino_harvest::probe::ArduinoCli;
//! use std::path::PathBuf;
//!
//! let request = HarvestRequest {
//!     board: "arduino:avr:uno".to_string(),
//!     libraries: vec!["Wire".to_string()],
//!     output: PathBuf::from("build/arduino"),
//!     sections: DocumentSections::all(),
//! };
//! let harvest = HarvestPipeline::default().run(&ArduinoCli::default(), &request)?;
//! println!("{}", harvest.document["tools"]["CXX"]);
//! # Ok::<(), arduino_harvest::HarvestError>(())
//! ```
//!
//! # Project Structure
//!
//! - [`probe`]: probe sketch creation and the arduino-cli invocation
//! - [`transcript`]: sectioning, invocation filtering and stage annotation
//! - [`mining`]: compiler, linker and archiver extraction
//! - [`output`]: document assembly, remapping and serialization
//! - [`pipeline`]: the end-to-end run with progress reporting

pub mod cli;
pub mod config;
pub mod error;
pub mod mining;
pub mod output;
pub mod pipeline;
pub mod probe;
pub mod progress;
pub mod transcript;
pub mod util;

pub use config::{ConfigError, HarvestConfig};
pub use error::HarvestError;
pub use mining::{mine, MinedBuild, MiningError};
pub use pipeline::{Harvest, HarvestPipeline, HarvestRequest};
pub use transcript::{parse_transcript, SourceKind, SourceMap, Stage, StageMap};
pub use util::{init_default, init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
