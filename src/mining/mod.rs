//! Token mining: structured toolchain data from annotated build stages
//!
//! Each miner locates specific invocation lines in a [`StageMap`], tokenizes
//! them with shell rules, and classifies the tokens with composable
//! [`filters::TokenFilter`]s:
//!
//! - [`compile`]: compiler, include paths and flags per probe source kind
//! - [`link`]: linker, flags, objects, libraries and the post-link steps
//! - [`archive`]: archiver, flags and the sketch cache directory

pub mod archive;
pub mod compile;
pub mod error;
pub mod filters;
pub mod link;
pub mod lookup;

pub use archive::{archive_tokens, sketch_cache, ArchiveRecord};
pub use compile::{build_tokens, ToolRecord};
pub use error::MiningError;
pub use link::{link_tokens, post_link_lines, LinkRecord};

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::transcript::{SourceKind, SourceMap, StageMap};

/// Everything mined from one probe build transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinedBuild {
    pub tools: BTreeMap<SourceKind, ToolRecord>,
    pub link: LinkRecord,
    pub archive: ArchiveRecord,
    pub post_link: Vec<String>,
    pub cache: PathBuf,
}

/// Runs every miner; the first failure aborts the whole run
pub fn mine(stages: &StageMap, sources: &SourceMap) -> Result<MinedBuild, MiningError> {
    Ok(MinedBuild {
        tools: build_tokens(stages, sources)?,
        link: link_tokens(stages, sources)?,
        archive: archive_tokens(stages)?,
        post_link: post_link_lines(stages, sources)?,
        cache: sketch_cache(stages)?,
    })
}
