//! Harvested document: assembly, remapping, serialization and cache export

pub mod cache;
pub mod document;
pub mod error;
pub mod format;
pub mod remap;

pub use cache::copy_cache;
pub use document::{assemble_document, DocumentSections};
pub use error::OutputError;
pub use format::{OutputFormat, OutputFormatter};
pub use remap::{remap_document, RemapTable, TARGET_DIRECTORY, TARGET_NAME, TARGET_PATH};
