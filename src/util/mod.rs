//! Utility modules for arduino-harvest
//!
//! This module provides:
//! - Structured logging setup and configuration
//! - Shell-quote tokenization and regex matchers shared by the parser and miner

pub mod logging;
pub mod shell;

// Re-export commonly used items
pub use logging::{init_default, init_from_env, init_logging, LoggingConfig};
pub use shell::{split_line, try_split_line, PatternSet, TokenizeError};
