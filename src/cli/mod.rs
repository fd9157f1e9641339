pub mod commands;
pub mod handlers;

pub use commands::{CliArgs, Commands, DocumentArgs, HarvestArgs, MineArgs, OutputFormatArg};
pub use handlers::{handle_harvest, handle_mine};
