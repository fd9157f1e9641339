//! Progress reporting for harvest runs

mod handler;
mod logging;

pub use handler::{NoOpHandler, Phase, ProgressEvent, ProgressHandler};
pub use logging::LoggingHandler;
