//! Harvest orchestration

mod orchestrator;

pub use orchestrator::{Harvest, HarvestPipeline, HarvestRequest};
