use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use crate::error::HarvestError;
use crate::mining::mine;
use crate::output::{assemble_document, remap_document, DocumentSections};
use crate::probe::{run_probe_build, BuildTool};
use crate::progress::{NoOpHandler, Phase, ProgressEvent, ProgressHandler};
use crate::transcript::{parse_transcript, ExecutableResolver, PathResolver, SourceMap, StageMap};

/// What to harvest for one board
#[derive(Debug, Clone)]
pub struct HarvestRequest {
    pub board: String,
    pub libraries: Vec<String>,
    /// Where the sketch cache will be copied; paths in the document point here
    pub output: PathBuf,
    pub sections: DocumentSections,
}

/// A finished, remapped document plus what is needed to export the cache
#[derive(Debug, Clone)]
pub struct Harvest {
    pub document: Value,
    pub cache: PathBuf,
    pub sources: SourceMap,
    pub stages: StageMap,
}

/// Runs build, parse, mine, assemble and remap in order
pub struct HarvestPipeline {
    progress_handler: Arc<dyn ProgressHandler>,
    resolver: Box<dyn ExecutableResolver + Send + Sync>,
}

impl Default for HarvestPipeline {
    fn default() -> Self {
        Self::new(Arc::new(NoOpHandler))
    }
}

impl HarvestPipeline {
    pub fn new(progress_handler: Arc<dyn ProgressHandler>) -> Self {
        Self {
            progress_handler,
            resolver: Box::new(PathResolver),
        }
    }

    /// Replaces the `PATH` lookup used to recognize tool invocations
    pub fn with_resolver<R>(mut self, resolver: R) -> Self
    where
        R: ExecutableResolver + Send + Sync + 'static,
    {
        self.resolver = Box::new(resolver);
        self
    }

    /// Runs a probe build with `tool` and mines its transcript
    pub fn run<T>(&self, tool: &T, request: &HarvestRequest) -> Result<Harvest, HarvestError>
    where
        T: BuildTool + ?Sized,
    {
        let start = Instant::now();
        self.progress_handler.on_progress(&ProgressEvent::Started {
            source: request.board.clone(),
        });

        let build = self.phase(Phase::Build, || {
            run_probe_build(tool, &request.board, &request.libraries)
        })?;
        if !build.stderr.trim().is_empty() {
            debug!("arduino-cli stderr:\n{}", build.stderr);
        }

        let harvest = self.process(&build.stdout, build.sources, &request.output, request.sections)?;
        self.finish(start);
        Ok(harvest)
    }

    /// Mines an already captured transcript produced from `sources`
    pub fn run_transcript(
        &self,
        stdout: &str,
        sources: SourceMap,
        output: &Path,
        sections: DocumentSections,
    ) -> Result<Harvest, HarvestError> {
        let start = Instant::now();
        self.progress_handler.on_progress(&ProgressEvent::Started {
            source: "transcript".to_string(),
        });

        let harvest = self.process(stdout, sources, output, sections)?;
        self.finish(start);
        Ok(harvest)
    }

    fn process(
        &self,
        stdout: &str,
        sources: SourceMap,
        output: &Path,
        sections: DocumentSections,
    ) -> Result<Harvest, HarvestError> {
        let stages = self.phase(Phase::Parse, || {
            Ok::<_, HarvestError>(parse_transcript(stdout, self.resolver.as_ref()))
        })?;
        let mined = self.phase(Phase::Mine, || mine(&stages, &sources))?;
        let document = self.phase(Phase::Assemble, || {
            Ok::<_, HarvestError>(assemble_document(&mined, sections))
        })?;
        let document = self.phase(Phase::Remap, || {
            Ok::<_, HarvestError>(remap_document(&document, &mined.cache, output, &sources))
        })?;

        Ok(Harvest {
            document,
            cache: mined.cache,
            sources,
            stages,
        })
    }

    fn phase<T, E, F>(&self, phase: Phase, step: F) -> Result<T, HarvestError>
    where
        F: FnOnce() -> Result<T, E>,
        HarvestError: From<E>,
    {
        self.progress_handler
            .on_progress(&ProgressEvent::PhaseStarted { phase });
        let phase_start = Instant::now();

        match step() {
            Ok(value) => {
                self.progress_handler.on_progress(&ProgressEvent::PhaseComplete {
                    phase,
                    duration: phase_start.elapsed(),
                });
                Ok(value)
            }
            Err(e) => {
                let error = HarvestError::from(e);
                self.progress_handler.on_progress(&ProgressEvent::Failed {
                    phase,
                    error: error.classification().to_string(),
                });
                Err(error)
            }
        }
    }

    fn finish(&self, start: Instant) {
        info!("Harvest complete");
        self.progress_handler.on_progress(&ProgressEvent::Completed {
            total_time: start.elapsed(),
        });
    }
}
