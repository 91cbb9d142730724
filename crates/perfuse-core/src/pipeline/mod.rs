//! End-to-end CBF pipeline: load, resolve scaling, motion-correct,
//! register, difference, quantify, write.

mod config;
mod orchestrator;
mod types;

pub use config::PipelineConfig;
pub use orchestrator::{run_pipeline, run_pipeline_observed};
pub use types::{CbfResult, PipelineStage};
