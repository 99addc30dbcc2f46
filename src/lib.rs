//! Revid batch video re-encoder library
//!
//! Composes deterministic filter pipelines from per-clip options, drives an
//! external transform engine, scores output similarity, and orchestrates
//! sequential batches with staged delivery.

pub mod batch;
pub mod cli;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod filters;
pub mod fonts;
pub mod planner;

// Re-export commonly used types
pub use batch::{BatchOrchestrator, OptionsResolver, PerVideoOptions, SharedOptions};
pub use config::ProcessingConfig;
pub use domain::errors::DomainError;
pub use domain::model::{
    AudioSpec, BatchReport, PipelineSpec, ProcessingResult, TextPosition, TextSpec, VideoOptions,
};
pub use engine::{FfmpegInvoker, SimilarityScorer, TransformExecutor};
pub use error::{RevidError, RevidResult};
pub use planner::PipelineComposer;
