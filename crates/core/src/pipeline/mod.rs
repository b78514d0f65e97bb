//! The concat-then-watermark merge pipeline.
//!
//! One [`MergePipeline::run`] call turns a user's ordered clips into a
//! single watermarked video, or fails cleanly: every artifact it creates
//! (concat manifest, merged intermediate) and every input clip is deleted
//! on every exit path. Only the final output survives, and only until the
//! caller drops it.

mod config;
mod error;
mod merge;
mod watermark;

pub use config::PipelineConfig;
pub use error::PipelineError;
pub use merge::{concat_manifest, MergePipeline, MIN_CLIPS};
pub use watermark::{drawtext_filter, escape_drawtext, WatermarkAnchor, WatermarkSpec};
