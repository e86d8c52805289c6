//! Core domain models
//!
//! Plugin configuration, path patterns, steps and the pipeline document
//! they are assembled into.

pub mod config;
pub mod error;
pub mod pattern;
pub mod pipeline;
pub mod step;

pub use config::{PluginConfig, RuleAction, WatchRule};
pub use error::DiffError;
pub use pattern::Pattern;
pub use pipeline::{NotifyTarget, PipelineDocument};
pub use step::*;
