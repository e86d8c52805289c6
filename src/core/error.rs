//! Error types for diff resolution and pipeline submission

use thiserror::Error;

/// Every way a run can fail
///
/// None of these are retried. "No changes" and "no steps" are not errors;
/// see [`crate::execution::Outcome`].
#[derive(Debug, Error)]
pub enum DiffError {
    #[error("{0}")]
    ConfigParse(String),

    #[error("invalid path pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("command `{command}` exited with code {code}: {output}")]
    ExternalCommand {
        command: String,
        code: i32,
        output: String,
    },

    #[error("could not serialize the pipeline: {0}")]
    Serialization(String),

    #[error("generator `{command}` produced an invalid pipeline: {reason}")]
    GeneratorParse { command: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DiffError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        DiffError::ConfigParse(message.into())
    }
}
