//! monorepo-diff - upload Buildkite steps for the parts of a monorepo that changed

pub mod cli;
pub mod core;
pub mod execution;
pub mod shell;

// Re-export commonly used types
pub use self::core::{DiffError, Pattern, PipelineDocument, PluginConfig, RuleAction, Step, WatchRule};
pub use execution::{dedupe_steps, evaluate_rules, Driver, DriverOptions, Outcome, StepResolver};
pub use shell::{CommandOutput, CommandRunner, ShellRunner};
