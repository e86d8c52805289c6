//! CLI command definitions

use crate::execution::DriverOptions;
use clap::Args;

/// Diff, resolve and upload
#[derive(Debug, Args, Clone)]
pub struct UploadCommand {
    /// Plugin configuration JSON, as exposed by the agent
    #[arg(long, env = "BUILDKITE_PLUGINS")]
    pub config: String,

    /// Shell used to run the diff and generator commands
    #[arg(long, env = "SHELL", default_value = "bash")]
    pub shell: String,

    /// Path to the buildkite-agent binary
    #[arg(long, env = "BUILDKITE_AGENT_PATH", default_value = "buildkite-agent")]
    pub agent: String,

    /// Don't print the generated pipeline
    #[arg(long)]
    pub quiet: bool,

    /// Only the exact value `true` silences the pipeline print
    #[arg(long, env = "TEST_MODE", hide = true)]
    pub test_mode: Option<String>,

    /// Build the pipeline without uploading it
    #[arg(long)]
    pub dry_run: bool,
}

impl UploadCommand {
    pub fn driver_options(&self) -> DriverOptions {
        DriverOptions {
            shell: self.shell.clone(),
            agent: self.agent.clone(),
            print_pipeline: !self.is_quiet(),
            dry_run: self.dry_run,
            artifact_dir: None,
        }
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet || self.test_mode.as_deref() == Some("true")
    }
}

/// Validate a plugin configuration
#[derive(Debug, Args, Clone)]
pub struct ValidateCommand {
    /// Plugin configuration JSON, as exposed by the agent
    #[arg(long, env = "BUILDKITE_PLUGINS")]
    pub config: String,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}
