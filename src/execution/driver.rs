//! Submission driver - one diff, one pipeline, at most one upload

use crate::{
    core::{DiffError, PipelineDocument, PluginConfig},
    execution::{evaluate_rules, StepResolver},
    shell::CommandRunner,
};
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info};

/// Process-level settings the CLI gathers from flags and environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverOptions {
    /// Shell used for the diff and generator commands
    pub shell: String,

    /// Path to the `buildkite-agent` binary
    pub agent: String,

    /// Print the generated pipeline to stdout
    pub print_pipeline: bool,

    /// Build the pipeline but skip the upload
    pub dry_run: bool,

    /// Where the pipeline file is written; the system temp dir when unset
    pub artifact_dir: Option<PathBuf>,
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            shell: "bash".to_string(),
            agent: "buildkite-agent".to_string(),
            print_pipeline: true,
            dry_run: false,
            artifact_dir: None,
        }
    }
}

/// How a successful run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The diff listed no files
    NoChanges,
    /// Files changed but nothing resolved to a step
    NoSteps,
    /// Dry run; the pipeline that would have been uploaded
    DryRun { pipeline: String },
    /// The pipeline was handed to the agent
    Uploaded { command: String, args: Vec<String> },
}

/// Orchestrates diff → rules → steps → document → upload
pub struct Driver<R> {
    runner: R,
    options: DriverOptions,
}

impl<R: CommandRunner> Driver<R> {
    pub fn new(runner: R, options: DriverOptions) -> Self {
        Self { runner, options }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Run the whole flow once. Any error aborts the run unchanged.
    pub async fn run(&self, config: &PluginConfig) -> Result<Outcome, DiffError> {
        let changed = self.changed_files(&config.diff).await?;
        if changed.is_empty() {
            info!("No changes detected. Skipping pipeline upload.");
            return Ok(Outcome::NoChanges);
        }
        debug!("Output from diff:\n{}", changed.join("\n"));

        let document = self.build_pipeline(&changed, config).await?;
        let yaml = document.to_yaml()?;

        if self.options.print_pipeline {
            println!("Generated Pipeline:\n{}", yaml);
        }

        // Removed when dropped, whichever way this function returns
        let mut builder = tempfile::Builder::new();
        builder.prefix("monorepo-diff-").suffix(".yml");
        let mut artifact = match &self.options.artifact_dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        artifact.write_all(yaml.as_bytes())?;
        artifact.flush()?;

        if !document.has_steps() {
            info!("No steps generated. Skipping pipeline upload.");
            return Ok(Outcome::NoSteps);
        }

        if self.options.dry_run {
            info!("Dry run, not uploading {}", artifact.path().display());
            return Ok(Outcome::DryRun { pipeline: yaml });
        }

        let args = upload_args(&artifact.path().to_string_lossy(), config.interpolation);
        let command = self.options.agent.clone();
        info!("Uploading pipeline: {} {}", command, args.join(" "));

        self.runner
            .run(&command, &args)
            .await?
            .into_stdout(&format!("{} {}", command, args.join(" ")))?;

        Ok(Outcome::Uploaded { command, args })
    }

    /// Run the diff command and split everything it printed into paths
    pub async fn changed_files(&self, diff: &str) -> Result<Vec<String>, DiffError> {
        info!("Running diff command: {}", diff);

        let command = diff.replace('\n', " ");
        let output = self
            .runner
            .run_shell(&self.options.shell, &command)
            .await?
            .into_combined(&command)?;

        Ok(output.split_whitespace().map(str::to_string).collect())
    }

    /// Evaluate, resolve, dedupe and assemble for a known set of changed files
    pub async fn build_pipeline(
        &self,
        changed: &[String],
        config: &PluginConfig,
    ) -> Result<PipelineDocument, DiffError> {
        let rules = evaluate_rules(changed, &config.watch)?;
        info!("{} of {} watch rules matched", rules.len(), config.watch.len());

        let resolver = StepResolver::new(&self.runner, &self.options.shell);
        let steps = resolver.resolve(&rules).await?;

        Ok(PipelineDocument::assemble(steps, config))
    }
}

/// Arguments for `buildkite-agent pipeline upload`
pub fn upload_args(path: &str, interpolation: bool) -> Vec<String> {
    let mut args = vec![
        "pipeline".to_string(),
        "upload".to_string(),
        path.to_string(),
    ];
    if !interpolation {
        args.push("--no-interpolation".to_string());
    }
    args
}
