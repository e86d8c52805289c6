//! Step resolution - turns matched watch rules into pipeline steps

use crate::{
    core::{DiffError, PipelineDocument, RuleAction, Step, WatchRule},
    shell::CommandRunner,
};
use tracing::{debug, info};

/// Resolves matched rules into steps, running generators where needed
pub struct StepResolver<'a, R: ?Sized> {
    runner: &'a R,
    shell: &'a str,
}

impl<'a, R: CommandRunner + ?Sized> StepResolver<'a, R> {
    pub fn new(runner: &'a R, shell: &'a str) -> Self {
        Self { runner, shell }
    }

    /// Resolve every rule in order and drop structural duplicates.
    ///
    /// The first generator failure aborts the whole batch.
    pub async fn resolve(&self, rules: &[&WatchRule]) -> Result<Vec<Step>, DiffError> {
        let mut steps = Vec::new();

        for rule in rules {
            match &rule.action {
                RuleAction::Static(step) => steps.push(step.clone()),
                RuleAction::Generator(command) => {
                    steps.extend(self.generate(command).await?);
                }
            }
        }

        let unique = dedupe_steps(steps);
        debug!("resolved {} unique steps", unique.len());
        Ok(unique)
    }

    /// Run a generator and parse the pipeline it prints
    async fn generate(&self, command: &str) -> Result<Vec<Step>, DiffError> {
        info!("Running generator: {}", command);

        let output = self
            .runner
            .run_shell(self.shell, command)
            .await?
            .into_stdout(command)?;

        let document =
            PipelineDocument::from_yaml(&output).map_err(|e| DiffError::GeneratorParse {
                command: command.to_string(),
                reason: e.to_string(),
            })?;

        debug!("generator `{}` emitted {} steps", command, document.steps.len());
        Ok(document.steps)
    }
}

/// Drop steps structurally equal to an earlier one, keeping first-seen order
pub fn dedupe_steps(steps: Vec<Step>) -> Vec<Step> {
    let mut unique: Vec<Step> = Vec::with_capacity(steps.len());
    for step in steps {
        if !unique.contains(&step) {
            unique.push(step);
        }
    }
    unique
}
