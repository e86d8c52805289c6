//! Subprocess runner backed by `tokio::process`

use crate::core::DiffError;
use crate::shell::{CommandOutput, CommandRunner};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

/// Runs programs as real child processes
#[derive(Debug, Clone, Default)]
pub struct ShellRunner;

impl ShellRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for ShellRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput, DiffError> {
        debug!("Spawning {} {:?}", program, args);

        let output = Command::new(program)
            .args(args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| DiffError::ExternalCommand {
                command: format!("{} {}", program, args.join(" ")),
                code: -1,
                output: format!("failed to start process: {}", e),
            })?;

        let result = CommandOutput {
            code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if !result.is_success() {
            warn!(
                "{} exited with code {}: {}",
                program,
                result.code,
                result.stderr.trim()
            );
        }

        debug!("{} returned {} bytes of output", program, result.stdout.len());

        Ok(result)
    }
}
