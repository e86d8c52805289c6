//! External process execution
//!
//! Every external command (diff, generators, the agent upload) goes through
//! [`CommandRunner`], so tests can script process results without spawning
//! anything.

pub mod output;
pub mod subprocess;

use crate::core::DiffError;
use async_trait::async_trait;
pub use output::CommandOutput;
pub use subprocess::ShellRunner;

/// Trait for running external programs - allows for different implementations
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args` and capture its output.
    ///
    /// Returns `Err` only if the process could not be started; a non-zero
    /// exit is reported through [`CommandOutput::code`].
    async fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput, DiffError>;

    /// Run a command line through `shell -c`
    async fn run_shell(&self, shell: &str, command: &str) -> Result<CommandOutput, DiffError> {
        let args = vec!["-c".to_string(), command.to_string()];
        self.run(shell, &args).await
    }
}
