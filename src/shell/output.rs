//! Captured process output

use crate::core::DiffError;

/// Result of a finished external process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `-1` when the process was killed by a signal
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// A successful run that printed `stdout`
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            code: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// A failed run with the given exit code and stderr
    pub fn failure(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == 0
    }

    /// Stdout followed by stderr
    pub fn combined(&self) -> String {
        match (self.stdout.is_empty(), self.stderr.is_empty()) {
            (_, true) => self.stdout.clone(),
            (true, false) => self.stderr.clone(),
            (false, false) if self.stdout.ends_with('\n') => {
                format!("{}{}", self.stdout, self.stderr)
            }
            (false, false) => format!("{}\n{}", self.stdout, self.stderr),
        }
    }

    /// Stdout of a successful run, or an `ExternalCommand` error carrying
    /// everything the process printed
    pub fn into_stdout(self, command: &str) -> Result<String, DiffError> {
        if self.is_success() {
            return Ok(self.stdout);
        }
        Err(self.into_error(command))
    }

    /// Like [`into_stdout`](Self::into_stdout), but keeps stderr too
    pub fn into_combined(self, command: &str) -> Result<String, DiffError> {
        if self.is_success() {
            return Ok(self.combined());
        }
        Err(self.into_error(command))
    }

    fn into_error(self, command: &str) -> DiffError {
        DiffError::ExternalCommand {
            command: command.to_string(),
            code: self.code,
            output: self.combined().trim().to_string(),
        }
    }
}
