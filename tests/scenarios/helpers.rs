//! Test utility functions for monorepo-diff

use async_trait::async_trait;
use monorepo_diff::{
    CommandOutput, CommandRunner, DiffError, Driver, DriverOptions, Outcome, PluginConfig,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub const AGENT: &str = "buildkite-agent";

/// One recorded process invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    /// The command line for `shell -c` runs, the program otherwise
    pub fn key(&self) -> &str {
        match self.args.as_slice() {
            [flag, command] if flag == "-c" => command,
            _ => &self.program,
        }
    }
}

/// Mock runner that returns scripted process results
///
/// Shell commands are looked up by their command line, everything else by
/// program name. Unknown commands fail with exit code 127. Pipelines handed
/// to the agent are read back so tests can assert on the uploaded YAML.
pub struct MockRunner {
    responses: HashMap<String, CommandOutput>,
    calls: Mutex<Vec<Invocation>>,
    uploads: Mutex<Vec<String>>,
}

impl MockRunner {
    pub fn new() -> Self {
        Self {
            responses: HashMap::new(),
            calls: Mutex::new(Vec::new()),
            uploads: Mutex::new(Vec::new()),
        }
    }

    /// Script the result for a command line or program
    pub fn respond(mut self, key: &str, output: CommandOutput) -> Self {
        self.responses.insert(key.to_string(), output);
        self
    }

    /// Script the diff command's output
    pub fn with_diff(self, diff: &str, changed: &[&str]) -> Self {
        let stdout = changed.iter().map(|f| format!("{}\n", f)).collect::<String>();
        self.respond(diff, CommandOutput::success(stdout))
    }

    /// Let the agent accept uploads
    pub fn with_agent(self) -> Self {
        self.respond(AGENT, CommandOutput::success(""))
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }

    pub fn uploads(&self) -> Vec<String> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn upload_calls(&self) -> Vec<Invocation> {
        self.calls()
            .into_iter()
            .filter(|call| call.program == AGENT)
            .collect()
    }
}

#[async_trait]
impl CommandRunner for MockRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput, DiffError> {
        let call = Invocation {
            program: program.to_string(),
            args: args.to_vec(),
        };
        self.calls.lock().unwrap().push(call.clone());

        if program == AGENT {
            if let Some(path) = args.get(2) {
                let content = std::fs::read_to_string(path)?;
                self.uploads.lock().unwrap().push(content);
            }
        }

        Ok(self
            .responses
            .get(call.key())
            .cloned()
            .unwrap_or_else(|| CommandOutput::failure(127, format!("{}: command not found", call.key()))))
    }
}

/// Wrap a plugin block the way `BUILDKITE_PLUGINS` presents it
pub fn plugins_json(block: &str) -> String {
    format!(
        r#"[{{"github.com/buildkite-plugins/monorepo-diff-buildkite-plugin#v1.0.0": {}}}]"#,
        block
    )
}

pub fn load_config(block: &str) -> PluginConfig {
    PluginConfig::from_plugins_json(&plugins_json(block)).expect("config should parse")
}

pub fn test_options() -> DriverOptions {
    DriverOptions {
        shell: "bash".to_string(),
        agent: AGENT.to_string(),
        print_pipeline: false,
        dry_run: false,
        artifact_dir: None,
    }
}

/// Pipeline files left behind in `dir`
pub fn leftover_artifacts(dir: &Path) -> Vec<PathBuf> {
    std::fs::read_dir(dir)
        .expect("artifact dir should be readable")
        .map(|entry| entry.expect("dir entry").path())
        .collect()
}

/// Run the driver once against a mock runner
pub async fn run_driver(
    config: &PluginConfig,
    runner: MockRunner,
) -> (Result<Outcome, DiffError>, Driver<MockRunner>) {
    let driver = Driver::new(runner, test_options());
    let result = driver.run(config).await;
    (result, driver)
}
