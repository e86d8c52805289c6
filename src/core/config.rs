//! Plugin configuration from Buildkite's `BUILDKITE_PLUGINS` JSON
//!
//! The agent exposes every plugin on the step as a list of single-key
//! objects. Only our own block is read; sibling plugins are ignored.

use crate::core::{error::DiffError, pattern::Pattern, pipeline::NotifyTarget, step::Step};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Plugin identities whose block we pick up (matched as key prefixes)
pub const PLUGIN_NAMES: &[&str] = &[
    "github.com/buildkite-plugins/monorepo-diff-buildkite-plugin",
    "monorepo-diff",
];

pub const DEFAULT_DIFF: &str = "git diff --name-only HEAD~1";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Parsed plugin configuration, ready for the resolution engine
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PluginConfig {
    /// Shell command listing changed files
    pub diff: String,

    /// Log level requested by the pipeline author
    pub log_level: String,

    /// Let the agent interpolate `$VARS` in the uploaded pipeline
    pub interpolation: bool,

    /// Append a wait barrier after the watch-resolved steps
    pub wait: bool,

    /// Commands appended as plain steps at the end of the pipeline
    pub hooks: Vec<String>,

    /// Notification targets copied into the pipeline as-is
    pub notify: Vec<NotifyTarget>,

    /// Watch rules in declaration order
    pub watch: Vec<WatchRule>,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            diff: DEFAULT_DIFF.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            interpolation: true,
            wait: false,
            hooks: Vec::new(),
            notify: Vec::new(),
            watch: Vec::new(),
        }
    }
}

/// A mapping from changed paths to the work they should trigger
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WatchRule {
    pub paths: Vec<Pattern>,
    pub skip_paths: Vec<Pattern>,
    pub action: RuleAction,
    /// Used only when no other rule matched
    pub is_default: bool,
}

/// How a matched rule turns into steps
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleAction {
    /// Emit this step as-is
    Static(Step),
    /// Run this command and upload the steps it prints
    Generator(String),
}

/// `path` and `skip_path` take a single string or a list
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    fn into_vec(self) -> Vec<String> {
        match self {
            OneOrMany::One(s) => vec![s],
            OneOrMany::Many(v) => v,
        }
    }
}

/// Hooks are either bare commands or `{ command: ... }` objects
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum HookConfig {
    Command(String),
    Object { command: String },
}

impl HookConfig {
    fn into_command(self) -> String {
        match self {
            HookConfig::Command(command) | HookConfig::Object { command } => command,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawWatchConfig {
    #[serde(default)]
    path: Option<OneOrMany>,

    #[serde(default)]
    skip_path: Option<OneOrMany>,

    #[serde(default)]
    config: Option<Step>,

    #[serde(default)]
    generator: Option<String>,

    #[serde(default)]
    default: bool,
}

#[derive(Debug, Deserialize)]
struct RawPluginConfig {
    #[serde(default = "default_diff")]
    diff: String,

    #[serde(default = "default_log_level")]
    log_level: String,

    #[serde(default = "default_true")]
    interpolation: bool,

    #[serde(default)]
    wait: bool,

    #[serde(default)]
    hooks: Vec<HookConfig>,

    #[serde(default)]
    notify: Vec<NotifyTarget>,

    #[serde(default)]
    watch: Vec<RawWatchConfig>,
}

fn default_diff() -> String {
    DEFAULT_DIFF.to_string()
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_true() -> bool {
    true
}

impl PluginConfig {
    /// Extract and parse our block from the `BUILDKITE_PLUGINS` JSON list
    pub fn from_plugins_json(data: &str) -> Result<Self, DiffError> {
        let plugins: Vec<HashMap<String, serde_json::Value>> = serde_json::from_str(data)
            .map_err(|e| DiffError::config(format!("failed to parse plugin configuration: {}", e)))?;

        for plugin in &plugins {
            for (key, block) in plugin {
                if PLUGIN_NAMES.iter().any(|name| key.starts_with(name)) {
                    return Self::from_json_value(block.clone());
                }
            }
        }

        Err(DiffError::config("could not initialize plugin"))
    }

    /// Parse a single plugin block
    pub fn from_json_value(block: serde_json::Value) -> Result<Self, DiffError> {
        let raw: RawPluginConfig = serde_json::from_value(block)
            .map_err(|e| DiffError::config(format!("failed to parse plugin configuration: {}", e)))?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawPluginConfig) -> Result<Self, DiffError> {
        let watch = raw
            .watch
            .into_iter()
            .enumerate()
            .map(|(index, entry)| WatchRule::from_raw(index, entry))
            .collect::<Result<Vec<_>, _>>()?;

        let defaults = watch.iter().filter(|rule| rule.is_default).count();
        if defaults > 1 {
            return Err(DiffError::config(format!(
                "only one default watch rule is allowed, found {}",
                defaults
            )));
        }

        Ok(PluginConfig {
            diff: raw.diff,
            log_level: raw.log_level,
            interpolation: raw.interpolation,
            wait: raw.wait,
            hooks: raw.hooks.into_iter().map(HookConfig::into_command).collect(),
            notify: raw.notify,
            watch,
        })
    }

    /// The default rule, if one is configured
    pub fn default_rule(&self) -> Option<&WatchRule> {
        self.watch.iter().find(|rule| rule.is_default)
    }
}

impl WatchRule {
    fn from_raw(index: usize, raw: RawWatchConfig) -> Result<Self, DiffError> {
        let action = match (raw.config, raw.generator) {
            (Some(step), None) => RuleAction::Static(step),
            (None, Some(command)) => RuleAction::Generator(command),
            (Some(_), Some(_)) => {
                return Err(DiffError::config(format!(
                    "watch entry {} sets both 'config' and 'generator'",
                    index
                )))
            }
            (None, None) => {
                return Err(DiffError::config(format!(
                    "watch entry {} needs either 'config' or 'generator'",
                    index
                )))
            }
        };

        let paths = compile_patterns(raw.path)?;
        if paths.is_empty() && !raw.default {
            return Err(DiffError::config(format!(
                "watch entry {} has no 'path'",
                index
            )));
        }

        Ok(WatchRule {
            paths,
            skip_paths: compile_patterns(raw.skip_path)?,
            action,
            is_default: raw.default,
        })
    }
}

fn compile_patterns(raw: Option<OneOrMany>) -> Result<Vec<Pattern>, DiffError> {
    raw.map(OneOrMany::into_vec)
        .unwrap_or_default()
        .into_iter()
        .map(Pattern::new)
        .collect()
}
