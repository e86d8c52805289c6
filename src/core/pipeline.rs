//! Pipeline document assembled for upload

use crate::core::{config::PluginConfig, error::DiffError, step::Step};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

/// A build notification target
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotifyTarget {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slack: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagerduty_change_event: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basecamp_campfire: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_commit_status: Option<Value>,

    /// Conditional expression (`if:` in the pipeline schema)
    #[serde(rename = "if", default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

/// The pipeline handed to `buildkite-agent pipeline upload`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineDocument {
    /// Ordered steps; never reordered once assembled
    #[serde(default)]
    pub steps: Vec<Step>,

    /// Notification targets, left out of the YAML entirely when empty
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notify: Vec<NotifyTarget>,
}

impl PipelineDocument {
    /// Build the final document from deduplicated watch steps.
    ///
    /// Layout: watch steps (group labels hoisted), then the wait barrier
    /// if configured, then one command step per hook.
    pub fn assemble(steps: Vec<Step>, config: &PluginConfig) -> Self {
        let mut assembled: Vec<Step> = steps.into_iter().map(Step::into_grouped).collect();

        if config.wait {
            assembled.push(Step::wait());
        }

        for hook in &config.hooks {
            assembled.push(Step::command(hook.clone()));
        }

        PipelineDocument {
            steps: assembled,
            notify: config.notify.clone(),
        }
    }

    /// Whether there is anything worth uploading
    pub fn has_steps(&self) -> bool {
        !self.steps.is_empty()
    }

    /// Serialize to pipeline YAML
    pub fn to_yaml(&self) -> Result<String, DiffError> {
        serde_yaml::to_string(self).map_err(|e| DiffError::Serialization(e.to_string()))
    }

    /// Parse a pipeline document, as printed by a generator
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }
}
