//! Step domain model
//!
//! Steps mirror the Buildkite pipeline schema closely enough to round-trip
//! whatever a generator emits. Keys this crate has no opinion about are kept
//! in `extra` so that equality stays structural over the whole step.

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_yaml::{Mapping, Value};

/// One unit of downstream work in a pipeline document
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Step {
    /// Barrier that waits for every earlier step
    Wait(WaitStep),
    /// Several steps nested under a shared label
    Group(GroupStep),
    /// Triggers a build of another pipeline
    Trigger(TriggerStep),
    /// Runs a command on an agent
    Command(CommandStep),
}

/// A command to run, either one line or several
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommandLine {
    Single(String),
    Multiple(Vec<String>),
}

/// Command step
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandStep {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    #[serde(default, alias = "commands", skip_serializing_if = "Option::is_none")]
    pub command: Option<CommandLine>,

    /// Group label requested by a watch rule template (hoisted on assembly)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,

    /// Remaining Buildkite keys (env, agents, plugins, ...)
    #[serde(flatten)]
    pub extra: Mapping,
}

/// Trigger step
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriggerStep {
    pub trigger: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,

    #[serde(rename = "async", default, skip_serializing_if = "Option::is_none")]
    pub is_async: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build: Option<Value>,

    #[serde(flatten)]
    pub extra: Mapping,
}

/// Group step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupStep {
    pub group: String,

    pub steps: Vec<Step>,

    #[serde(flatten)]
    pub extra: Mapping,
}

/// Wait step. `wait` is always written out, as `null` when empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WaitStep {
    #[serde(default)]
    pub wait: Option<String>,

    #[serde(flatten)]
    pub extra: Mapping,
}

impl Step {
    /// A plain command step with nothing but a command line
    pub fn command(command: impl Into<String>) -> Self {
        Step::Command(CommandStep {
            command: Some(CommandLine::Single(command.into())),
            ..CommandStep::default()
        })
    }

    /// The synthetic barrier appended after watch-resolved steps
    pub fn wait() -> Self {
        Step::Wait(WaitStep::default())
    }

    /// Group label carried by a command or trigger template, if non-empty
    pub fn group_label(&self) -> Option<&str> {
        let label = match self {
            Step::Command(step) => step.group.as_deref(),
            Step::Trigger(step) => step.group.as_deref(),
            Step::Group(_) | Step::Wait(_) => None,
        };
        label.filter(|l| !l.is_empty())
    }

    /// Hoist a non-empty group label into a group record nesting this step.
    ///
    /// The label is cleared on the nested step, so calling this again on
    /// the result is a no-op.
    pub fn into_grouped(mut self) -> Self {
        let label = match &mut self {
            Step::Command(step) => step.group.take(),
            Step::Trigger(step) => step.group.take(),
            Step::Group(_) | Step::Wait(_) => None,
        };

        match label {
            Some(group) if !group.is_empty() => Step::Group(GroupStep {
                group,
                steps: vec![self],
                extra: Mapping::new(),
            }),
            _ => self,
        }
    }
}

impl TryFrom<Value> for Step {
    type Error = serde_yaml::Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let step = match &value {
            Value::String(s) if s == "wait" || s == "waiter" => Step::wait(),
            Value::Mapping(map) if map.contains_key("wait") => {
                Step::Wait(serde_yaml::from_value(value)?)
            }
            Value::Mapping(map) if map.contains_key("steps") => {
                Step::Group(serde_yaml::from_value(value)?)
            }
            Value::Mapping(map) if map.contains_key("trigger") => {
                Step::Trigger(serde_yaml::from_value(value)?)
            }
            Value::Mapping(_) => Step::Command(serde_yaml::from_value(value)?),
            other => {
                return Err(de::Error::custom(format!(
                    "unsupported step definition: {:?}",
                    other
                )))
            }
        };
        Ok(step)
    }
}

impl<'de> Deserialize<'de> for Step {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Step::try_from(value).map_err(de::Error::custom)
    }
}
