//! Core configuration types
//!
//! This module defines the data structures that represent a rundown.yml task file.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::collections::{BTreeMap, HashMap};

/// Top-level configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Application name (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Application usage description (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,

    /// Global interpreter to use for commands (e.g., ["sh", "-c"])
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interpreter: Option<Vec<String>>,

    /// Directories prepended to PATH for every child process
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<String>,

    /// Environment variables exported to every child process
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub env: HashMap<String, String>,

    /// Load `.env` next to the task file
    #[serde(default)]
    pub dotenv: bool,

    /// Variables available to `${name}` interpolation
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub vars: HashMap<String, String>,

    /// Command used by the interactive task picker
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chooser: Option<String>,

    /// Tasks defined in the configuration
    #[serde(default)]
    pub tasks: BTreeMap<String, Task>,
}

/// A task definition
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Task {
    /// Usage description for help text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,

    /// Longer description for help text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Whether this task is private (hidden from help)
    #[serde(default)]
    pub private: bool,

    /// Whether this task should run quietly
    #[serde(default)]
    pub quiet: bool,

    /// Working directory, relative to the task file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,

    /// Positional arguments for the task, in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<Arg>,

    /// Run items to execute
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "one_or_many"
    )]
    pub run: Vec<Run>,

    /// Script body, optionally starting with a shebang line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,

    /// Subtasks launched concurrently
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "one_or_many"
    )]
    pub parallel: Vec<SubTask>,

    /// Paths to force-remove
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "one_or_many"
    )]
    pub clean: Vec<String>,

    /// Present the interactive task picker
    #[serde(default)]
    pub choose: bool,
}

impl Task {
    /// Names of the body keys set on this task
    pub fn body_kinds(&self) -> Vec<&'static str> {
        let mut kinds = Vec::new();
        if !self.run.is_empty() {
            kinds.push("run");
        }
        if self.script.is_some() {
            kinds.push("script");
        }
        if !self.parallel.is_empty() {
            kinds.push("parallel");
        }
        if !self.clean.is_empty() {
            kinds.push("clean");
        }
        if self.choose {
            kinds.push("choose");
        }
        kinds
    }

    /// Names of every task this task calls directly
    pub fn subtask_names(&self) -> Vec<&str> {
        let sequential = self.run.iter().flat_map(|run| match run {
            Run::SimpleCommand(_) => Vec::new(),
            Run::Complex(item) => item.task.iter().map(SubTask::name).collect(),
        });
        sequential
            .chain(self.parallel.iter().map(SubTask::name))
            .collect()
    }
}

/// A run item - can be a command or a subtask call
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Run {
    /// Simple string command
    SimpleCommand(String),

    /// Run item with commands and subtasks
    Complex(RunItem),
}

/// A run item with several actions
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RunItem {
    /// Commands to execute
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "one_or_many"
    )]
    pub command: Vec<Command>,

    /// Subtasks to execute
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "one_or_many"
    )]
    pub task: Vec<SubTask>,
}

/// A command to execute
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Command {
    /// Simple string command
    Simple(String),

    /// Complex command with additional options
    Complex(CommandDetail),
}

/// Detailed command specification
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CommandDetail {
    /// The command to execute
    pub exec: String,

    /// What to print when running (defaults to exec)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub print: Option<String>,

    /// Whether to suppress the echoed line
    #[serde(default)]
    pub quiet: bool,

    /// Working directory for the command, relative to the task's directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
}

/// A reference to a subtask to execute
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum SubTask {
    /// Simple task name
    Simple(String),

    /// Subtask with arguments
    Complex(SubTaskDetail),
}

impl SubTask {
    /// Name of the referenced task
    pub fn name(&self) -> &str {
        match self {
            SubTask::Simple(name) => name,
            SubTask::Complex(detail) => &detail.name,
        }
    }
}

/// Detailed subtask specification
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SubTaskDetail {
    /// Name of the task to run
    pub name: String,

    /// Positional arguments to pass to the subtask
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
}

/// A positional argument definition
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Arg {
    /// Argument name, also its interpolation variable
    pub name: String,

    /// Usage description for help text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,

    /// Default value; arguments without one are required
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

/// Accept a single value or a list of them; null or absent means empty
fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: DeserializeOwned,
{
    use serde::de::Error;

    match Value::deserialize(deserializer)? {
        Value::Null => Ok(Vec::new()),
        Value::Sequence(items) => items
            .into_iter()
            .map(|item| serde_yaml::from_value(item).map_err(D::Error::custom))
            .collect(),
        single => serde_yaml::from_value(single)
            .map(|item| vec![item])
            .map_err(D::Error::custom),
    }
}
