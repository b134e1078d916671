//! Task dispatcher
//!
//! Holds the validated tasks of one task file and resolves names to them.

use crate::config::{self, validate_config};
use crate::error::{ConfigResult, ExecutionError, ExecutionResult};
use crate::runner::{choose_and_run, interpolate_list, Context, SubTask, Task, TaskBody};
use std::collections::BTreeMap;
use tracing::debug;

/// Name of the task run when none is given on the command line
pub const DEFAULT_TASK: &str = "default";

/// Registry of runtime tasks, keyed and iterated by name
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    tasks: BTreeMap<String, Task>,
}

impl Dispatcher {
    /// Validate a configuration and build its runtime tasks
    pub fn from_config(config: &config::Config) -> ConfigResult<Self> {
        validate_config(config)?;

        let tasks = config
            .tasks
            .iter()
            .map(|(name, task)| (name.clone(), Task::from_config(name.clone(), task.clone())))
            .collect();

        Ok(Dispatcher { tasks })
    }

    /// Look up a task by name
    pub fn get(&self, name: &str) -> Option<&Task> {
        self.tasks.get(name)
    }

    /// All tasks, private ones included
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values()
    }

    /// Tasks shown in help and `--list`
    pub fn visible_tasks(&self) -> Vec<&Task> {
        self.tasks.values().filter(|task| !task.private).collect()
    }

    /// Tasks offered by the picker: visible, callable without arguments,
    /// and not pickers themselves
    pub fn choosable_tasks(&self) -> Vec<&Task> {
        self.tasks
            .values()
            .filter(|task| !task.private)
            .filter(|task| task.accepts_no_args())
            .filter(|task| !matches!(task.body, TaskBody::Choose))
            .collect()
    }

    /// Run a task by name
    pub fn run(&self, name: &str, args: &[String], ctx: &Context) -> ExecutionResult<()> {
        let task = self
            .get(name)
            .ok_or_else(|| ExecutionError::TaskNotFound(name.to_string()))?;

        debug!("dispatching '{}' with {} argument(s)", name, args.len());
        task.execute(self, args, ctx)
    }

    /// Run a subtask, interpolating its arguments in the caller's context
    pub fn run_subtask(&self, subtask: &SubTask, ctx: &Context) -> ExecutionResult<()> {
        let args = interpolate_list(&subtask.args, &ctx.vars)?;
        self.run(&subtask.name, &args, ctx)
    }

    /// Run the `default` task, or present the picker when there is none
    pub fn run_default(&self, ctx: &Context) -> ExecutionResult<()> {
        if self.get(DEFAULT_TASK).is_some() {
            self.run(DEFAULT_TASK, &[], ctx)
        } else {
            choose_and_run(self, ctx)
        }
    }
}
