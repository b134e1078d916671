//! Task execution types and logic
//!
//! This module contains the runtime representation of tasks and execution logic.

use crate::config;
use crate::error::{ExecutionError, ExecutionResult};
use crate::runner::{
    choose_and_run, clean_paths, execute_command, run_parallel, run_script, Context, Dispatcher,
};
use std::collections::HashMap;
use tracing::{debug, info};

/// Runtime task representation
///
/// This differs from config::Task by folding the mutually exclusive body
/// keys into a single `TaskBody`.
#[derive(Debug, Clone)]
pub struct Task {
    /// Task name
    pub name: String,

    /// Usage description
    pub usage: Option<String>,

    /// Longer description
    pub description: Option<String>,

    /// Whether this task is private
    pub private: bool,

    /// Whether this task should run quietly
    pub quiet: bool,

    /// Working directory override, relative to the task file
    pub dir: Option<String>,

    /// Positional arguments, in order
    pub args: Vec<Arg>,

    /// What the task does
    pub body: TaskBody,
}

/// The body of a task
#[derive(Debug, Clone)]
pub enum TaskBody {
    /// Does nothing
    Empty,

    /// Sequential commands and subtask calls
    Commands(Vec<Run>),

    /// A script, optionally with a shebang line
    Script(String),

    /// Subtasks launched concurrently and joined
    Parallel(Vec<SubTask>),

    /// Paths to force-remove
    Clean(Vec<String>),

    /// Interactive task picker
    Choose,
}

impl Task {
    /// Create a new task from configuration
    ///
    /// Validation guarantees at most one body key is set.
    pub fn from_config(name: String, config: config::Task) -> Self {
        let body = if !config.run.is_empty() {
            TaskBody::Commands(config.run.into_iter().map(Run::from_config).collect())
        } else if let Some(script) = config.script {
            TaskBody::Script(script)
        } else if !config.parallel.is_empty() {
            TaskBody::Parallel(config.parallel.into_iter().map(SubTask::from_config).collect())
        } else if !config.clean.is_empty() {
            TaskBody::Clean(config.clean)
        } else if config.choose {
            TaskBody::Choose
        } else {
            TaskBody::Empty
        };

        Task {
            name,
            usage: config.usage,
            description: config.description,
            private: config.private,
            quiet: config.quiet,
            dir: config.dir,
            args: config.args.into_iter().map(Arg::from_config).collect(),
            body,
        }
    }

    /// Whether every argument has a default
    pub fn accepts_no_args(&self) -> bool {
        self.args.iter().all(|arg| arg.default.is_some())
    }

    /// Bind positional values to argument names, filling in defaults
    pub fn bind_args(&self, values: &[String]) -> ExecutionResult<HashMap<String, String>> {
        if values.len() > self.args.len() {
            return Err(ExecutionError::TooManyArguments {
                task: self.name.clone(),
                expected: self.args.len(),
                got: values.len(),
            });
        }

        let mut bound = HashMap::new();
        for (i, arg) in self.args.iter().enumerate() {
            let value = match (values.get(i), &arg.default) {
                (Some(value), _) => value.clone(),
                (None, Some(default)) => default.clone(),
                (None, None) => {
                    return Err(ExecutionError::MissingArgument {
                        task: self.name.clone(),
                        arg: arg.name.clone(),
                    })
                }
            };
            bound.insert(arg.name.clone(), value);
        }

        Ok(bound)
    }

    /// Execute the task in the given context
    pub fn execute(
        &self,
        dispatcher: &Dispatcher,
        args: &[String],
        ctx: &Context,
    ) -> ExecutionResult<()> {
        if ctx.is_task_in_stack(&self.name) {
            return Err(ExecutionError::Recursion(self.name.clone()));
        }

        let bound = self.bind_args(args)?;
        let ctx = ctx.enter_task(self, bound)?;

        info!("Running task: {}", self.name);
        debug!("task '{}' working directory: {}", self.name, ctx.working_dir.display());

        match &self.body {
            TaskBody::Empty => {}
            TaskBody::Commands(runs) => {
                for run in runs {
                    run.execute(dispatcher, &ctx)?;
                }
            }
            TaskBody::Script(body) => run_script(body, &ctx)?,
            TaskBody::Parallel(subtasks) => run_parallel(dispatcher, subtasks, &ctx)?,
            TaskBody::Clean(paths) => {
                clean_paths(paths, &ctx)?;
            }
            TaskBody::Choose => choose_and_run(dispatcher, &ctx)?,
        }

        debug!("Task completed: {}", self.name);
        Ok(())
    }
}

/// Runtime representation of a run item
#[derive(Debug, Clone)]
pub struct Run {
    /// Commands to execute
    pub commands: Vec<Command>,

    /// Subtasks to execute after the commands
    pub subtasks: Vec<SubTask>,
}

impl Run {
    /// Create from config
    pub fn from_config(config: config::Run) -> Self {
        match config {
            config::Run::SimpleCommand(cmd) => Run {
                commands: vec![Command::Simple(cmd)],
                subtasks: Vec::new(),
            },
            config::Run::Complex(item) => Run {
                commands: item.command.into_iter().map(Command::from_config).collect(),
                subtasks: item.task.into_iter().map(SubTask::from_config).collect(),
            },
        }
    }

    /// Run the commands, then the subtasks, stopping at the first failure
    pub fn execute(&self, dispatcher: &Dispatcher, ctx: &Context) -> ExecutionResult<()> {
        for cmd in &self.commands {
            execute_command(cmd, ctx)?;
        }
        for subtask in &self.subtasks {
            dispatcher.run_subtask(subtask, ctx)?;
        }
        Ok(())
    }
}

/// Runtime representation of a command
#[derive(Debug, Clone)]
pub enum Command {
    /// Simple command string
    Simple(String),

    /// Complex command with options
    Complex {
        exec: String,
        print: String,
        quiet: bool,
        dir: Option<String>,
    },
}

impl Command {
    /// Create from config
    pub fn from_config(config: config::Command) -> Self {
        match config {
            config::Command::Simple(cmd) => Command::Simple(cmd),
            config::Command::Complex(detail) => Command::Complex {
                print: detail.print.unwrap_or_else(|| detail.exec.clone()),
                exec: detail.exec,
                quiet: detail.quiet,
                dir: detail.dir,
            },
        }
    }

    /// Get the command to execute
    pub fn exec(&self) -> &str {
        match self {
            Command::Simple(cmd) => cmd,
            Command::Complex { exec, .. } => exec,
        }
    }

    /// Get what to print
    pub fn print(&self) -> &str {
        match self {
            Command::Simple(cmd) => cmd,
            Command::Complex { print, .. } => print,
        }
    }

    /// Check if this command is quiet
    pub fn is_quiet(&self) -> bool {
        match self {
            Command::Simple(_) => false,
            Command::Complex { quiet, .. } => *quiet,
        }
    }

    /// Get the working directory
    pub fn dir(&self) -> Option<&str> {
        match self {
            Command::Simple(_) => None,
            Command::Complex { dir, .. } => dir.as_deref(),
        }
    }
}

/// Runtime representation of a subtask reference
#[derive(Debug, Clone)]
pub struct SubTask {
    pub name: String,
    pub args: Vec<String>,
}

impl SubTask {
    pub fn from_config(config: config::SubTask) -> Self {
        match config {
            config::SubTask::Simple(name) => SubTask {
                name,
                args: Vec::new(),
            },
            config::SubTask::Complex(detail) => SubTask {
                name: detail.name,
                args: detail.args,
            },
        }
    }
}

/// Runtime representation of a positional argument
#[derive(Debug, Clone)]
pub struct Arg {
    pub name: String,
    pub usage: Option<String>,
    pub default: Option<String>,
}

impl Arg {
    pub fn from_config(config: config::Arg) -> Self {
        Arg {
            name: config.name,
            usage: config.usage,
            default: config.default,
        }
    }
}
