//! Execution context for task running
//!
//! The context tracks all the state needed during task execution. Each task
//! invocation runs in its own copy derived from its caller's context, so
//! concurrent branches never share mutable state.

use crate::error::{ExecutionError, ExecutionResult};
use crate::runner::{interpolate_strict, Task};
use crate::utils::{resolve_path, search_path};
use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::process::Command as StdCommand;

/// Execution context that tracks state during task execution
#[derive(Debug, Clone)]
pub struct Context {
    /// Directory of the task file; task `dir` values resolve against it
    pub root_dir: PathBuf,

    /// Current working directory
    pub working_dir: PathBuf,

    /// Configuration file path
    pub config_path: Option<PathBuf>,

    /// Interpolation variables (config vars, then task arguments)
    pub vars: HashMap<String, String>,

    /// Environment exported to child processes
    pub env: HashMap<String, String>,

    /// Directories prepended to PATH for child processes
    pub path_prefix: Vec<PathBuf>,

    /// Interpreter for command lines (e.g., ["sh", "-c"])
    pub interpreter: Vec<String>,

    /// Command used by the interactive picker
    pub chooser: Option<String>,

    /// Stack of tasks being executed (for detecting recursion)
    pub task_stack: Vec<String>,

    /// Verbosity level
    pub verbosity: Verbosity,

    /// Print commands instead of running them
    pub dry_run: bool,

    /// Suppress command echo for the current task
    pub quiet_commands: bool,
}

/// Verbosity levels for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Silent = 0,
    Quiet = 1,
    Normal = 2,
    Verbose = 3,
}

impl Context {
    /// Create a new context with default settings
    pub fn new() -> Self {
        let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Context {
            root_dir: cwd.clone(),
            working_dir: cwd,
            config_path: None,
            vars: HashMap::new(),
            env: HashMap::new(),
            path_prefix: Vec::new(),
            interpreter: vec!["sh".to_string(), "-c".to_string()],
            chooser: None,
            task_stack: Vec::new(),
            verbosity: Verbosity::Normal,
            dry_run: false,
            quiet_commands: false,
        }
    }

    /// Set the task file directory; also becomes the working directory
    pub fn with_root_dir(mut self, dir: PathBuf) -> Self {
        self.working_dir = dir.clone();
        self.root_dir = dir;
        self
    }

    /// Create a context with a specific working directory
    pub fn with_working_dir(mut self, dir: PathBuf) -> Self {
        self.working_dir = dir;
        self
    }

    /// Set the configuration file path
    pub fn with_config_path(mut self, path: PathBuf) -> Self {
        self.config_path = Some(path);
        self
    }

    /// Set variables
    pub fn with_vars(mut self, vars: HashMap<String, String>) -> Self {
        self.vars = vars;
        self
    }

    /// Set the exported environment
    pub fn with_env(mut self, env: HashMap<String, String>) -> Self {
        self.env = env;
        self
    }

    /// Set the PATH prefix directories
    pub fn with_path_prefix(mut self, dirs: Vec<PathBuf>) -> Self {
        self.path_prefix = dirs;
        self
    }

    /// Set a single variable
    pub fn set_var(&mut self, key: String, value: String) {
        self.vars.insert(key, value);
    }

    /// Get a variable value
    pub fn get_var(&self, key: &str) -> Option<&String> {
        self.vars.get(key)
    }

    /// Set the interpreter
    pub fn with_interpreter(mut self, interpreter: Vec<String>) -> Self {
        self.interpreter = interpreter;
        self
    }

    /// Set the picker command
    pub fn with_chooser(mut self, chooser: Option<String>) -> Self {
        self.chooser = chooser;
        self
    }

    /// Set verbosity level
    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Enable or disable dry-run mode
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Check if a task is in the execution stack (detect recursion)
    pub fn is_task_in_stack(&self, task_name: &str) -> bool {
        self.task_stack.iter().any(|t| t == task_name)
    }

    /// Get the current task name (top of stack)
    pub fn current_task(&self) -> Option<&String> {
        self.task_stack.last()
    }

    /// Derive the context a task runs in: its own working directory, its
    /// bound arguments, and its name pushed on the stack
    pub fn enter_task(
        &self,
        task: &Task,
        args: HashMap<String, String>,
    ) -> ExecutionResult<Context> {
        let mut ctx = self.clone();
        ctx.vars.extend(args);

        ctx.working_dir = match &task.dir {
            Some(dir) => resolve_path(&self.root_dir, interpolate_strict(dir, &ctx.vars)?),
            None => self.root_dir.clone(),
        };
        ctx.quiet_commands = task.quiet;
        ctx.task_stack.push(task.name.clone());

        Ok(ctx)
    }

    /// Whether command lines should be echoed
    pub fn echo_commands(&self) -> bool {
        !self.quiet_commands && self.verbosity >= Verbosity::Normal
    }

    /// Apply the exported environment and PATH prefix to a child process
    pub fn apply_env(&self, command: &mut StdCommand) -> ExecutionResult<()> {
        command.envs(&self.env);

        if !self.path_prefix.is_empty() {
            let path = search_path(&self.path_prefix)
                .map_err(|e| ExecutionError::Environment(e.to_string()))?;
            command.env("PATH", path);
        }

        Ok(())
    }

    /// Interpreter command with its leading arguments, ready for a line
    pub fn shell(&self) -> StdCommand {
        match self.interpreter.split_first() {
            Some((program, args)) => {
                let mut command = StdCommand::new(program);
                command.args(args);
                command
            }
            None => {
                let mut command = StdCommand::new("sh");
                command.arg("-c");
                command
            }
        }
    }

    /// Program name of the interpreter, for error messages
    pub fn shell_program(&self) -> &str {
        self.interpreter.first().map(String::as_str).unwrap_or("sh")
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config;

    #[test]
    fn test_context_new() {
        let ctx = Context::new();
        assert_eq!(ctx.verbosity, Verbosity::Normal);
        assert_eq!(ctx.interpreter, vec!["sh", "-c"]);
        assert!(ctx.vars.is_empty());
        assert!(ctx.task_stack.is_empty());
        assert_eq!(ctx.root_dir, ctx.working_dir);
    }

    #[test]
    fn test_context_set_var() {
        let mut ctx = Context::new();
        ctx.set_var("test".to_string(), "value".to_string());
        assert_eq!(ctx.get_var("test"), Some(&"value".to_string()));
    }

    #[test]
    fn test_enter_task_uses_task_dir() {
        let ctx = Context::new()
            .with_root_dir(PathBuf::from("/srv/freedit"))
            .with_working_dir(PathBuf::from("/srv/freedit/apps/client"));
        let task = Task::from_config(
            "build-server".to_string(),
            config::Task {
                dir: Some("apps/server".to_string()),
                ..config::Task::default()
            },
        );

        let child = ctx.enter_task(&task, HashMap::new()).unwrap();
        assert_eq!(child.working_dir, PathBuf::from("/srv/freedit/apps/server"));
        assert_eq!(child.current_task(), Some(&"build-server".to_string()));
        assert!(ctx.task_stack.is_empty());
    }

    #[test]
    fn test_enter_task_without_dir_uses_root() {
        let ctx = Context::new()
            .with_root_dir(PathBuf::from("/srv/freedit"))
            .with_working_dir(PathBuf::from("/srv/freedit/apps/server"));
        let task = Task::from_config("build".to_string(), config::Task::default());

        let child = ctx.enter_task(&task, HashMap::new()).unwrap();
        assert_eq!(child.working_dir, PathBuf::from("/srv/freedit"));
    }

    #[test]
    fn test_enter_task_interpolates_dir() {
        let ctx = Context::new().with_root_dir(PathBuf::from("/srv/freedit"));
        let task = Task::from_config(
            "build-app".to_string(),
            config::Task {
                dir: Some("apps/${app}".to_string()),
                ..config::Task::default()
            },
        );

        let mut args = HashMap::new();
        args.insert("app".to_string(), "client".to_string());
        let child = ctx.enter_task(&task, args).unwrap();
        assert_eq!(child.working_dir, PathBuf::from("/srv/freedit/apps/client"));
        assert_eq!(child.get_var("app"), Some(&"client".to_string()));
    }

    #[test]
    fn test_echo_commands() {
        let mut ctx = Context::new();
        assert!(ctx.echo_commands());

        ctx.quiet_commands = true;
        assert!(!ctx.echo_commands());

        let ctx = Context::new().with_verbosity(Verbosity::Quiet);
        assert!(!ctx.echo_commands());
    }

    #[test]
    fn test_verbosity_levels() {
        assert!(Verbosity::Verbose > Verbosity::Normal);
        assert!(Verbosity::Normal > Verbosity::Quiet);
        assert!(Verbosity::Quiet > Verbosity::Silent);
    }

    #[test]
    fn test_with_interpreter() {
        let ctx = Context::new().with_interpreter(vec!["bash".to_string(), "-c".to_string()]);
        assert_eq!(ctx.interpreter, vec!["bash", "-c"]);
    }
}
