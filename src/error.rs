//! Error types for Rundown

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Rundown operations
pub type Result<T> = std::result::Result<T, RundownError>;

/// Main error type for Rundown
#[derive(Error, Debug)]
pub enum RundownError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Task execution errors
    #[error("{0}")]
    Execution(#[from] ExecutionError),

    /// Variable interpolation errors
    #[error("Interpolation error: {0}")]
    Interpolation(#[from] InterpolationError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// YAML parsing errors
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl RundownError {
    /// Process exit status for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            RundownError::Execution(e) => e.exit_code(),
            _ => 1,
        }
    }
}

/// Configuration parsing and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to find config file (searched: {0})")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Task '{task}' defines more than one body: {bodies}")]
    ConflictingBodies { task: String, bodies: String },

    #[error("Task '{task}' has an unsafe clean path '{path}' (must be relative and stay inside the task directory)")]
    UnsafeCleanPath { task: String, path: String },

    #[error("Argument '{0}' must have a unique name within a task")]
    DuplicateNames(String),

    #[error("Argument name '{0}' is reserved by the command line")]
    ReservedName(String),

    #[error("Task '{0}' is not defined")]
    TaskNotFound(String),

    #[error("Circular dependency detected: {0}")]
    CircularDependency(String),

    #[error("Failed to load environment file '{path}': {error}")]
    Dotenv { path: PathBuf, error: String },
}

/// Task execution errors
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Command failed with exit code {0:?}")]
    CommandFailed(Option<i32>),

    #[error("Failed to start '{program}': {error}")]
    Spawn { program: String, error: String },

    #[error("Task '{0}' is not defined")]
    TaskNotFound(String),

    #[error("Task '{0}' calls itself recursively")]
    Recursion(String),

    #[error("Task '{task}' requires argument '{arg}'")]
    MissingArgument { task: String, arg: String },

    #[error("Task '{task}' takes at most {expected} argument(s) but got {got}")]
    TooManyArguments {
        task: String,
        expected: usize,
        got: usize,
    },

    #[error("Parallel tasks failed: {}", .failed.join(", "))]
    ParallelFailed {
        failed: Vec<String>,
        code: Option<i32>,
    },

    #[error("Failed to remove '{path}': {error}")]
    Clean { path: PathBuf, error: String },

    #[error("Chooser exited with code {0:?}")]
    ChooserFailed(Option<i32>),

    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    #[error("Script error: {0}")]
    Script(String),

    #[error("Environment error: {0}")]
    Environment(String),

    #[error("Interpolation error: {0}")]
    Interpolation(#[from] InterpolationError),
}

impl ExecutionError {
    /// Exit code of the child process behind this error, or 1
    pub fn exit_code(&self) -> i32 {
        match self {
            ExecutionError::CommandFailed(Some(code))
            | ExecutionError::ParallelFailed {
                code: Some(code), ..
            } => *code,
            _ => 1,
        }
    }
}

/// Variable interpolation errors
#[derive(Error, Debug)]
pub enum InterpolationError {
    #[error("Variable '{0}' is not defined")]
    UndefinedVariable(String),

    #[error("Recursive interpolation detected")]
    RecursiveInterpolation,
}

/// Specialized result type for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Specialized result type for execution operations
pub type ExecutionResult<T> = std::result::Result<T, ExecutionError>;

/// Specialized result type for interpolation operations
pub type InterpolationResult<T> = std::result::Result<T, InterpolationError>;
