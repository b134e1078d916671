//! Rundown - a YAML-based task runner
//!
//! Rundown reads named tasks from a `rundown.yml` file and runs them: shell
//! command lines, shebang scripts, concurrent sub-tasks, forced cleanup of
//! generated files, and an interactive task picker.

// Public modules
pub mod cli;
pub mod config;
pub mod error;
pub mod runner;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use error::{Result, RundownError};

/// Current version of Rundown
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
