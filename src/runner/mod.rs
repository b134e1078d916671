//! Task execution engine
//!
//! This module handles the execution of tasks: command running, scripts,
//! concurrent subtasks, cleanup, the interactive picker, and name resolution.

pub mod choose;
pub mod clean;
pub mod command;
pub mod context;
pub mod dispatch;
pub mod interpolate;
pub mod parallel;
pub mod script;
pub mod task;

// Re-export main types
pub use choose::*;
pub use clean::*;
pub use command::*;
pub use context::*;
pub use dispatch::*;
pub use interpolate::*;
pub use parallel::*;
pub use script::*;
pub use task::*;
