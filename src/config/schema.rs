//! Configuration validation
//!
//! This module provides validation logic for task files.

use crate::config::types::{Config, Task};
use crate::error::{ConfigError, ConfigResult};
use crate::utils::is_contained_path;
use std::collections::HashSet;

/// Argument ids already taken by the runner's global flags
pub const RESERVED_ARG_NAMES: &[&str] = &[
    "file",
    "quiet",
    "silent",
    "verbose",
    "list",
    "dry-run",
    "choose",
    "chooser",
    "completions",
    "help",
    "version",
];

/// Validate a complete configuration
pub fn validate_config(config: &Config) -> ConfigResult<()> {
    if let Some(interpreter) = &config.interpreter {
        if interpreter.is_empty() {
            return Err(ConfigError::Invalid(
                "interpreter must name at least one program".to_string(),
            ));
        }
    }

    for (name, task) in &config.tasks {
        validate_task(name, task)?;
    }

    // Check for circular dependencies between tasks
    detect_circular_task_dependencies(config)?;

    Ok(())
}

/// Validate a single task
pub fn validate_task(name: &str, task: &Task) -> ConfigResult<()> {
    if name.is_empty() || name.starts_with('-') {
        return Err(ConfigError::Invalid(format!(
            "Invalid task name '{}'",
            name
        )));
    }

    let bodies = task.body_kinds();
    if bodies.len() > 1 {
        return Err(ConfigError::ConflictingBodies {
            task: name.to_string(),
            bodies: bodies.join(", "),
        });
    }

    validate_args(name, task)?;

    for path in &task.clean {
        if !is_contained_path(path) {
            return Err(ConfigError::UnsafeCleanPath {
                task: name.to_string(),
                path: path.clone(),
            });
        }
    }

    Ok(())
}

/// Check argument names and ordering
fn validate_args(task_name: &str, task: &Task) -> ConfigResult<()> {
    let mut seen = HashSet::new();
    let mut optional_seen = false;

    for arg in &task.args {
        if RESERVED_ARG_NAMES.contains(&arg.name.as_str()) {
            return Err(ConfigError::ReservedName(arg.name.clone()));
        }
        if !seen.insert(arg.name.as_str()) {
            return Err(ConfigError::DuplicateNames(arg.name.clone()));
        }

        match arg.default {
            Some(_) => optional_seen = true,
            None if optional_seen => {
                return Err(ConfigError::Invalid(format!(
                    "Task '{}': required argument '{}' follows an argument with a default",
                    task_name, arg.name
                )))
            }
            None => {}
        }
    }

    Ok(())
}

/// Detect circular dependencies in task subtask relationships
fn detect_circular_task_dependencies(config: &Config) -> ConfigResult<()> {
    let mut visited = HashSet::new();
    for task_name in config.tasks.keys() {
        let mut stack = Vec::new();
        check_task_cycle(config, task_name, &mut visited, &mut stack)?;
    }
    Ok(())
}

/// Recursively check for cycles in task dependencies
fn check_task_cycle(
    config: &Config,
    task_name: &str,
    visited: &mut HashSet<String>,
    stack: &mut Vec<String>,
) -> ConfigResult<()> {
    if stack.iter().any(|name| name == task_name) {
        stack.push(task_name.to_string());
        return Err(ConfigError::CircularDependency(stack.join(" -> ")));
    }

    // Skip if already fully processed
    if visited.contains(task_name) {
        return Ok(());
    }

    let task = config
        .tasks
        .get(task_name)
        .ok_or_else(|| ConfigError::TaskNotFound(task_name.to_string()))?;

    stack.push(task_name.to_string());

    for subtask_name in task.subtask_names() {
        check_task_cycle(config, subtask_name, visited, stack)?;
    }

    stack.pop();
    visited.insert(task_name.to_string());

    Ok(())
}
