//! Concurrent subtask launch
//!
//! Every branch gets its own thread and its own copy of the context. All
//! branches are joined before returning; a failing branch never cancels its
//! siblings.

use crate::error::{ExecutionError, ExecutionResult};
use crate::runner::{Context, Dispatcher, SubTask};
use std::thread;
use tracing::{debug, warn};

/// Run `subtasks` concurrently and wait for all of them
pub fn run_parallel(
    dispatcher: &Dispatcher,
    subtasks: &[SubTask],
    ctx: &Context,
) -> ExecutionResult<()> {
    debug!(
        "launching {} parallel task(s): {}",
        subtasks.len(),
        subtasks
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let results: Vec<(&str, ExecutionResult<()>)> = thread::scope(|scope| {
        let handles: Vec<_> = subtasks
            .iter()
            .map(|subtask| {
                let branch = ctx.clone();
                let handle = scope.spawn(move || dispatcher.run_subtask(subtask, &branch));
                (subtask.name.as_str(), handle)
            })
            .collect();

        handles
            .into_iter()
            .map(|(name, handle)| {
                let result = handle.join().unwrap_or_else(|_| {
                    Err(ExecutionError::Environment(format!(
                        "parallel task '{}' panicked",
                        name
                    )))
                });
                (name, result)
            })
            .collect()
    });

    let mut failed = Vec::new();
    let mut code = None;
    for (name, result) in results {
        if let Err(e) = result {
            warn!("parallel task '{}' failed: {}", name, e);
            if failed.is_empty() {
                code = first_exit_code(&e);
            }
            failed.push(name.to_string());
        }
    }

    if failed.is_empty() {
        Ok(())
    } else {
        Err(ExecutionError::ParallelFailed { failed, code })
    }
}

/// Exit code carried by a branch failure, if it came from a child process
fn first_exit_code(err: &ExecutionError) -> Option<i32> {
    match err {
        ExecutionError::CommandFailed(code) => *code,
        ExecutionError::ParallelFailed { code, .. } => *code,
        _ => None,
    }
}
