//! Terminal output
//!
//! Everything the user is meant to read goes through here. Diagnostics go
//! through `tracing` instead.

use crate::runner::Task;
use colored::Colorize;
use std::fmt::Display;
use std::path::Path;

/// Echo a command line before it runs
pub fn print_command(line: &str) {
    eprintln!("{} {}", "[RUN]".cyan().bold(), line);
}

/// Echo a command line that a dry run skips
pub fn print_dry_run(line: &str) {
    eprintln!("{} {}", "[DRY]".yellow().bold(), line);
}

/// Report a removed (or, in a dry run, removable) path
pub fn print_removed(path: &Path, dry_run: bool) {
    let label = if dry_run { "[DRY]" } else { "[RM]" };
    eprintln!("{} {}", label.yellow().bold(), path.display());
}

/// Print a top-level error
pub fn print_error(err: &dyn Display) {
    eprintln!("{} {}", "error:".red().bold(), err);
}

/// Render the task listing printed by `--list`
pub fn format_task_list(title: &str, tasks: &[&Task]) -> String {
    let width = tasks
        .iter()
        .map(|task| signature(task).len())
        .max()
        .unwrap_or(0);

    let mut out = format!("{}:\n", title);
    for task in tasks {
        let sig = signature(task);
        match &task.usage {
            Some(usage) => out.push_str(&format!(
                "    {:<width$} {} {}\n",
                sig,
                "#".dimmed(),
                usage,
                width = width
            )),
            None => out.push_str(&format!("    {}\n", sig)),
        }
    }
    out
}

/// Print the task listing to stdout
pub fn print_task_list(title: &str, tasks: &[&Task]) {
    print!("{}", format_task_list(title, tasks));
}

/// Task name followed by its arguments, `name=default` for optional ones
fn signature(task: &Task) -> String {
    let mut sig = task.name.clone();
    for arg in &task.args {
        sig.push(' ');
        match &arg.default {
            Some(default) => sig.push_str(&format!("{}={}", arg.name, default)),
            None => sig.push_str(&arg.name),
        }
    }
    sig
}
