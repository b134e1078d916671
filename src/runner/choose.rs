//! Interactive task picker
//!
//! A configured chooser command receives candidate task names on stdin and
//! prints the selected ones on stdout. Without one, `fzf` is tried, then a
//! numbered prompt on the terminal.

use crate::error::{ExecutionError, ExecutionResult};
use crate::runner::{Context, Dispatcher};
use std::io::{self, BufRead, Write};
use std::process::{Command as StdCommand, Stdio};
use tracing::{debug, info};

/// Chooser tried when none is configured
const DEFAULT_CHOOSER: &str = "fzf";

/// Ask the user for tasks and run each selection in order
pub fn choose_and_run(dispatcher: &Dispatcher, ctx: &Context) -> ExecutionResult<()> {
    let candidates: Vec<String> = dispatcher
        .choosable_tasks()
        .into_iter()
        .map(|task| task.name.clone())
        .collect();

    if candidates.is_empty() {
        info!("no tasks to choose from");
        return Ok(());
    }

    let selected = select(&candidates, ctx)?;
    if selected.is_empty() {
        info!("nothing selected");
        return Ok(());
    }

    for name in &selected {
        dispatcher.run(name, &[], ctx)?;
    }
    Ok(())
}

/// Obtain a selection from the configured chooser, `fzf`, or the prompt
pub fn select(candidates: &[String], ctx: &Context) -> ExecutionResult<Vec<String>> {
    if let Some(chooser) = &ctx.chooser {
        let mut command = ctx.shell();
        command.arg(chooser);
        return run_chooser(command, chooser, candidates, ctx);
    }

    let mut command = StdCommand::new(DEFAULT_CHOOSER);
    command.arg("--multi");
    match run_chooser(command, DEFAULT_CHOOSER, candidates, ctx) {
        Err(ExecutionError::Spawn { .. }) => {
            debug!("{} not available, falling back to prompt", DEFAULT_CHOOSER);
            let stdin = io::stdin();
            prompt(candidates, &mut stdin.lock(), &mut io::stderr())
        }
        other => other,
    }
}

/// Pipe candidates through a chooser process and collect its output lines
fn run_chooser(
    mut command: StdCommand,
    program: &str,
    candidates: &[String],
    ctx: &Context,
) -> ExecutionResult<Vec<String>> {
    command
        .current_dir(&ctx.working_dir)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit());
    ctx.apply_env(&mut command)?;

    let mut child = command.spawn().map_err(|e| ExecutionError::Spawn {
        program: program.to_string(),
        error: e.to_string(),
    })?;

    if let Some(mut stdin) = child.stdin.take() {
        let input = candidates.join("\n") + "\n";
        // A chooser may exit before reading everything
        if let Err(e) = stdin.write_all(input.as_bytes()) {
            if e.kind() != io::ErrorKind::BrokenPipe {
                return Err(ExecutionError::Spawn {
                    program: program.to_string(),
                    error: e.to_string(),
                });
            }
        }
    }

    let output = child.wait_with_output().map_err(|e| ExecutionError::Spawn {
        program: program.to_string(),
        error: e.to_string(),
    })?;

    if !output.status.success() {
        return Err(ExecutionError::ChooserFailed(output.status.code()));
    }

    Ok(String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Numbered prompt: accepts numbers or names separated by whitespace
pub fn prompt<R: BufRead, W: Write>(
    candidates: &[String],
    input: &mut R,
    output: &mut W,
) -> ExecutionResult<Vec<String>> {
    let io_error = |e: io::Error| ExecutionError::Environment(format!("prompt failed: {}", e));

    for (i, name) in candidates.iter().enumerate() {
        writeln!(output, "{:>3}) {}", i + 1, name).map_err(io_error)?;
    }
    write!(output, "Select task(s): ").map_err(io_error)?;
    output.flush().map_err(io_error)?;

    let mut line = String::new();
    input.read_line(&mut line).map_err(io_error)?;

    line.split_whitespace()
        .map(|token| match token.parse::<usize>() {
            Ok(n) if (1..=candidates.len()).contains(&n) => Ok(candidates[n - 1].clone()),
            Ok(_) => Err(ExecutionError::InvalidSelection(token.to_string())),
            Err(_) if candidates.iter().any(|c| c == token) => Ok(token.to_string()),
            Err(_) => Err(ExecutionError::InvalidSelection(token.to_string())),
        })
        .collect()
}
