//! Command execution
//!
//! This module handles executing shell commands.

use crate::error::{ExecutionError, ExecutionResult};
use crate::runner::{interpolate, interpolate_strict, Command, Context};
use crate::ui;
use crate::utils::resolve_path;
use std::process::{Command as StdCommand, ExitStatus, Stdio};
use tracing::debug;

/// Execute a command in the given context
pub fn execute_command(cmd: &Command, ctx: &Context) -> ExecutionResult<()> {
    let exec_str = interpolate(cmd.exec(), &ctx.vars)?;
    let print_str = echo_line(cmd, ctx);

    if ctx.dry_run {
        ui::print_dry_run(&print_str);
        return Ok(());
    }

    if !cmd.is_quiet() && ctx.echo_commands() {
        ui::print_command(&print_str);
    }

    let working_dir = match cmd.dir() {
        Some(dir) => resolve_path(&ctx.working_dir, interpolate_strict(dir, &ctx.vars)?),
        None => ctx.working_dir.clone(),
    };

    let mut command = ctx.shell();
    command.arg(&exec_str);
    command.current_dir(&working_dir);
    command.stdin(Stdio::inherit());
    command.stdout(Stdio::inherit());
    command.stderr(Stdio::inherit());
    ctx.apply_env(&mut command)?;

    debug!("running `{}` in {}", exec_str, working_dir.display());
    let status = run_status(&mut command, ctx.shell_program())?;
    check_status(status)
}

/// The line shown for a command: its interpolated `print` text
pub fn echo_line(cmd: &Command, ctx: &Context) -> String {
    interpolate(cmd.print(), &ctx.vars).unwrap_or_else(|_| cmd.print().to_string())
}

/// Wait for a child process, mapping spawn failures to `ExecutionError::Spawn`
pub fn run_status(command: &mut StdCommand, program: &str) -> ExecutionResult<ExitStatus> {
    command.status().map_err(|e| ExecutionError::Spawn {
        program: program.to_string(),
        error: e.to_string(),
    })
}

/// Turn a non-zero exit into `CommandFailed`
pub fn check_status(status: ExitStatus) -> ExecutionResult<()> {
    if status.success() {
        Ok(())
    } else {
        Err(ExecutionError::CommandFailed(status.code()))
    }
}
