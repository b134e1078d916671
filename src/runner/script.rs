//! Script bodies
//!
//! A script whose first line is `#!prog args` is written to a temporary
//! file and run as `prog args <file>`. Anything else goes to the
//! interpreter as a single command string.

use crate::error::{ExecutionError, ExecutionResult};
use crate::runner::command::{check_status, run_status};
use crate::runner::{interpolate, Context};
use crate::ui;
use std::io::Write;
use std::process::{Command as StdCommand, Stdio};
use tracing::debug;

/// Run a script body in the given context
pub fn run_script(body: &str, ctx: &Context) -> ExecutionResult<()> {
    let body = interpolate(body, &ctx.vars)?;

    if ctx.dry_run {
        ui::print_dry_run(body.trim_end());
        return Ok(());
    }

    if ctx.echo_commands() {
        ui::print_command(body.lines().next().unwrap_or_default());
    }

    match parse_shebang(&body)? {
        Some(words) => run_shebang_script(&words, &body, ctx),
        None => {
            let mut command = ctx.shell();
            command.arg(&body);
            spawn_in_context(command, ctx.shell_program(), ctx)
        }
    }
}

/// Split the shebang line into program and arguments
pub fn parse_shebang(body: &str) -> ExecutionResult<Option<Vec<String>>> {
    let Some(line) = body.lines().next().and_then(|l| l.strip_prefix("#!")) else {
        return Ok(None);
    };

    let words = shell_words::split(line.trim())
        .map_err(|e| ExecutionError::Script(format!("invalid shebang line '{}': {}", line, e)))?;

    if words.is_empty() {
        return Err(ExecutionError::Script("empty shebang line".to_string()));
    }

    Ok(Some(words))
}

fn run_shebang_script(words: &[String], body: &str, ctx: &Context) -> ExecutionResult<()> {
    let mut file = tempfile::Builder::new()
        .prefix("rundown-")
        .tempfile()
        .map_err(|e| ExecutionError::Script(format!("failed to create script file: {}", e)))?;
    file.write_all(body.as_bytes())
        .and_then(|_| file.flush())
        .map_err(|e| ExecutionError::Script(format!("failed to write script file: {}", e)))?;

    // Close our handle; the path lives until `script_path` drops
    let script_path = file.into_temp_path();
    debug!("running {} via {}", script_path.display(), words.join(" "));

    let mut command = StdCommand::new(&words[0]);
    command.args(&words[1..]).arg(&script_path);
    spawn_in_context(command, &words[0], ctx)
}

fn spawn_in_context(mut command: StdCommand, program: &str, ctx: &Context) -> ExecutionResult<()> {
    command
        .current_dir(&ctx.working_dir)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());
    ctx.apply_env(&mut command)?;

    let status = run_status(&mut command, program)?;
    check_status(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::Verbosity;
    use std::fs;
    use tempfile::TempDir;

    fn ctx_in(dir: &TempDir) -> Context {
        Context::new()
            .with_root_dir(dir.path().to_path_buf())
            .with_verbosity(Verbosity::Quiet)
    }

    #[test]
    fn test_parse_shebang() {
        assert_eq!(
            parse_shebang("#!/usr/bin/env bash\necho hi").unwrap(),
            Some(vec!["/usr/bin/env".to_string(), "bash".to_string()])
        );
        assert_eq!(parse_shebang("echo hi\n#!/bin/sh").unwrap(), None);
        assert!(parse_shebang("#!   \necho").is_err());
    }

    #[test]
    fn test_shebang_script() {
        let temp_dir = TempDir::new().unwrap();
        let body = "#!/bin/sh\nset -e\necho one > out.txt\necho two >> out.txt\n";

        run_script(body, &ctx_in(&temp_dir)).unwrap();
        let out = fs::read_to_string(temp_dir.path().join("out.txt")).unwrap();
        assert_eq!(out, "one\ntwo\n");
    }

    #[test]
    fn test_plain_script_uses_interpreter() {
        let temp_dir = TempDir::new().unwrap();
        let body = "x=freedit\necho $x > name.txt\n";

        run_script(body, &ctx_in(&temp_dir)).unwrap();
        let out = fs::read_to_string(temp_dir.path().join("name.txt")).unwrap();
        assert_eq!(out.trim(), "freedit");
    }

    #[test]
    fn test_script_failure_propagates_code() {
        let temp_dir = TempDir::new().unwrap();

        let result = run_script("#!/bin/sh\nexit 9\n", &ctx_in(&temp_dir));
        assert!(matches!(result, Err(ExecutionError::CommandFailed(Some(9)))));
    }
}
