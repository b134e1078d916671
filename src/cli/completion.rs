//! Shell completion scripts

use clap::{value_parser, Arg, Command};
use clap_complete::{generate, Shell};
use std::io;

/// The `--completions <SHELL>` flag
pub fn completion_arg() -> Arg {
    Arg::new("completions")
        .long("completions")
        .value_name("SHELL")
        .help("Print a completion script for the given shell")
        .value_parser(value_parser!(Shell))
}

/// Write a completion script covering every task subcommand to stdout
pub fn print_completions(shell: Shell, command: &mut Command) {
    write_completions(shell, command, &mut io::stdout());
}

/// Write a completion script to any writer
pub fn write_completions(shell: Shell, command: &mut Command, out: &mut dyn io::Write) {
    generate(shell, command, clap::crate_name!(), out);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bash_completions_include_tasks() {
        let mut command = Command::new("rundown")
            .arg(completion_arg())
            .subcommand(Command::new("build-client"))
            .subcommand(Command::new("clean-server"));

        let mut out = Vec::new();
        write_completions(Shell::Bash, &mut command, &mut out);
        let script = String::from_utf8(out).unwrap();

        assert!(script.contains("build-client"));
        assert!(script.contains("clean-server"));
        assert!(script.contains("_rundown()"));
    }

    #[test]
    fn test_parse_shell_value() {
        let matches = Command::new("rundown")
            .arg(completion_arg())
            .get_matches_from(vec!["rundown", "--completions", "zsh"]);
        assert_eq!(matches.get_one::<Shell>("completions"), Some(&Shell::Zsh));
    }
}
