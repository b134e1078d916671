//! Main CLI application

use crate::cli::completion::{completion_arg, print_completions};
use crate::config::{
    config_dir, load_dotenv, parse_config_auto, parse_config_file, Config,
};
use crate::error::{ConfigError, RundownError};
use crate::runner::{choose_and_run, Context, Dispatcher, Verbosity};
use crate::ui;
use crate::utils::resolve_path;
use clap::{Arg, ArgAction, ArgMatches, Command};
use clap_complete::Shell;
use std::ffi::OsString;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Environment variable overriding the log filter
pub const LOG_ENV: &str = "RUNDOWN_LOG";

/// CLI application
pub struct App {
    /// The clap command
    command: Command,
    /// Parsed configuration
    config: Config,
    /// Config file path
    config_path: PathBuf,
    /// Validated tasks
    dispatcher: Dispatcher,
}

impl App {
    /// Create a new app from the discovered configuration file
    pub fn new() -> Result<Self, RundownError> {
        let (config, config_path) = parse_config_auto()?;
        Self::from_parts(config, config_path)
    }

    /// Create app with a specific config file
    pub fn with_config_file(path: PathBuf) -> Result<Self, RundownError> {
        let config = parse_config_file(&path)?;
        Self::from_parts(config, path)
    }

    fn from_parts(config: Config, config_path: PathBuf) -> Result<Self, RundownError> {
        let dispatcher = Dispatcher::from_config(&config)?;
        let command = build_command(&config, &dispatcher);

        Ok(App {
            command,
            config,
            config_path,
            dispatcher,
        })
    }

    /// Run the application with the process's command line arguments
    pub fn run(self) -> Result<(), RundownError> {
        self.run_from(std::env::args_os())
    }

    /// Run the application with explicit command line arguments
    pub fn run_from<I, T>(self, args: I) -> Result<(), RundownError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self.command.clone().get_matches_from(args);

        let verbosity = get_verbosity(&matches);
        init_logging(verbosity);
        debug!("using task file {}", self.config_path.display());

        if let Some(shell) = matches.get_one::<Shell>("completions") {
            let mut command = self.command.clone();
            print_completions(*shell, &mut command);
            return Ok(());
        }

        if matches.get_flag("list") {
            let title = match &self.config.name {
                Some(name) => format!("Available tasks ({})", name),
                None => "Available tasks".to_string(),
            };
            ui::print_task_list(&title, &self.dispatcher.visible_tasks());
            return Ok(());
        }

        let ctx = self.build_context(&matches, verbosity)?;

        if matches.get_flag("choose") {
            choose_and_run(&self.dispatcher, &ctx)?;
            return Ok(());
        }

        match matches.subcommand() {
            Some((task_name, task_matches)) => {
                let task = self
                    .dispatcher
                    .get(task_name)
                    .ok_or_else(|| ConfigError::TaskNotFound(task_name.to_string()))?;

                let args: Vec<String> = task
                    .args
                    .iter()
                    .map_while(|arg| task_matches.get_one::<String>(&arg.name).cloned())
                    .collect();

                self.dispatcher.run(task_name, &args, &ctx)?;
            }
            None => self.dispatcher.run_default(&ctx)?,
        }

        Ok(())
    }

    /// Assemble the root execution context from the task file's settings
    fn build_context(
        &self,
        matches: &ArgMatches,
        verbosity: Verbosity,
    ) -> Result<Context, RundownError> {
        let root_dir = config_dir(&self.config_path);

        let mut env = if self.config.dotenv {
            load_dotenv(&root_dir)?
        } else {
            Default::default()
        };
        env.extend(self.config.env.clone());

        let path_prefix = self
            .config
            .path
            .iter()
            .map(|dir| resolve_path(&root_dir, dir))
            .collect();

        let chooser = matches
            .get_one::<String>("chooser")
            .cloned()
            .or_else(|| self.config.chooser.clone());

        let mut ctx = Context::new()
            .with_root_dir(root_dir)
            .with_config_path(self.config_path.clone())
            .with_vars(self.config.vars.clone())
            .with_env(env)
            .with_path_prefix(path_prefix)
            .with_chooser(chooser)
            .with_verbosity(verbosity)
            .with_dry_run(matches.get_flag("dry-run"));

        if let Some(interpreter) = &self.config.interpreter {
            ctx = ctx.with_interpreter(interpreter.clone());
        }

        Ok(ctx)
    }
}

/// Build the clap command from configuration
pub fn build_command(config: &Config, dispatcher: &Dispatcher) -> Command {
    let mut cmd = Command::new(config.name.clone().unwrap_or_else(|| "rundown".to_string()))
        .version(clap::crate_version!())
        .about(
            config
                .usage
                .clone()
                .unwrap_or_else(|| "A YAML-based task runner".to_string()),
        )
        .allow_external_subcommands(true)
        .disable_help_subcommand(true)
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .value_name("FILE")
                .help("Path to rundown.yml task file")
                .global(true),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only print command output and errors")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("silent")
                .short('s')
                .long("silent")
                .help("Print no output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Print verbose output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("list")
                .short('l')
                .long("list")
                .help("List available tasks")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("dry-run")
                .short('n')
                .long("dry-run")
                .help("Print commands without running them")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("choose")
                .long("choose")
                .help("Select tasks to run interactively")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("chooser")
                .long("chooser")
                .value_name("CMD")
                .help("Command used to select tasks"),
        )
        .arg(completion_arg());

    // Add subcommands for each task
    for task in dispatcher.tasks() {
        let mut task_cmd = Command::new(task.name.clone())
            .about(task.usage.clone().unwrap_or_default())
            .hide(task.private);

        if let Some(desc) = &task.description {
            task_cmd = task_cmd.long_about(desc.clone());
        }

        for arg in &task.args {
            let mut arg_def = Arg::new(arg.name.clone())
                .value_name(arg.name.to_uppercase())
                .help(arg.usage.clone().unwrap_or_default());

            arg_def = match &arg.default {
                Some(default) => arg_def.default_value(default.clone()),
                None => arg_def.required(true),
            };

            task_cmd = task_cmd.arg(arg_def);
        }

        cmd = cmd.subcommand(task_cmd);
    }

    cmd
}

/// Get verbosity level from matches
fn get_verbosity(matches: &ArgMatches) -> Verbosity {
    if matches.get_flag("silent") {
        Verbosity::Silent
    } else if matches.get_flag("quiet") {
        Verbosity::Quiet
    } else if matches.get_flag("verbose") {
        Verbosity::Verbose
    } else {
        Verbosity::Normal
    }
}

/// Log level for a verbosity setting
fn level_for(verbosity: Verbosity) -> LevelFilter {
    match verbosity {
        Verbosity::Silent => LevelFilter::OFF,
        Verbosity::Quiet => LevelFilter::ERROR,
        Verbosity::Normal => LevelFilter::WARN,
        Verbosity::Verbose => LevelFilter::DEBUG,
    }
}

/// Install the stderr log subscriber; `RUNDOWN_LOG` overrides the level
pub fn init_logging(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(level_for(verbosity).to_string()));

    // A subscriber may already be installed when embedded or under test
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .try_init();
}

/// Run the CLI application with provided arguments
pub fn run() -> Result<(), RundownError> {
    // Check if --file flag is provided first
    let args: Vec<String> = std::env::args().collect();
    let file_path = extract_file_arg(&args);

    let app = if let Some(path) = file_path {
        App::with_config_file(path)?
    } else {
        App::new()?
    };

    app.run()
}

/// Extract the `--file` value before clap parsing
///
/// Accepts `--file X`, `--file=X`, `-f X`, `-fX`, `-f=X` and `-f` at the end
/// of a cluster of boolean short flags (`-qf X`).
fn extract_file_arg(args: &[String]) -> Option<PathBuf> {
    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        if arg == "--" {
            break;
        }
        if arg == "--file" {
            return iter.next().map(PathBuf::from);
        }
        if let Some(path) = arg.strip_prefix("--file=") {
            return Some(PathBuf::from(path));
        }
        if arg.starts_with("--") {
            continue;
        }
        let Some(cluster) = arg.strip_prefix('-') else {
            continue;
        };
        if let Some((_, value)) = cluster.split_once('f') {
            let value = value.strip_prefix('=').unwrap_or(value);
            return if value.is_empty() {
                iter.next().map(PathBuf::from)
            } else {
                Some(PathBuf::from(value))
            };
        }
    }
    None
}
