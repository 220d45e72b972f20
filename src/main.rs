//! CLI tool to validate, format and apply env files.

use std::path::{Path, PathBuf};
use std::process::{Command as Process, ExitCode};

use clap::{ArgAction, Parser, Subcommand};
use envfile_rs::{DEFAULT_FILE, EnvMap, Error, ProcessEnv, env_plan, marshal, read_file};
use tracing_subscriber::EnvFilter;

/// Validate, format and apply dotenv-style env files.
#[derive(Debug, Parser)]
#[command(name = "envfile", version, about)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). Overrides `ENVFILE_LOG`.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check that env files parse.
    Validate {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Print env files in canonical form.
    Fmt {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Check that env files are already in canonical form.
    Check {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Print the value of one variable.
    Get {
        /// Env file to read.
        #[arg(short, long, env = "ENVFILE_FILE", default_value = DEFAULT_FILE)]
        file: PathBuf,
        key: String,
    },
    /// Run a command with the variables of an env file set.
    Run {
        /// Env file to read.
        #[arg(short, long, env = "ENVFILE_FILE", default_value = DEFAULT_FILE)]
        file: PathBuf,
        /// Override variables already set in the environment.
        #[arg(short, long)]
        overload: bool,
        /// Command and arguments.
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Validate { files } => for_each_file(&files, |path, env| {
            eprintln!("{}: valid ({} variable(s))", path.display(), env.len());
            true
        }),
        Command::Fmt { files } => for_each_file(&files, |_, env| {
            println!("{}", marshal(&env));
            true
        }),
        Command::Check { files } => for_each_file(&files, |path, env| {
            let formatted = format!("{}\n", marshal(&env));
            match std::fs::read_to_string(path) {
                Ok(content) if content == formatted => {
                    eprintln!("{}: formatted", path.display());
                    true
                }
                _ => {
                    eprintln!("{}: not formatted", path.display());
                    false
                }
            }
        }),
        Command::Get { file, key } => match read_file(&file) {
            Ok(env) => env.get(&key).map_or_else(
                || {
                    eprintln!("{}: {key} is not set", file.display());
                    ExitCode::FAILURE
                },
                |value| {
                    println!("{value}");
                    ExitCode::SUCCESS
                },
            ),
            Err(e) => report(&e),
        },
        Command::Run {
            file,
            overload,
            command,
        } => run(&file, overload, &command),
    }
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_env("ENVFILE_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Parse every file and hand the result to `on_parsed`; keeps going
/// past failures so all files get reported.
fn for_each_file(files: &[PathBuf], mut on_parsed: impl FnMut(&Path, EnvMap) -> bool) -> ExitCode {
    let mut had_error = false;
    for path in files {
        match read_file(path) {
            Ok(env) => had_error |= !on_parsed(path, env),
            Err(e) => {
                report(&e);
                had_error = true;
            }
        }
    }
    if had_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn report(err: &Error) -> ExitCode {
    match err {
        Error::Parse(e) => eprintln!("{}", e.render()),
        Error::Io { .. } => eprintln!("{err}"),
    }
    ExitCode::FAILURE
}

fn run(file: &Path, overload: bool, command: &[String]) -> ExitCode {
    let env = match read_file(file) {
        Ok(env) => env,
        Err(e) => return report(&e),
    };
    let Some((program, args)) = command.split_first() else {
        return ExitCode::from(2);
    };
    let plan = env_plan(&env, &ProcessEnv, overload);
    tracing::debug!(program, assigned = plan.len(), "spawning");

    match Process::new(program).args(args).envs(plan).status() {
        Ok(status) => status
            .code()
            .and_then(|code| u8::try_from(code).ok())
            .map_or(ExitCode::FAILURE, ExitCode::from),
        Err(e) => {
            eprintln!("{program}: {e}");
            ExitCode::FAILURE
        }
    }
}
