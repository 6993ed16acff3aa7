use clap::Parser;
use std::io;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use validation_cli::{commands, Cli, CliConfig, FAILURE_EXIT};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match CliConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err:#}");
            return ExitCode::from(FAILURE_EXIT);
        }
    };

    init_tracing(cli.verbose, &config.log_level);
    debug!(
        version = env!("CARGO_PKG_VERSION"),
        command = ?cli.command,
        max_depth = config.validator.max_depth,
        "Starting rustcare-validate"
    );

    let stdout = io::stdout();
    match commands::run(&cli.command, &config, &mut stdout.lock()) {
        Ok(outcome) => outcome.exit_code(),
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(FAILURE_EXIT)
        }
    }
}

/// Logs go to stderr so stdout carries only the report.
fn init_tracing(verbose: bool, default_level: &str) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    };

    if let Err(err) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init()
    {
        eprintln!("warning: logging disabled: {err}");
    }
}
