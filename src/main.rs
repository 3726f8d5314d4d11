#![forbid(unsafe_code)]

use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;

use tac_setup::cli::{router, Cli, Commands, SetupFlags};
use tac_setup::config::Config;
use tac_setup::error::{TacSetupError, EXIT_FAILURE};
use tac_setup::{commands, logging};

fn main() -> ExitCode {
    // Route arguments so that a bare invocation means `run`
    let routed_args = router::route_args(std::env::args_os());
    let cli = Cli::parse_from(routed_args);

    logging::init(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_code(&e))
        }
    }
}

/// Failing steps hand their exit status through; everything else is 1
fn exit_code(e: &anyhow::Error) -> u8 {
    e.downcast_ref::<TacSetupError>()
        .map_or(EXIT_FAILURE, TacSetupError::exit_code)
}

fn run(cli: Cli) -> Result<()> {
    let project_root = std::env::current_dir().context("Failed to get current directory")?;
    let explicit = cli.config.as_deref();

    match &cli.command {
        Some(Commands::Run(cmd)) => {
            let config = load(&project_root, explicit, &cmd.setup, cli.verbose)?;
            commands::run::execute(&config)?;
        }
        Some(Commands::Plan(cmd)) => {
            let config = load(&project_root, explicit, &cmd.setup, cli.verbose)?;
            commands::plan::execute(&config, cmd.json)?;
        }
        Some(Commands::Config { command }) => {
            commands::config::execute(command, &project_root, explicit)?;
        }
        Some(Commands::Version) => {
            commands::version::execute()?;
        }
        None => {
            // Router always inserts a subcommand; this is a safety net
            let config = load(&project_root, explicit, &SetupFlags::default(), cli.verbose)?;
            commands::run::execute(&config)?;
        }
    }

    Ok(())
}

fn load(
    project_root: &std::path::Path,
    explicit: Option<&std::path::Path>,
    flags: &SetupFlags,
    verbose: bool,
) -> Result<Config> {
    let config = Config::load(project_root, explicit)
        .context("Failed to load configuration")?
        .with_setup_overrides(flags, verbose)
        .resolve_paths();

    tracing::debug!(?config, "effective configuration");
    Ok(config)
}
