use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod flags;
pub mod router;
pub use flags::SetupFlags;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Validate configuration files
    Validate {
        /// Optional path to a specific config file to validate
        file: Option<PathBuf>,
    },

    /// Show effective configuration after merging all sources
    Show,
}

#[derive(Parser, Debug)]
#[command(name = "tac-setup")]
#[command(
    about = "Fetch, configure and build the TAC controller and participant agents",
    long_about = None
)]
#[command(version)]
#[command(after_help = "\
INVOCATION PATTERNS:
  The 'run' command is the default. These are equivalent:

  tac-setup [options]          Shorthand for 'tac-setup run'
  tac-setup run [options]      Explicit run command

ENVIRONMENT:
  USE_CLIENT=true              Use the p2p client connection for both agents
  TAC_SETUP_AEA_BIN            aea executable to invoke
  TAC_SETUP_DATA_DIR           Data directory to create (default /data)

EXAMPLES:
  USE_CLIENT=true tac-setup    Provision both agents with the client connection
  tac-setup plan               Show the commands a run would execute")]
pub struct Cli {
    /// Show debug logging
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    /// Extra config file, applied over global and project config
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the data directory, then fetch, configure and build each agent
    #[command(long_about = "Create the data directory, then fetch, configure and build each agent.\n\n\
        Steps run one after another and the first failing step aborts the run\n\
        with that step's exit code. Nothing is cleaned up on failure. This is\n\
        the default command.")]
    Run(RunCmd),

    /// Print the steps a run would execute without executing them
    Plan(PlanCmd),

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Show tac-setup version
    Version,
}

#[derive(Parser, Debug)]
pub struct RunCmd {
    #[command(flatten)]
    pub setup: SetupFlags,
}

#[derive(Parser, Debug)]
pub struct PlanCmd {
    #[command(flatten)]
    pub setup: SetupFlags,

    /// Print the plan as JSON
    #[arg(long)]
    pub json: bool,
}
