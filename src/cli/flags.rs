use clap::Parser;
use std::path::PathBuf;

/// Flags shared by the run and plan commands.
#[derive(Parser, Debug, Clone, Default)]
pub struct SetupFlags {
    /// Swap the p2p connection for the client variant (same as USE_CLIENT=true)
    #[arg(long = "use-client")]
    pub use_client: bool,

    /// Shared data directory to create before fetching agents
    #[arg(long = "data-dir")]
    pub data_dir: Option<PathBuf>,

    /// Parent directory agents are fetched into
    #[arg(long)]
    pub workdir: Option<PathBuf>,

    /// Path or name of the aea executable
    #[arg(long = "aea-bin")]
    pub aea_bin: Option<String>,
}
