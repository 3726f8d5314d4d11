use std::path::PathBuf;
use thiserror::Error;

/// Exit status used by shells when a command cannot be found.
pub const EXIT_COMMAND_NOT_FOUND: u8 = 127;

/// Generic failure status for errors that did not come from a child process.
pub const EXIT_FAILURE: u8 = 1;

#[derive(Error, Debug)]
pub enum TacSetupError {
    #[error("{0} not found on PATH. Install the aea framework (pip install aea) or set TAC_SETUP_AEA_BIN")]
    ToolNotInstalled(String),

    #[error("Failed to create data directory {}: {source}", path.display())]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Step '{step}' failed with exit code {code}")]
    StepFailed { step: String, code: i32 },

    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("Invalid public id: {0}")]
    InvalidId(String),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl TacSetupError {
    /// Process exit status to report for this error.
    ///
    /// A failing external command hands its own status through unchanged so
    /// callers see the same code the tool returned.
    pub fn exit_code(&self) -> u8 {
        match self {
            TacSetupError::StepFailed { code, .. } => {
                u8::try_from(*code).ok().filter(|c| *c != 0).unwrap_or(EXIT_FAILURE)
            }
            TacSetupError::ToolNotInstalled(_) => EXIT_COMMAND_NOT_FOUND,
            _ => EXIT_FAILURE,
        }
    }
}

pub type Result<T> = std::result::Result<T, TacSetupError>;
