use crate::aea::public_id::{self, PublicId};
use crate::cli::SetupFlags;
use crate::error::{Result, TacSetupError};
use crate::utils::path::expand_or_keep;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Config file name looked up in the home and current directories
pub const CONFIG_FILE_NAME: &str = ".tac-setup.toml";

/// Environment variable gating the client connection swap
pub const USE_CLIENT_ENV: &str = "USE_CLIENT";
pub const AEA_BIN_ENV: &str = "TAC_SETUP_AEA_BIN";
pub const DATA_DIR_ENV: &str = "TAC_SETUP_DATA_DIR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Framework CLI executable
    #[serde(default = "default_tool")]
    pub tool: String,

    /// Shared directory created before any agent is fetched
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Parent directory agents are fetched into
    #[serde(default = "default_workdir")]
    pub workdir: PathBuf,

    /// Swap the default p2p connection for the client variant
    #[serde(default)]
    pub use_client: bool,

    #[serde(default)]
    pub connection: ConnectionConfig,

    #[serde(default = "default_agents")]
    pub agents: Vec<AgentEntry>,

    /// Debug logging (not stored in config file)
    #[serde(skip)]
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tool: default_tool(),
            data_dir: default_data_dir(),
            workdir: default_workdir(),
            use_client: false,
            connection: ConnectionConfig::default(),
            agents: default_agents(),
            verbose: false,
        }
    }
}

fn default_tool() -> String {
    "aea".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("/data")
}

fn default_workdir() -> PathBuf {
    PathBuf::from(".")
}

fn default_agents() -> Vec<AgentEntry> {
    vec![
        AgentEntry {
            package: fetchai("tac_controller"),
            alias: None,
        },
        AgentEntry {
            package: fetchai("tac_participant"),
            alias: Some("tac_participant_template".to_string()),
        },
    ]
}

/// One config file as written. `use_client` stays unset when the file leaves
/// it out, so a later file can switch it off again.
#[derive(Debug, Deserialize)]
struct FileLayer {
    #[serde(default)]
    use_client: Option<bool>,

    #[serde(flatten)]
    config: Config,
}

fn fetchai(name: &str) -> PublicId {
    PublicId::builtin("fetchai", name)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Connection shipped with the agents, removed when the client is used
    #[serde(default = "default_connection")]
    pub default: PublicId,

    /// Client-variant connection added in its place
    #[serde(default = "default_client_connection")]
    pub client: PublicId,

    /// Version the client connection is pinned to in the agent config
    #[serde(default = "default_client_version")]
    pub client_version: String,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            default: default_connection(),
            client: default_client_connection(),
            client_version: default_client_version(),
        }
    }
}

impl ConnectionConfig {
    /// Client connection id pinned to `client_version`
    pub fn pinned_client(&self) -> Result<PublicId> {
        self.client.without_version().with_version(&self.client_version)
    }
}

fn default_connection() -> PublicId {
    fetchai("p2p_libp2p")
}

fn default_client_connection() -> PublicId {
    fetchai("p2p_libp2p_client")
}

fn default_client_version() -> String {
    "0.18.0".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentEntry {
    pub package: PublicId,

    /// Working directory name to fetch into instead of the package name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl AgentEntry {
    pub fn dir_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(self.package.name())
    }
}

/// Normalise a raw `USE_CLIENT` value: only the exact string `true` enables it.
pub fn parse_use_client(raw: &str) -> bool {
    raw == "true"
}

impl Config {
    /// Load configuration with precedence:
    /// 1. CLI flags (applied later via with_setup_overrides)
    /// 2. Environment variables
    /// 3. Explicit --config file
    /// 4. Project config (.tac-setup.toml in the current directory)
    /// 5. Global config (~/.tac-setup.toml)
    /// 6. Built-in defaults
    pub fn load(project_root: &Path, explicit: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        for path in Self::candidate_files(project_root) {
            if path.exists() {
                tracing::debug!(path = %path.display(), "loading config file");
                config = config.merge(Self::read_layer(&path)?);
            }
        }

        if let Some(path) = explicit {
            if !path.exists() {
                return Err(TacSetupError::InvalidConfig(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            config = config.merge(Self::read_layer(path)?);
        }

        config = config.merge_env(|key| std::env::var(key).ok());

        Ok(config)
    }

    /// Global then project config paths, lowest precedence first
    pub fn candidate_files(project_root: &Path) -> Vec<PathBuf> {
        let mut files = Vec::new();
        if let Some(home) = home_dir() {
            files.push(home.join(CONFIG_FILE_NAME));
        }
        files.push(project_root.join(CONFIG_FILE_NAME));
        files
    }

    /// Read one TOML config file
    fn read_layer(path: &Path) -> Result<FileLayer> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Merge a file layer into this config (the layer takes precedence)
    fn merge(mut self, layer: FileLayer) -> Self {
        let FileLayer {
            use_client,
            config: other,
        } = layer;

        if other.tool != default_tool() {
            self.tool = other.tool;
        }
        if other.data_dir != default_data_dir() {
            self.data_dir = other.data_dir;
        }
        if other.workdir != default_workdir() {
            self.workdir = other.workdir;
        }

        if let Some(use_client) = use_client {
            self.use_client = use_client;
        }

        if other.connection.default != default_connection() {
            self.connection.default = other.connection.default;
        }
        if other.connection.client != default_client_connection() {
            self.connection.client = other.connection.client;
        }
        if other.connection.client_version != default_client_version() {
            self.connection.client_version = other.connection.client_version;
        }

        // Agent lists replace rather than append: each entry is a directory
        if other.agents != default_agents() {
            self.agents = other.agents;
        }

        self
    }

    /// Apply environment overrides read through `lookup`.
    ///
    /// A present `USE_CLIENT` decides the flag outright, so `USE_CLIENT=false`
    /// also switches off a `use_client = true` from a config file.
    pub fn merge_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(raw) = lookup(USE_CLIENT_ENV) {
            self.use_client = parse_use_client(&raw);
        }

        if let Some(tool) = lookup(AEA_BIN_ENV).filter(|v| !v.is_empty()) {
            self.tool = tool;
        }

        if let Some(dir) = lookup(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
            self.data_dir = PathBuf::from(dir);
        }

        self
    }

    /// Apply CLI overrides (highest precedence)
    pub fn with_setup_overrides(mut self, flags: &SetupFlags, verbose: bool) -> Self {
        self.verbose = verbose;

        if flags.use_client {
            self.use_client = true;
        }
        if let Some(dir) = &flags.data_dir {
            self.data_dir = dir.clone();
        }
        if let Some(dir) = &flags.workdir {
            self.workdir = dir.clone();
        }
        if let Some(tool) = &flags.aea_bin {
            self.tool = tool.clone();
        }

        self
    }

    /// Expand `~` in configured paths
    pub fn resolve_paths(mut self) -> Self {
        self.data_dir = expand_or_keep(&self.data_dir);
        self.workdir = expand_or_keep(&self.workdir);
        self
    }

    /// Reject configurations the tool would only fail on halfway through a run
    pub fn validate(&self) -> Result<()> {
        if self.tool.trim().is_empty() {
            return Err(TacSetupError::InvalidConfig(
                "tool must not be empty".to_string(),
            ));
        }

        if self.agents.is_empty() {
            return Err(TacSetupError::InvalidConfig(
                "at least one agent must be configured".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for agent in &self.agents {
            if let Some(alias) = &agent.alias {
                public_id::validate_name(alias, "alias")
                    .map_err(|e| TacSetupError::InvalidConfig(e.to_string()))?;
            }
            if !seen.insert(agent.dir_name()) {
                return Err(TacSetupError::InvalidConfig(format!(
                    "two agents would be fetched into the same directory '{}'",
                    agent.dir_name()
                )));
            }
        }

        semver::Version::parse(&self.connection.client_version).map_err(|e| {
            TacSetupError::InvalidConfig(format!(
                "connection.client_version '{}' is not a semantic version: {}",
                self.connection.client_version, e
            ))
        })?;

        if self.connection.client.same_package(&self.connection.default) {
            return Err(TacSetupError::InvalidConfig(format!(
                "client connection {} must differ from the default connection",
                self.connection.client
            )));
        }

        Ok(())
    }
}

/// Get the home directory
fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(PathBuf::from)
}
