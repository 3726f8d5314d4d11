use super::public_id::PublicId;
use crate::error::{Result, TacSetupError};
use crate::utils::shell;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Config key the framework reads to pick an agent's default connection.
pub const DEFAULT_CONNECTION_KEY: &str = "agent.default_connection";

/// Which part of an agent's provisioning an invocation performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Fetch,
    RemoveConnection,
    AddConnection,
    SetDefaultConnection,
    Install,
    Build,
}

impl Stage {
    pub fn label(&self) -> &'static str {
        match self {
            Stage::Fetch => "fetch",
            Stage::RemoveConnection => "remove connection",
            Stage::AddConnection => "add connection",
            Stage::SetDefaultConnection => "set default connection",
            Stage::Install => "install",
            Stage::Build => "build",
        }
    }
}

/// One call of the framework CLI, fully resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invocation {
    /// Working directory name of the agent this call belongs to
    pub agent: String,
    pub stage: Stage,
    pub program: String,
    pub args: Vec<String>,
    /// Directory the command runs in
    pub cwd: PathBuf,
}

impl Invocation {
    /// Short step name used in progress output and errors, e.g. `fetch tac_controller`
    pub fn step_name(&self) -> String {
        format!("{} {}", self.stage.label(), self.agent)
    }

    /// Command line as a shell would read it
    pub fn command_line(&self) -> String {
        let mut parts = Vec::with_capacity(self.args.len() + 1);
        parts.push(self.program.as_str());
        parts.extend(self.args.iter().map(String::as_str));
        shell::join_args(&parts)
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.command_line())
    }
}

/// Builder for `aea` subcommand invocations rooted at a parent workdir.
///
/// `fetch` runs in the workdir itself; every other call runs inside the
/// fetched agent's directory.
#[derive(Debug, Clone)]
pub struct AeaCli {
    program: String,
    workdir: PathBuf,
}

impl AeaCli {
    pub fn new(program: impl Into<String>, workdir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            workdir: workdir.into(),
        }
    }

    /// Locate the tool on PATH, or as a path relative to the current directory.
    ///
    /// The result is absolute, so it still names the same file when a step
    /// runs inside an agent directory.
    pub fn resolve(&self) -> Result<PathBuf> {
        let path = which::which(&self.program)
            .map_err(|_| TacSetupError::ToolNotInstalled(self.program.clone()))?;

        if path.is_absolute() {
            Ok(path)
        } else {
            Ok(std::env::current_dir()?.join(path))
        }
    }

    /// Directory a fetched agent lands in
    pub fn agent_dir(&self, dir_name: &str) -> PathBuf {
        self.workdir.join(dir_name)
    }

    /// `fetch --local <package> [--alias <alias>]`
    pub fn fetch(&self, package: &PublicId, alias: Option<&str>) -> Invocation {
        let mut args = vec![
            "fetch".to_string(),
            "--local".to_string(),
            package.to_string(),
        ];
        if let Some(alias) = alias {
            args.push("--alias".to_string());
            args.push(alias.to_string());
        }

        Invocation {
            agent: alias.unwrap_or(package.name()).to_string(),
            stage: Stage::Fetch,
            program: self.program.clone(),
            args,
            cwd: self.workdir.clone(),
        }
    }

    /// `remove connection <id>`
    pub fn remove_connection(&self, agent: &str, connection: &PublicId) -> Invocation {
        self.in_agent(
            agent,
            Stage::RemoveConnection,
            vec!["remove".into(), "connection".into(), connection.to_string()],
        )
    }

    /// `add connection <id>`
    pub fn add_connection(&self, agent: &str, connection: &PublicId) -> Invocation {
        self.in_agent(
            agent,
            Stage::AddConnection,
            vec!["add".into(), "connection".into(), connection.to_string()],
        )
    }

    /// `config set agent.default_connection <id>`; `connection` must carry its version pin
    pub fn set_default_connection(&self, agent: &str, connection: &PublicId) -> Invocation {
        self.in_agent(
            agent,
            Stage::SetDefaultConnection,
            vec![
                "config".into(),
                "set".into(),
                DEFAULT_CONNECTION_KEY.into(),
                connection.to_string(),
            ],
        )
    }

    /// `install`
    pub fn install(&self, agent: &str) -> Invocation {
        self.in_agent(agent, Stage::Install, vec!["install".into()])
    }

    /// `build`
    pub fn build(&self, agent: &str) -> Invocation {
        self.in_agent(agent, Stage::Build, vec!["build".into()])
    }

    fn in_agent(&self, agent: &str, stage: Stage, args: Vec<String>) -> Invocation {
        Invocation {
            agent: agent.to_string(),
            stage,
            program: self.program.clone(),
            args,
            cwd: self.agent_dir(agent),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli() -> AeaCli {
        AeaCli::new("aea", "/work")
    }

    #[test]
    fn test_fetch_without_alias() {
        let package: PublicId = "fetchai/tac_controller".parse().unwrap();
        let inv = cli().fetch(&package, None);

        assert_eq!(inv.args, vec!["fetch", "--local", "fetchai/tac_controller"]);
        assert_eq!(inv.agent, "tac_controller");
        assert_eq!(inv.cwd, PathBuf::from("/work"));
        assert_eq!(inv.stage, Stage::Fetch);
    }

    #[test]
    fn test_fetch_with_alias() {
        let package: PublicId = "fetchai/tac_participant".parse().unwrap();
        let inv = cli().fetch(&package, Some("tac_participant_template"));

        assert_eq!(
            inv.args,
            vec![
                "fetch",
                "--local",
                "fetchai/tac_participant",
                "--alias",
                "tac_participant_template"
            ]
        );
        assert_eq!(inv.agent, "tac_participant_template");
        assert_eq!(inv.step_name(), "fetch tac_participant_template");
    }

    #[test]
    fn test_agent_commands_run_in_agent_dir() {
        let connection: PublicId = "fetchai/p2p_libp2p".parse().unwrap();
        let cli = cli();

        for inv in [
            cli.remove_connection("tac_controller", &connection),
            cli.add_connection("tac_controller", &connection),
            cli.install("tac_controller"),
            cli.build("tac_controller"),
        ] {
            assert_eq!(inv.cwd, PathBuf::from("/work/tac_controller"));
            assert_eq!(inv.program, "aea");
        }
    }

    #[test]
    fn test_set_default_connection_args() {
        let client: PublicId = "fetchai/p2p_libp2p_client:0.18.0".parse().unwrap();
        let inv = cli().set_default_connection("tac_controller", &client);

        assert_eq!(
            inv.args,
            vec![
                "config",
                "set",
                "agent.default_connection",
                "fetchai/p2p_libp2p_client:0.18.0"
            ]
        );
        assert_eq!(inv.step_name(), "set default connection tac_controller");
    }

    #[test]
    fn test_command_line_rendering() {
        let inv = AeaCli::new("/opt/my tools/aea", "/work").install("tac_controller");
        assert_eq!(inv.command_line(), "'/opt/my tools/aea' install");
        assert_eq!(inv.to_string(), inv.command_line());
    }

    #[test]
    fn test_missing_program_not_installed() {
        let cli = AeaCli::new("definitely-not-a-real-aea-binary-xyz", "/work");
        assert!(matches!(
            cli.resolve(),
            Err(TacSetupError::ToolNotInstalled(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    #[serial_test::serial]
    fn test_resolve_relative_path_is_absolute() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("bin")).unwrap();
        let tool = dir.path().join("bin/aea");
        std::fs::write(&tool, "#!/bin/sh\nexit 0\n").unwrap();
        std::fs::set_permissions(&tool, std::fs::Permissions::from_mode(0o755)).unwrap();

        let previous = std::env::current_dir().unwrap();
        std::env::set_current_dir(dir.path()).unwrap();
        let resolved = AeaCli::new("./bin/aea", "/work").resolve();
        std::env::set_current_dir(previous).unwrap();

        let resolved = resolved.unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("bin/aea"));
    }
}
