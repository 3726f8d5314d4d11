//! Provisioning plan and its fail-fast execution.
//!
//! A [`Plan`] is derived from configuration alone: create the data directory,
//! then for each agent in order fetch it, optionally swap its connection for
//! the client variant, install and build. [`execute`] walks the plan through an
//! [`Executor`] and stops at the first step that fails.

use crate::aea::{AeaCli, Invocation};
use crate::config::Config;
use crate::error::Result;
use crate::utils::shell;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Side effects a plan needs from the outside world.
pub trait Executor {
    /// Create a single directory; fails if it already exists.
    fn create_dir(&mut self, path: &Path) -> Result<()>;

    /// Run one tool invocation to completion.
    fn run(&mut self, invocation: &Invocation) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Step {
    CreateDataDir { path: PathBuf },
    Tool(Invocation),
}

impl Step {
    pub fn name(&self) -> String {
        match self {
            Step::CreateDataDir { .. } => "create data directory".to_string(),
            Step::Tool(inv) => inv.step_name(),
        }
    }

    /// Shell rendering used by `plan` and progress output
    pub fn command_line(&self) -> String {
        match self {
            Step::CreateDataDir { path } => {
                shell::join_args(&["mkdir".to_string(), path.display().to_string()])
            }
            Step::Tool(inv) => format!(
                "(cd {} && {})",
                shell::quote(&inv.cwd.display().to_string()),
                inv.command_line()
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plan {
    pub use_client: bool,
    pub steps: Vec<Step>,
}

impl Plan {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Resolve the ordered steps for `config`.
pub fn build_plan(config: &Config) -> Result<Plan> {
    let aea = AeaCli::new(config.tool.clone(), config.workdir.clone());
    let pinned_client = config.connection.pinned_client()?;

    let mut steps = vec![Step::CreateDataDir {
        path: config.data_dir.clone(),
    }];

    for agent in &config.agents {
        let dir = agent.dir_name();

        steps.push(Step::Tool(aea.fetch(&agent.package, agent.alias.as_deref())));

        if config.use_client {
            steps.push(Step::Tool(
                aea.remove_connection(dir, &config.connection.default),
            ));
            steps.push(Step::Tool(aea.add_connection(dir, &config.connection.client)));
            steps.push(Step::Tool(aea.set_default_connection(dir, &pinned_client)));
        }

        steps.push(Step::Tool(aea.install(dir)));
        steps.push(Step::Tool(aea.build(dir)));
    }

    Ok(Plan {
        use_client: config.use_client,
        steps,
    })
}

/// Run every step in order, returning the first error untouched.
///
/// Nothing is rolled back: directories created by earlier steps stay on disk.
pub fn execute<E: Executor + ?Sized>(plan: &Plan, executor: &mut E) -> Result<()> {
    let total = plan.len();

    for (index, step) in plan.steps.iter().enumerate() {
        println!("[{}/{}] {}", index + 1, total, step.name());
        tracing::info!(step = %step.name(), command = %step.command_line(), "running step");

        let result = match step {
            Step::CreateDataDir { path } => executor.create_dir(path),
            Step::Tool(inv) => executor.run(inv),
        };

        if let Err(e) = result {
            tracing::debug!(step = %step.name(), error = %e, "step failed, aborting");
            return Err(e);
        }
    }

    Ok(())
}
