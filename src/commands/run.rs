use crate::aea::AeaCli;
use crate::config::Config;
use crate::error::Result;
use crate::provision::{self, Executor};
use crate::utils::process::SystemExecutor;

pub fn execute(config: &Config) -> Result<()> {
    execute_with(config, &mut SystemExecutor)
}

/// Run the full provisioning sequence through `executor`.
pub fn execute_with<E: Executor + ?Sized>(config: &Config, executor: &mut E) -> Result<()> {
    println!("USE_CLIENT {}", config.use_client);

    config.validate()?;

    let aea = AeaCli::new(config.tool.clone(), config.workdir.clone());
    let program = aea.resolve()?;
    tracing::debug!(program = %program.display(), "resolved tool");

    // Steps run in other directories, so they must use the resolved path
    let resolved = Config {
        tool: program.to_string_lossy().into_owned(),
        ..config.clone()
    };
    let plan = provision::build_plan(&resolved)?;
    tracing::debug!(steps = plan.len(), use_client = plan.use_client, "plan resolved");

    provision::execute(&plan, executor)?;

    println!("\nAgents ready:");
    for agent in &config.agents {
        println!("  {}", aea.agent_dir(agent.dir_name()).display());
    }
    println!("Data directory: {}", config.data_dir.display());

    Ok(())
}
