use crate::cli::ConfigCommands;
use crate::config::Config;
use crate::error::Result;
use std::path::Path;

pub fn execute(command: &ConfigCommands, project_root: &Path, explicit: Option<&Path>) -> Result<()> {
    match command {
        ConfigCommands::Validate { file } => validate(project_root, file.as_deref().or(explicit)),
        ConfigCommands::Show => show(project_root, explicit),
    }
}

fn validate(project_root: &Path, explicit: Option<&Path>) -> Result<()> {
    println!("Validating configuration files...\n");

    for path in Config::candidate_files(project_root) {
        if path.exists() {
            println!("  Found: {}", path.display());
        } else {
            println!("  {} - not found (optional)", path.display());
        }
    }
    if let Some(path) = explicit {
        println!("  Explicit: {}", path.display());
    }

    println!("\nLoading and validating configuration...");
    match Config::load(project_root, explicit).and_then(|config| config.validate()) {
        Ok(()) => {
            println!("✓ Configuration is valid!");
            Ok(())
        }
        Err(e) => {
            println!("✗ Configuration is invalid!");
            println!("  Error: {}", e);
            Err(e)
        }
    }
}

fn show(project_root: &Path, explicit: Option<&Path>) -> Result<()> {
    let config = Config::load(project_root, explicit)?.resolve_paths();

    println!("Effective Configuration:");
    println!("(CLI > Environment > --config > Project config > Global config > Defaults)\n");

    println!("tool: {}", config.tool);
    println!("data_dir: {}", config.data_dir.display());
    println!("workdir: {}", config.workdir.display());
    println!("use_client: {}", config.use_client);

    println!("\nConnection:");
    println!("  default: {}", config.connection.default);
    println!("  client: {}", config.connection.client);
    println!("  client_version: {}", config.connection.client_version);

    println!("\nAgents:");
    for agent in &config.agents {
        match &agent.alias {
            Some(alias) => println!("  - {} (as {})", agent.package, alias),
            None => println!("  - {}", agent.package),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    #[serial_test::serial]
    fn test_validate_reports_invalid_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("bad.toml");
        std::fs::write(&file, "[connection]\nclient_version = \"soon\"\n").unwrap();

        let command = ConfigCommands::Validate { file: Some(file) };
        assert!(execute(&command, dir.path(), None).is_err());
    }

    #[test]
    #[serial_test::serial]
    fn test_validate_accepts_good_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("good.toml");
        std::fs::write(&file, "data_dir = \"/srv/tac\"\n").unwrap();

        let command = ConfigCommands::Validate { file: Some(file) };
        execute(&command, dir.path(), None).unwrap();
    }
}
