use crate::config::Config;
use crate::error::{Result, TacSetupError};
use crate::provision::{self, Plan};

pub fn execute(config: &Config, json: bool) -> Result<()> {
    config.validate()?;
    let plan = provision::build_plan(config)?;

    if json {
        let rendered = serde_json::to_string_pretty(&plan)
            .map_err(|e| TacSetupError::CommandFailed(format!("Failed to render plan: {}", e)))?;
        println!("{}", rendered);
    } else {
        print!("{}", render(&plan));
    }

    Ok(())
}

/// Text form of a plan: the flag line followed by one command per step
pub fn render(plan: &Plan) -> String {
    let mut out = format!("USE_CLIENT {}\n", plan.use_client);
    for (index, step) in plan.steps.iter().enumerate() {
        out.push_str(&format!("{:>2}. {}\n", index + 1, step.command_line()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_render_default_plan() {
        let mut config = Config::default();
        config.workdir = PathBuf::from("/work");
        let plan = provision::build_plan(&config).unwrap();

        let text = render(&plan);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "USE_CLIENT false");
        assert_eq!(lines[1], " 1. mkdir /data");
        assert_eq!(lines[2], " 2. (cd /work && aea fetch --local fetchai/tac_controller)");
        assert_eq!(lines.len(), 8);
        assert!(!text.contains("p2p_libp2p"));
    }

    #[test]
    fn test_render_client_plan() {
        let config = Config {
            use_client: true,
            ..Config::default()
        };
        let plan = provision::build_plan(&config).unwrap();
        let text = render(&plan);

        assert!(text.starts_with("USE_CLIENT true\n"));
        assert_eq!(
            text.matches("aea config set agent.default_connection fetchai/p2p_libp2p_client:0.18.0")
                .count(),
            2
        );
        assert_eq!(text.matches("aea remove connection fetchai/p2p_libp2p)").count(), 2);
    }
}
