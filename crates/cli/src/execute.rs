use crate::commands::{check_config, simulate, Commands};

impl Commands {
    pub async fn execute(self) -> eyre::Result<()> {
        match self {
            Commands::Simulate(args) => simulate::execute(args).await,
            Commands::CheckConfig { path } => check_config::execute(&path),
        }
    }
}
