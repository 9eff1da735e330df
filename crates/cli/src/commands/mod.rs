use clap::Subcommand;
use std::path::PathBuf;

pub mod check_config;
pub mod simulate;

use self::simulate::SimulateArgs;

#[derive(Subcommand)]
pub enum Commands {
    /// Run a breaker against an operation that fails at random
    #[command(visible_alias = "sim")]
    Simulate(SimulateArgs),

    /// Load and validate a JSON breaker configuration file
    CheckConfig {
        /// Path to the configuration file
        path: PathBuf,
    },
}
