use clap::Parser;

mod commands;
mod execute;
mod logging;

use commands::Commands;

#[derive(Parser)]
#[command(name = "tripwire")]
#[command(
    about = "Exercise a circuit breaker against a simulated flaky dependency",
    long_about = None
)]
#[command(version)]
struct Cli {
    /// Log level or filter directives (overridden by TRIPWIRE_LOG)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    logging::init(&cli.log_level)?;

    cli.command.execute().await
}
