mod commands;

use clap::Parser;
use commands::Cli;
use tracing::Level;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    commands::run(cli).await
}
