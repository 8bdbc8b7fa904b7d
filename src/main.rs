use anyhow::Result;
use clap::Parser;

use transc::cli::{self, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (absent outside development)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("transc=info".parse()?),
        )
        .init();

    let args = Cli::parse();
    match args.command {
        Some(Commands::Init) => cli::handle_init(),
        None => cli::handle_run().await,
    }
}
