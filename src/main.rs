pub mod types;
pub mod config;
pub mod error;
pub mod data;
pub mod processing;
pub mod encoding;
pub mod templates;
pub mod render;
pub mod resolve;
pub mod server;

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the interactive school count map
    Serve {
        #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Serve { config } => {
            tracing::info!("Serving map with config: {:?}", config);
            let app_config = config::AppConfig::load_from_file(config)?;

            // Fail at startup rather than on the first page view.
            let dataset = data::Dataset::new(app_config.input.clone());
            dataset.load_schools()
                .with_context(|| format!("Failed to load school data from {:?}", app_config.input.path))?;

            server::start_server(app_config, dataset).await?;
        }
    }

    Ok(())
}
