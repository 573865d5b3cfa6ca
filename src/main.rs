use std::sync::Arc;

use chainrag::cli::handle_ask_command;
use chainrag::cli::handle_config_command;
use chainrag::cli::handle_serve_command;
use chainrag::cli::handle_stats_command;
use chainrag::cli::Cli;
use chainrag::cli::Commands;
use chainrag::config::AppConfig;
use chainrag::store::TransactionStore;
use chainrag::Result;
use clap::Parser;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let mut config = AppConfig::load()?;
    if let Some(data) = &cli.data {
        config.data.file = data.display().to_string();
    }

    if cli.verbose {
        chainrag::logging::init_logging_with_level("debug")?;
    } else {
        chainrag::logging::init_logging_with_config(Some(&config))?;
    }
    info!("Configuration loaded successfully");

    if let Commands::Config = cli.command {
        return handle_config_command(&config);
    }

    let store = Arc::new(TransactionStore::load_or_empty(config.data_file()));

    match cli.command {
        Commands::Serve { host, port, cors } => {
            handle_serve_command(&config, store, host, port, cors).await?;
        }
        Commands::Ask {
            question,
            rag,
            json,
        } => {
            handle_ask_command(&config, store, &question, rag, json).await?;
        }
        Commands::Stats { export } => {
            handle_stats_command(&store, export.as_deref())?;
        }
        Commands::Config => handle_config_command(&config)?,
    }

    Ok(())
}
