use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod bootstrap;
mod commands;

#[derive(Parser)]
#[command(name = "calbot")]
#[command(
    about = "Calbot - manage your Cal.com bookings by chatting with an LLM",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with the assistant in the terminal
    Chat {
        /// Session identifier for this conversation
        #[arg(long, default_value = "cli")]
        session: String,
    },
    /// Serve the chat API over HTTP
    Serve {
        /// Bind host (overrides HOST and config.toml)
        #[arg(long)]
        host: Option<String>,
        /// Bind port (overrides PORT and config.toml)
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = bootstrap::load_config()?;
    bootstrap::init_tracing(&config.debug.log_level);
    let store = Arc::new(bootstrap::build_session_store(&config).await?);

    match cli.command {
        Commands::Chat { session } => commands::chat::run(store, &session).await?,
        Commands::Serve { host, port } => {
            let addr = bootstrap::bind_address(&config.server, host, port, |key| {
                std::env::var(key).ok()
            })?;
            commands::serve::run(store, &addr).await?
        }
    }

    Ok(())
}
