//! Lovechat - companion-chat backend core
//!
#![doc = "Lovechat - companion-chat backend core"]
#![doc = "Main entry point for the Lovechat CLI."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use lovechat::cli::{Cli, Commands};
use lovechat::commands;
use lovechat::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    init_tracing();

    // Parse command line arguments
    let cli = Cli::parse_args();

    // If the user supplied a storage path on the CLI, mirror it into
    // LOVECHAT_DB so the storage initializer can pick it up.
    if let Some(db_path) = &cli.db_path {
        std::env::set_var("LOVECHAT_DB", db_path);
        tracing::info!("Using storage DB override from CLI: {}", db_path);
    }

    // Load configuration
    let config_path = cli.config.clone().unwrap_or_else(|| "config/config.yaml".to_string());
    let config = Config::load(&config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Chat { persona, user } => {
            tracing::info!("Starting interactive chat with {}", persona);
            commands::chat::run_chat(config, persona, user).await?;
            Ok(())
        }
        Commands::History { command } => {
            tracing::info!("Starting history command");
            let (storage, service) = commands::build_service(&config)?;
            commands::history::handle_history(&storage, &service, command)?;
            Ok(())
        }
        Commands::Personas => {
            commands::personas::list_personas()?;
            Ok(())
        }
        Commands::Analytics { user } => {
            tracing::info!("Starting analytics command");
            let (storage, service) = commands::build_service(&config)?;
            commands::analytics::show_analytics(&storage, &service, user)?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lovechat=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
