//! RelayChat - terminal chat client
//!
#![doc = "Main entry point for the RelayChat application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use relaychat::cli::{Cli, Commands};
use relaychat::commands;
use relaychat::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    init_tracing(cli.verbose);

    // Load configuration
    let config = Config::load(&cli.config, &cli)?;

    // Validate configuration
    config.validate()?;
    tracing::debug!(?config, "Configuration loaded");

    match cli.command {
        Commands::Chat => {
            commands::chat::run_chat(config).await?;
            Ok(())
        }
        Commands::Login { key, no_remember } => {
            tracing::info!("Starting login");
            commands::auth::login(config, key, !no_remember).await?;
            Ok(())
        }
        Commands::Logout => {
            tracing::info!("Starting logout");
            commands::auth::logout(config).await?;
            Ok(())
        }
        Commands::Send { text } => {
            commands::send::send_message(config, text).await?;
            Ok(())
        }
        Commands::Status => {
            commands::status::show_status(config).await?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
///
/// Logs go to stderr so they never interleave with the transcript on stdout.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "relaychat=debug"
    } else {
        "relaychat=warn"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
