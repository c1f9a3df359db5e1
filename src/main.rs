use std::time::Duration;

use clap::Parser;

use smartfood::{AppConfig, AppState};

mod cli;
mod commands;

use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "smartfood=warn".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    // stdout carries command output, logs go to stderr
    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    }

    let cli = Cli::parse();

    let mut config = AppConfig::from_env()?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    if let Commands::Analyze {
        delay_ms: Some(ms), ..
    } = &cli.command
    {
        config.analysis_delay = Duration::from_millis(*ms);
    }

    let mut state = AppState::init(config).await?;
    let json = cli.json;

    match cli.command {
        Commands::Login { email, password } => {
            commands::login(&mut state, &email, &password, json).await
        }
        Commands::Register {
            name,
            email,
            password,
        } => commands::register(&mut state, &name, &email, &password, json).await,
        Commands::Logout => commands::logout(&mut state).await,
        Commands::Whoami => commands::whoami(&state, json),
        Commands::Profile { action } => commands::profile(&mut state, action, json).await,
        Commands::Analyze { path, .. } => commands::analyze(&mut state, &path, json).await,
        Commands::History { action } => commands::history(&state, action, json),
        Commands::Dashboard => commands::dashboard(&state, json),
    }
}
