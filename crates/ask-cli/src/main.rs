//! Ask Anything CLI - Ask questions about Re:cinq from the terminal.

use ask_cli::commands;
use ask_cli::repl;
use ask_cli::{ChatSession, Cli, Command, Config, Formatter};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> ask_cli::Result<()> {
    let cli = Cli::parse();

    let config_path = match cli.config {
        Some(path) => PathBuf::from(path),
        None => Config::path()?,
    };

    let mut config = Config::load_from(&config_path).unwrap_or_else(|_| {
        let cfg = Config::default();
        cfg.save_to(&config_path).ok();
        cfg
    });

    if let Some(profile_name) = cli.profile {
        config.switch_profile(profile_name)?;
    }

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        None => {
            let backend = commands::connect_backend(&config, false)?;
            let history_path = Config::history_path()?;
            repl::run_repl(
                ChatSession::new(backend),
                &history_path,
                config.settings.history_size,
                &formatter,
            )
            .await?;
        }
        Some(Command::Chat(args)) => {
            let backend = commands::connect_backend(&config, args.local)?;
            let history_path = Config::history_path()?;
            repl::run_repl(
                ChatSession::new(backend),
                &history_path,
                config.settings.history_size,
                &formatter,
            )
            .await?;
        }
        Some(Command::Ask(args)) => {
            let backend = commands::connect_backend(&config, args.local)?;
            commands::execute_ask(args, &backend, &formatter).await?;
        }
        Some(Command::Status(args)) => {
            let backend = commands::connect_backend(&config, args.local)?;
            commands::execute_status(&backend, &formatter).await?;
        }
        Some(Command::Ingest(args)) => {
            let profile = config.get_active_profile()?;
            commands::execute_ingest(args, profile, &formatter).await?;
        }
        Some(Command::Profile(args)) => {
            commands::execute_profile(args, &mut config, &config_path, &formatter).await?;
        }
    }

    Ok(())
}
