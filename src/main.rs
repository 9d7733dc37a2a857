use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

use commands::{
    AuthCommand, ConfigCommand, EventCommand, FamilyCommand, MemberCommand, ShoppingCommand,
    SyncCommand,
};
use config::Config;

#[derive(Parser)]
#[command(name = "fam")]
#[command(version)]
#[command(about = "A family organizer with optional backend sync", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Register, log in and out
    Auth(AuthCommand),

    /// Create, join and manage your family
    Family(FamilyCommand),

    /// Manage family members
    Member(MemberCommand),

    /// Manage calendar events
    Event(EventCommand),

    /// Manage the shopping list
    Shopping(ShoppingCommand),

    /// Pull the family's data from the backend
    Sync(SyncCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "famagenda=warn,famagenda_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = Config::load(cli.config)?;

    match cli.command {
        Some(Commands::Auth(cmd)) => cmd.run(&config).await?,
        Some(Commands::Family(cmd)) => cmd.run(&config).await?,
        Some(Commands::Member(cmd)) => cmd.run(&config)?,
        Some(Commands::Event(cmd)) => cmd.run(&config)?,
        Some(Commands::Shopping(cmd)) => cmd.run(&config)?,
        Some(Commands::Sync(cmd)) => cmd.run(&config).await?,
        Some(Commands::Config(cmd)) => cmd.run(&config)?,
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}
