//! Sync CLI commands for pulling the family's data from the backend.

use clap::{Args, Subcommand};
use famagenda_core::SyncReport;

use crate::commands::{open_app, print_sync_report};
use crate::config::Config;

/// Pull the family's data from the backend
#[derive(Debug, Args)]
pub struct SyncCommand {
    #[command(subcommand)]
    command: Option<SyncSubcommand>,
}

#[derive(Debug, Subcommand)]
enum SyncSubcommand {
    /// Show backend configuration and the bound family
    Status,
}

impl SyncCommand {
    pub async fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            None => self.sync(config).await,
            Some(SyncSubcommand::Status) => self.status(config),
        }
    }

    async fn sync(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let app = open_app(config)?;

        println!("Syncing with backend...");
        let report = app.refresh().await;
        match &report {
            SyncReport::NoRemoteFamily => {
                println!("Nothing to sync: the current family is not on the backend.");
            }
            SyncReport::Failed(e) => return Err(e.to_string().into()),
            SyncReport::Completed(_) => print_sync_report(&report),
        }
        Ok(())
    }

    fn status(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        println!("Sync Configuration");
        println!("==================");
        println!();

        if !config.backend.is_configured() {
            println!("Status: Not configured (local only)");
            println!();
            println!("To enable sync, add to your config file:");
            println!();
            println!("  backend:");
            println!("    url: \"https://your-project.supabase.co\"");
            println!("    api_key: \"your-api-key\"");
            println!();
            println!("Or set environment variables:");
            println!("  FAMAGENDA_BACKEND_URL, FAMAGENDA_BACKEND_KEY");
            return Ok(());
        }

        println!("Status: Configured");
        if let Some(url) = &config.backend.url.value {
            println!("Backend: {} ({})", url, config.backend.url.source);
        }
        println!("Timeout: {}s", config.backend.timeout().as_secs());
        println!(
            "Parallel fetches: {}",
            config.backend.max_concurrent_fetches.value.max(1)
        );

        let app = open_app(config)?;
        match app.auth_store().family_remote_id() {
            Some(id) => println!("Family backend id: {}", id),
            None => println!("Family backend id: (none)"),
        }
        Ok(())
    }
}
