//! Family group commands.

use clap::{Args, Subcommand};

use crate::commands::{open_app, print_sync_report};
use crate::config::Config;

/// Create, join and manage your family
#[derive(Args)]
pub struct FamilyCommand {
    #[command(subcommand)]
    pub command: FamilySubcommand,
}

#[derive(Subcommand)]
pub enum FamilySubcommand {
    /// Create a new family
    Create {
        /// Name of the family
        name: String,
    },
    /// Join a family by invite code
    Join {
        /// Six-character invite code
        code: String,
    },
    /// Show the current family
    Show,
    /// Issue a new invite code
    Invite,
    /// Leave the current family
    Leave {
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

impl FamilyCommand {
    pub async fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let app = open_app(config)?;

        match &self.command {
            FamilySubcommand::Create { name } => {
                let (group, report) = app.create_family(name).await?;
                println!("✓ Family '{}' created", group.name);
                println!();
                println!("Invite code: {}", group.invite_code);
                if group.remote_id.is_none() {
                    println!("(local only, no backend configured)");
                }
                print_sync_report(&report);
            }
            FamilySubcommand::Join { code } => {
                let (group, report) = app.join_family(code).await?;
                println!("✓ Joined family '{}'", group.name);
                print_sync_report(&report);
            }
            FamilySubcommand::Show => match app.auth_store().family_group() {
                Some(group) => {
                    println!("Family: {}", group.name);
                    println!("Invite code: {}", group.invite_code);
                    match group.remote_id {
                        Some(id) => println!("Backend id: {}", id),
                        None => println!("Backend id: (none, local only)"),
                    }
                    println!("Users: {}", group.members.len());
                }
                None => {
                    println!("No family.");
                    println!();
                    println!("Create one with: fam family create <name>");
                }
            },
            FamilySubcommand::Invite => {
                let code = app.regenerate_invite_code().await?;
                println!("New invite code: {}", code);
            }
            FamilySubcommand::Leave { force } => {
                let Some(group) = app.auth_store().family_group() else {
                    println!("No family.");
                    return Ok(());
                };
                if !force {
                    println!("This will remove '{}' from this device.", group.name);
                    println!("Run again with --force to confirm.");
                    return Ok(());
                }
                app.leave_family();
                println!("Left family '{}'", group.name);
            }
        }

        Ok(())
    }
}
