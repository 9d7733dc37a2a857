//! Account commands.

use clap::{Args, Subcommand};

use crate::commands::{open_app, print_sync_report};
use crate::config::Config;

/// Register, log in and out
#[derive(Args)]
pub struct AuthCommand {
    #[command(subcommand)]
    pub command: AuthSubcommand,
}

#[derive(Subcommand)]
pub enum AuthSubcommand {
    /// Create an account on this device and log in
    Register {
        /// Display name
        name: String,
        /// Email address
        email: String,
        /// Password
        #[arg(long, short)]
        password: String,
    },
    /// Log in and pull the family's data
    Login {
        /// Email address
        email: String,
        /// Password
        #[arg(long, short)]
        password: String,
    },
    /// Log out
    Logout,
    /// Show the logged-in user
    Whoami,
}

impl AuthCommand {
    pub async fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let app = open_app(config)?;
        let auth = app.auth_store();

        match &self.command {
            AuthSubcommand::Register {
                name,
                email,
                password,
            } => {
                let user = auth.register(name, email, password)?;
                println!("✓ Registered and logged in as {}", user);
                println!();
                println!("Next: fam family create <name>  or  fam family join <code>");
            }
            AuthSubcommand::Login { email, password } => {
                let (user, report) = app.login(email, password).await?;
                println!("✓ Logged in as {}", user);
                print_sync_report(&report);
            }
            AuthSubcommand::Logout => {
                app.logout();
                println!("Logged out.");
            }
            AuthSubcommand::Whoami => match auth.user() {
                Some(user) if auth.is_authenticated() => {
                    println!("{}", user);
                    if let Some(group) = auth.family_group() {
                        println!("Family: {}", group);
                    }
                }
                _ => println!("Not logged in."),
            },
        }

        Ok(())
    }
}
