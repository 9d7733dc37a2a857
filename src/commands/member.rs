use clap::{Args, Subcommand};
use famagenda_core::FamilyMember;

use crate::commands::{open_app, OutputFormat};
use crate::config::Config;

#[derive(Args)]
pub struct MemberCommand {
    #[command(subcommand)]
    pub command: MemberSubcommand,
}

#[derive(Subcommand)]
pub enum MemberSubcommand {
    /// Add a family member
    Add {
        /// Member name
        name: String,

        /// Color as hex (picked from the palette if omitted)
        #[arg(long)]
        color: Option<String>,

        /// Mark as a child
        #[arg(long)]
        child: bool,
    },

    /// List family members
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Remove a family member
    Remove {
        /// Member id
        id: String,
    },
}

impl MemberCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let app = open_app(config)?;
        let store = app.family_store();

        match &self.command {
            MemberSubcommand::Add { name, color, child } => {
                let member = FamilyMember::new(name, color.clone().unwrap_or_default())
                    .with_adult(!child);
                let id = store.add_member(member);
                println!("Added member {} ({})", name, id);
            }

            MemberSubcommand::List { format } => {
                let members = store.members();
                match format {
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&members)?),
                    OutputFormat::Text => {
                        if members.is_empty() {
                            println!("No members.");
                        }
                        for member in &members {
                            println!("{}  {}", member.id, member);
                        }
                    }
                }
            }

            MemberSubcommand::Remove { id } => {
                if store.remove_member(id) {
                    println!("Removed member {}", id);
                } else {
                    println!("Member not found: {}", id);
                }
            }
        }

        Ok(())
    }
}
