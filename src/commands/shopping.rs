use clap::{Args, Subcommand};
use famagenda_core::{ShoppingCategory, ShoppingItem};

use crate::commands::{open_app, OutputFormat};
use crate::config::Config;

#[derive(Args)]
pub struct ShoppingCommand {
    #[command(subcommand)]
    pub command: ShoppingSubcommand,
}

#[derive(Subcommand)]
pub enum ShoppingSubcommand {
    /// Add an item to the shopping list
    Add {
        /// Item name
        name: String,

        /// Quantity
        #[arg(long, short)]
        quantity: Option<f64>,

        /// Category (grocery, household, other)
        #[arg(long, short = 't', default_value = "grocery")]
        category: String,

        /// Member id of whoever added the item
        #[arg(long)]
        added_by: Option<String>,
    },

    /// Show the shopping list
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Hide completed items
        #[arg(long)]
        pending: bool,
    },

    /// Mark an item done or not done
    Toggle {
        /// Item id
        id: String,
    },

    /// Remove an item
    Remove {
        /// Item id
        id: String,
    },

    /// Remove all completed items
    Clear,
}

impl ShoppingCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let app = open_app(config)?;
        let store = app.family_store();

        match &self.command {
            ShoppingSubcommand::Add {
                name,
                quantity,
                category,
                added_by,
            } => {
                let category: ShoppingCategory = category.parse()?;
                let mut item = ShoppingItem::new(name, category);
                if let Some(quantity) = quantity {
                    item = item.with_quantity(*quantity);
                }
                if let Some(member) = added_by {
                    item = item.with_added_by(member);
                }
                let id = store.add_shopping_item(item);
                println!("Added {} ({})", name, id);
            }

            ShoppingSubcommand::List { format, pending } => {
                let mut items = store.shopping_items();
                if *pending {
                    items.retain(|i| !i.completed);
                }
                match format {
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&items)?),
                    OutputFormat::Text => {
                        if items.is_empty() {
                            println!("Shopping list is empty.");
                        }
                        for item in &items {
                            println!("{}  {}", item.id, item);
                        }
                    }
                }
            }

            ShoppingSubcommand::Toggle { id } => match store.toggle_shopping_item(id) {
                Some(true) => println!("Marked {} done", id),
                Some(false) => println!("Marked {} not done", id),
                None => println!("Item not found: {}", id),
            },

            ShoppingSubcommand::Remove { id } => {
                if store.remove_shopping_item(id) {
                    println!("Removed {}", id);
                } else {
                    println!("Item not found: {}", id);
                }
            }

            ShoppingSubcommand::Clear => {
                let removed = store.clear_completed_shopping();
                println!(
                    "Cleared {} completed item{}",
                    removed,
                    if removed == 1 { "" } else { "s" }
                );
            }
        }

        Ok(())
    }
}
