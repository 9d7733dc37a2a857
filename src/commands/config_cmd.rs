use clap::{Args, Subcommand};
use std::fs;
use std::io::Write;

use crate::commands::OutputFormat;
use crate::config::Config;

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration values
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Initialize configuration file
    Init,
}

const DEFAULT_CONFIG: &str = r#"# famagenda configuration

# Directory for local data (default: platform data dir + famagenda)
# data_dir: ~/.local/share/famagenda

# Remote backend. Leave url or api_key unset to stay local only.
backend:
  # url: https://your-project.supabase.co
  # api_key: your-api-key
  timeout_secs: 15
  max_concurrent_fetches: 4
"#;

impl ConfigCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ConfigSubcommand::Show { format } => {
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(config)?);
                    }
                    OutputFormat::Text => {
                        println!("Configuration");
                        println!("=============\n");

                        if let Some(path) = &config.config_file {
                            println!("Config file: {}", path.display());
                        } else {
                            println!(
                                "Config file: {} (not found)",
                                Config::default_config_path().display()
                            );
                        }
                        println!();

                        println!("data_dir: {}", config.data_dir.value.display());
                        println!("  source: {}", config.data_dir.source);
                        println!();

                        let backend = &config.backend;
                        println!(
                            "backend.url: {}",
                            backend.url.value.as_deref().unwrap_or("(not set)")
                        );
                        println!("  source: {}", backend.url.source);
                        println!(
                            "backend.api_key: {}",
                            if backend.api_key.value.is_some() {
                                "(set)"
                            } else {
                                "(not set)"
                            }
                        );
                        println!("  source: {}", backend.api_key.source);
                        println!("backend.timeout_secs: {}", backend.timeout_secs.value);
                        println!("  source: {}", backend.timeout_secs.source);
                        println!(
                            "backend.max_concurrent_fetches: {}",
                            backend.max_concurrent_fetches.value
                        );
                        println!("  source: {}", backend.max_concurrent_fetches.source);
                    }
                }
                Ok(())
            }

            ConfigSubcommand::Init => {
                let config_path = Config::default_config_path();

                if config_path.exists() {
                    println!("Config file already exists: {}", config_path.display());
                    println!("Use 'fam config show' to view current configuration.");
                    return Ok(());
                }

                if let Some(parent) = config_path.parent() {
                    fs::create_dir_all(parent)?;
                }

                let mut file = fs::File::create(&config_path)?;
                file.write_all(DEFAULT_CONFIG.as_bytes())?;

                println!("Created config file: {}", config_path.display());
                println!("\nEdit this file to customize your settings.");
                Ok(())
            }
        }
    }
}
