use chrono::{NaiveDate, NaiveTime};
use clap::{Args, Subcommand};
use famagenda_core::{CalendarEvent, EventType};

use crate::commands::{open_app, OutputFormat};
use crate::config::Config;

#[derive(Args)]
pub struct EventCommand {
    #[command(subcommand)]
    pub command: EventSubcommand,
}

#[derive(Subcommand)]
pub enum EventSubcommand {
    /// Add a calendar event
    Add {
        /// Title of the event
        title: String,

        /// Date (YYYY-MM-DD)
        #[arg(long, short)]
        date: String,

        /// Time of day (HH:MM)
        #[arg(long)]
        time: Option<String>,

        /// Event type (event, appointment, activity)
        #[arg(long = "type", short = 't', value_name = "TYPE", default_value = "event")]
        event_type: String,

        /// Description
        #[arg(long)]
        description: Option<String>,

        /// Add a participating member by id (can be repeated)
        #[arg(long = "member", value_name = "MEMBER_ID")]
        members: Vec<String>,
    },

    /// List events in date order
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Only show events on or after this date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
    },

    /// Remove an event
    Remove {
        /// Event id
        id: String,
    },
}

fn parse_date(date: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date format '{}'. Use YYYY-MM-DD.", date))
}

fn parse_time(time: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(time, "%H:%M")
        .map_err(|_| format!("Invalid time format '{}'. Use HH:MM.", time))
}

impl EventCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let app = open_app(config)?;
        let store = app.family_store();

        match &self.command {
            EventSubcommand::Add {
                title,
                date,
                time,
                event_type,
                description,
                members,
            } => {
                let date = parse_date(date)?;
                let event_type: EventType = event_type.parse()?;

                let mut event = CalendarEvent::new(title, date.format("%Y-%m-%d").to_string())
                    .with_type(event_type)
                    .with_members(members.clone());
                if let Some(time) = time {
                    event = event.with_time(parse_time(time)?.format("%H:%M").to_string());
                }
                if let Some(description) = description {
                    event = event.with_description(description);
                }

                let id = store.add_event(event);
                println!("Added event {}", id);
                Ok(())
            }

            EventSubcommand::List { format, from } => {
                let from = from.as_deref().map(parse_date).transpose()?;
                let mut events = store.events();
                if let Some(from) = from {
                    let from = from.format("%Y-%m-%d").to_string();
                    events.retain(|e| e.date >= from);
                }
                events.sort_by(|a, b| (&a.date, &a.time).cmp(&(&b.date, &b.time)));

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&events)?);
                    }
                    OutputFormat::Text => {
                        if events.is_empty() {
                            println!("No events.");
                        }
                        for event in &events {
                            println!("{}  {}", event.id, event);
                        }
                    }
                }
                Ok(())
            }

            EventSubcommand::Remove { id } => {
                if store.remove_event(id) {
                    println!("Removed event {}", id);
                } else {
                    println!("Event not found: {}", id);
                }
                Ok(())
            }
        }
    }
}
