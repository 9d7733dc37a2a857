mod auth;
mod config_cmd;
mod event;
mod family;
mod member;
mod shopping;
mod sync_cmd;

pub use auth::AuthCommand;
pub use config_cmd::ConfigCommand;
pub use event::EventCommand;
pub use family::FamilyCommand;
pub use member::MemberCommand;
pub use shopping::ShoppingCommand;
pub use sync_cmd::SyncCommand;

use std::sync::Arc;

use clap::ValueEnum;
use famagenda_core::{AppError, FamilyApp, RestGateway, SyncOptions, SyncReport};

use crate::config::Config;

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Builds the application context from configuration.
pub fn open_app(config: &Config) -> Result<FamilyApp, AppError> {
    let gateway = RestGateway::new(
        config.backend.url.value.clone(),
        config.backend.api_key.value.clone(),
    )
    .with_timeout(config.backend.timeout());
    tracing::debug!(
        data_dir = %config.data_dir.value.display(),
        configured = config.backend.is_configured(),
        "Opening family app"
    );
    let options = SyncOptions {
        max_concurrent_fetches: config.backend.max_concurrent_fetches.value,
    };
    FamilyApp::open(Arc::new(gateway), &config.data_dir.value, options)
}

/// Prints a one-line summary of what a trigger did about syncing.
pub fn print_sync_report(report: &SyncReport) {
    match report {
        SyncReport::NoRemoteFamily => {}
        SyncReport::Completed(status) => println!("Sync: {}", describe_status(status)),
        SyncReport::Failed(e) => {
            println!("Sync failed, showing local data: {}", e);
        }
    }
}

fn describe_status(status: &famagenda_core::HydrateStatus) -> String {
    use famagenda_core::HydrateStatus;

    match status {
        HydrateStatus::NotConfigured => "skipped (no backend configured)".to_string(),
        HydrateStatus::Hydrated(counts) => format!("pulled {}", counts),
        HydrateStatus::Superseded { generation } => {
            format!("pass {} discarded, a newer pass already applied", generation)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use famagenda_core::sync::HydrateCounts;
    use famagenda_core::HydrateStatus;

    #[test]
    fn test_describe_status() {
        assert_eq!(
            describe_status(&HydrateStatus::NotConfigured),
            "skipped (no backend configured)"
        );
        let hydrated = describe_status(&HydrateStatus::Hydrated(HydrateCounts {
            events: 3,
            ..Default::default()
        }));
        assert!(hydrated.starts_with("pulled 3 events"));
    }
}
