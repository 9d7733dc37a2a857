//! Gateway error types.

use std::time::Duration;

use thiserror::Error;

use super::Collection;

/// Errors reported by a gateway call.
///
/// A gateway never panics or propagates transport failures any other way;
/// every problem surfaces as one of these variants.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    #[error("Remote backend not configured")]
    NotConfigured,

    #[error("Request to {collection} failed: {message}")]
    Transport {
        collection: Collection,
        message: String,
    },

    #[error("Request to {collection} returned status {status}: {body}")]
    Status {
        collection: Collection,
        status: u16,
        body: String,
    },

    #[error("Could not encode request for {collection}: {message}")]
    Encode {
        collection: Collection,
        message: String,
    },

    #[error("Could not decode response from {collection}: {message}")]
    Decode {
        collection: Collection,
        message: String,
    },

    #[error("Request to {collection} timed out after {timeout:?}")]
    Timeout {
        collection: Collection,
        timeout: Duration,
    },
}

impl GatewayError {
    /// The collection the failing request addressed, if any.
    pub fn collection(&self) -> Option<Collection> {
        match self {
            GatewayError::NotConfigured => None,
            GatewayError::Transport { collection, .. }
            | GatewayError::Status { collection, .. }
            | GatewayError::Encode { collection, .. }
            | GatewayError::Decode { collection, .. }
            | GatewayError::Timeout { collection, .. } => Some(*collection),
        }
    }
}
