use crate::gateway::{Collection, GatewayError};

/// Errors surfaced by the aggregate fetch and the hydrator.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncError {
    /// One of the top-level per-family fetches failed.
    FamilyFetch(GatewayError),
    /// Fetching the children of a list or pet failed.
    ChildFetch {
        parent: Collection,
        parent_id: i64,
        source: GatewayError,
    },
}

impl SyncError {
    /// The gateway failure underneath.
    pub fn gateway_error(&self) -> &GatewayError {
        match self {
            SyncError::FamilyFetch(e) => e,
            SyncError::ChildFetch { source, .. } => source,
        }
    }
}

impl std::fmt::Display for SyncError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncError::FamilyFetch(e) => write!(f, "Failed to sync family data: {}", e),
            SyncError::ChildFetch {
                parent,
                parent_id,
                source,
            } => write!(
                f,
                "Failed to sync records of {} {}: {}",
                parent, parent_id, source
            ),
        }
    }
}

impl std::error::Error for SyncError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.gateway_error())
    }
}

impl From<GatewayError> for SyncError {
    fn from(e: GatewayError) -> Self {
        SyncError::FamilyFetch(e)
    }
}
