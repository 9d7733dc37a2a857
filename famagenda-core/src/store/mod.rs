//! Local stores: the client store and the auth/family-context store, each
//! persisted under its own key.

pub mod auth;
pub mod family;
pub mod persist;

pub use auth::{AuthError, AuthState, AuthStore};
pub use family::{FamilyState, FamilyStore, HydrationPayload};
pub use persist::{PersistError, StateFile, AUTH_STORAGE_KEY, FAMILY_STORAGE_KEY};
