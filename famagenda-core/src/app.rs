//! Application context.
//!
//! [`FamilyApp`] is built once at startup and owns the gateway access, both
//! stores and the hydrator. Front ends go through its trigger methods, each
//! of which syncs only when the active family has a backend id.

use std::path::Path;
use std::sync::Arc;

use crate::gateway::{Collection, Gateway, GatewayError};
use crate::models::{generate_invite_code, FamilyGroup, User};
use crate::store::{AuthError, AuthStore, FamilyStore, PersistError};
use crate::sync::{HydrateStatus, Hydrator, RemoteCollections, SyncError, SyncOptions};

/// Errors returned by application triggers.
#[derive(Debug)]
pub enum AppError {
    Auth(AuthError),
    Persist(PersistError),
    Gateway(GatewayError),
    /// A write succeeded but the backend did not echo the row back.
    NoEcho(Collection),
    /// No backend family uses this invite code.
    UnknownInviteCode(String),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Auth(e) => write!(f, "{}", e),
            AppError::Persist(e) => write!(f, "Storage error: {}", e),
            AppError::Gateway(e) => write!(f, "Backend error: {}", e),
            AppError::NoEcho(collection) => {
                write!(f, "Backend did not return the new {} row", collection)
            }
            AppError::UnknownInviteCode(code) => {
                write!(f, "No family found for invite code '{}'", code)
            }
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Auth(e) => Some(e),
            AppError::Persist(e) => Some(e),
            AppError::Gateway(e) => Some(e),
            AppError::NoEcho(_) | AppError::UnknownInviteCode(_) => None,
        }
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        AppError::Auth(e)
    }
}

impl From<PersistError> for AppError {
    fn from(e: PersistError) -> Self {
        AppError::Persist(e)
    }
}

impl From<GatewayError> for AppError {
    fn from(e: GatewayError) -> Self {
        AppError::Gateway(e)
    }
}

/// What a trigger did about syncing.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncReport {
    /// The active family has no backend id; nothing was attempted.
    NoRemoteFamily,
    Completed(HydrateStatus),
    /// Sync failed. Local data is unchanged.
    Failed(SyncError),
}

impl SyncReport {
    pub fn is_failure(&self) -> bool {
        matches!(self, SyncReport::Failed(_))
    }
}

/// The application context.
#[derive(Debug)]
pub struct FamilyApp {
    remote: RemoteCollections,
    auth: AuthStore,
    hydrator: Hydrator,
}

impl FamilyApp {
    pub fn new(
        gateway: Arc<dyn Gateway>,
        family: FamilyStore,
        auth: AuthStore,
        options: SyncOptions,
    ) -> Self {
        let remote = RemoteCollections::new(gateway);
        let hydrator = Hydrator::new(remote.clone(), Arc::new(family), options);
        Self {
            remote,
            auth,
            hydrator,
        }
    }

    /// Opens both stores from `data_dir`.
    pub fn open(
        gateway: Arc<dyn Gateway>,
        data_dir: impl AsRef<Path>,
        options: SyncOptions,
    ) -> Result<Self, AppError> {
        let data_dir = data_dir.as_ref();
        let family = FamilyStore::open(data_dir)?;
        let auth = AuthStore::open(data_dir)?;
        Ok(Self::new(gateway, family, auth, options))
    }

    pub fn family_store(&self) -> &FamilyStore {
        self.hydrator.store()
    }

    pub fn auth_store(&self) -> &AuthStore {
        &self.auth
    }

    pub fn remote(&self) -> &RemoteCollections {
        &self.remote
    }

    pub fn is_configured(&self) -> bool {
        self.remote.is_configured()
    }

    /// Pull-to-refresh: re-hydrates the active family.
    pub async fn refresh(&self) -> SyncReport {
        match self.auth.family_remote_id() {
            Some(family_id) => self.hydrate(family_id).await,
            None => SyncReport::NoRemoteFamily,
        }
    }

    async fn hydrate(&self, family_id: i64) -> SyncReport {
        match self.hydrator.sync_and_hydrate_store(family_id).await {
            Ok(status) => SyncReport::Completed(status),
            Err(e) => {
                tracing::warn!(family_id, error = %e, "Sync failed, keeping local data");
                SyncReport::Failed(e)
            }
        }
    }

    /// Logs in and, if the user's family is already on the backend, syncs it.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, SyncReport), AppError> {
        let user = self.auth.login(email, password)?;
        let report = self.refresh().await;
        Ok((user, report))
    }

    /// Creates a family. With a backend configured the family is created
    /// remotely first and the local group is bound to it.
    pub async fn create_family(&self, name: &str) -> Result<(FamilyGroup, SyncReport), AppError> {
        if self.auth.user().is_none() || !self.auth.is_authenticated() {
            return Err(AuthError::NotAuthenticated.into());
        }

        let remote = if self.is_configured() {
            let family = self
                .remote
                .create_family(name)
                .await?
                .ok_or(AppError::NoEcho(Collection::Families))?;
            tracing::info!(family_id = family.id, "Created remote family");
            Some(family)
        } else {
            None
        };

        let group = self.auth.create_family_group(name, remote.as_ref())?;
        let report = self.refresh().await;
        Ok((group, report))
    }

    /// Joins a family by invite code. With a backend configured the code must
    /// belong to an existing family.
    pub async fn join_family(&self, code: &str) -> Result<(FamilyGroup, SyncReport), AppError> {
        if self.auth.user().is_none() || !self.auth.is_authenticated() {
            return Err(AuthError::NotAuthenticated.into());
        }

        let remote = if self.is_configured() {
            let family = self
                .remote
                .find_family_by_code(code)
                .await?
                .ok_or_else(|| AppError::UnknownInviteCode(code.to_string()))?;
            Some(family)
        } else {
            None
        };

        let group = self.auth.join_family_group(code, remote.as_ref())?;
        let report = self.refresh().await;
        Ok((group, report))
    }

    /// Issues a new invite code, updating the backend family if there is one.
    pub async fn regenerate_invite_code(&self) -> Result<String, AppError> {
        let group = self.auth.family_group().ok_or(AuthError::NoFamily)?;
        let code = generate_invite_code();

        if let (Some(family_id), true) = (group.remote_id, self.is_configured()) {
            self.remote
                .update_family(family_id, &serde_json::json!({ "invite_code": &code }))
                .await?;
        }
        Ok(self.auth.set_invite_code(code)?)
    }

    pub fn logout(&self) {
        self.auth.logout();
    }

    pub fn leave_family(&self) {
        self.auth.leave_family_group();
    }
}
