//! Local auth and family-context store.
//!
//! Accounts live on the device: registering stores a SHA-256 digest of the
//! password next to the user record. The active family group decides whether
//! syncing is possible; only a group bound to a backend family carries a
//! remote id.

use std::path::Path;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::persist::{Outcome, PersistError, Persister, StateFile, AUTH_STORAGE_KEY};
use crate::models::family::{normalize_invite_code, INVITE_CODE_LEN};
use crate::models::id::generate_local_id;
use crate::models::member::{initials, MEMBER_COLORS};
use crate::models::{generate_invite_code, FamilyGroup, PendingInvite, User};
use crate::sync::remote::RemoteFamily;

/// Display name used for a family joined without a backend.
const LOCAL_FAMILY_NAME: &str = "Family";

/// Errors returned by auth store operations.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthError {
    /// No user is logged in.
    NotAuthenticated,
    /// An account already exists for this email.
    EmailTaken(String),
    /// Email or password did not match.
    InvalidCredentials,
    /// The user does not belong to a family group.
    NoFamily,
    /// Invite codes are exactly six characters.
    InvalidInviteCode(String),
    /// A required field was blank.
    MissingField(&'static str),
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::NotAuthenticated => write!(f, "Not logged in"),
            AuthError::EmailTaken(email) => {
                write!(f, "An account already exists for {}", email)
            }
            AuthError::InvalidCredentials => write!(f, "Invalid email or password"),
            AuthError::NoFamily => write!(f, "Not a member of any family"),
            AuthError::InvalidInviteCode(code) => write!(
                f,
                "Invalid invite code '{}': expected {} characters",
                code, INVITE_CODE_LEN
            ),
            AuthError::MissingField(field) => write!(f, "{} must not be empty", field),
        }
    }
}

impl std::error::Error for AuthError {}

impl Outcome for User {
    fn changed(&self) -> bool {
        true
    }
}

impl Outcome for FamilyGroup {
    fn changed(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Account {
    user: User,
    password_sha256: String,
}

/// Persisted form of the auth store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthState {
    pub user: Option<User>,
    pub is_authenticated: bool,
    pub family_group: Option<FamilyGroup>,
    pub pending_invites: Vec<PendingInvite>,
    accounts: Vec<Account>,
}

/// The auth/family-context store.
#[derive(Debug, Default)]
pub struct AuthStore {
    state: RwLock<AuthState>,
    file: Option<Persister>,
}

fn hash_password(password: &str) -> String {
    format!("{:x}", Sha256::digest(password.as_bytes()))
}

impl AuthStore {
    /// Creates an empty store that is not persisted.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Opens the store persisted under `data_dir`.
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self, PersistError> {
        let file = Persister::new(StateFile::new(data_dir, AUTH_STORAGE_KEY));
        let state = file.load()?.unwrap_or_default();
        Ok(Self {
            state: RwLock::new(state),
            file: Some(file),
        })
    }

    fn read(&self) -> RwLockReadGuard<'_, AuthState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, AuthState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Applies `f` under the write lock and persists only if the outcome
    /// reports a change.
    fn mutate<R: Outcome>(&self, f: impl FnOnce(&mut AuthState) -> R) -> R {
        let mut state = self.write();
        let result = f(&mut state);
        let pending = match &self.file {
            Some(file) if result.changed() => Some((file, file.next_revision(), state.clone())),
            _ => None,
        };
        drop(state);

        if let Some((file, revision, snapshot)) = pending {
            if let Err(e) = file.write(revision, &snapshot) {
                tracing::warn!(error = %e, "Failed to persist auth store");
            }
        }
        result
    }

    pub fn user(&self) -> Option<User> {
        self.read().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_authenticated
    }

    pub fn family_group(&self) -> Option<FamilyGroup> {
        self.read().family_group.clone()
    }

    pub fn pending_invites(&self) -> Vec<PendingInvite> {
        self.read().pending_invites.clone()
    }

    /// Backend id of the active family, if it has one.
    pub fn family_remote_id(&self) -> Option<i64> {
        self.read().family_group.as_ref().and_then(|g| g.remote_id)
    }

    fn current_user(state: &AuthState) -> Result<&User, AuthError> {
        match (&state.user, state.is_authenticated) {
            (Some(user), true) => Ok(user),
            _ => Err(AuthError::NotAuthenticated),
        }
    }

    /// Creates an account and logs it in.
    pub fn register(&self, name: &str, email: &str, password: &str) -> Result<User, AuthError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AuthError::MissingField("name"));
        }
        let email = email.trim().to_lowercase();
        if email.is_empty() {
            return Err(AuthError::MissingField("email"));
        }
        if password.is_empty() {
            return Err(AuthError::MissingField("password"));
        }

        self.mutate(|s| {
            if s.accounts.iter().any(|a| a.user.email == email) {
                return Err(AuthError::EmailTaken(email));
            }

            let color = MEMBER_COLORS[rand::rng().random_range(0..MEMBER_COLORS.len())];
            let user = User {
                id: generate_local_id(),
                name: name.to_string(),
                avatar: initials(name).chars().take(1).collect(),
                email,
                color: color.to_string(),
            };
            s.accounts.push(Account {
                user: user.clone(),
                password_sha256: hash_password(password),
            });
            s.user = Some(user.clone());
            s.is_authenticated = true;
            tracing::info!(user_id = %user.id, "Registered account");
            Ok(user)
        })
    }

    /// Logs in with stored credentials. A failed attempt leaves the store
    /// untouched.
    pub fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = email.trim().to_lowercase();
        let digest = hash_password(password);
        let user = self
            .read()
            .accounts
            .iter()
            .find(|a| a.user.email == email && a.password_sha256 == digest)
            .map(|a| a.user.clone())
            .ok_or(AuthError::InvalidCredentials)?;

        self.mutate(|s| {
            s.user = Some(user.clone());
            s.is_authenticated = true;
        });
        Ok(user)
    }

    /// Logs out. The family group and accounts are kept on the device.
    pub fn logout(&self) {
        self.mutate(|s| {
            s.user = None;
            s.is_authenticated = false;
        });
    }

    /// Makes the current user the creator of a new family group.
    ///
    /// When `remote` is given the group is bound to that backend family and
    /// takes its invite code; otherwise a local code is generated.
    pub fn create_family_group(
        &self,
        name: &str,
        remote: Option<&RemoteFamily>,
    ) -> Result<FamilyGroup, AuthError> {
        if name.trim().is_empty() {
            return Err(AuthError::MissingField("name"));
        }
        self.mutate(|s| {
            let user_id = Self::current_user(s)?.id.clone();
            let group = FamilyGroup {
                id: generate_local_id(),
                remote_id: remote.map(|r| r.id),
                name: name.trim().to_string(),
                invite_code: remote
                    .map(|r| r.invite_code.clone())
                    .unwrap_or_else(generate_invite_code),
                created_by: user_id.clone(),
                members: vec![user_id],
            };
            s.family_group = Some(group.clone());
            Ok(group)
        })
    }

    /// Joins a family by invite code.
    ///
    /// With a backend family the group is bound to it. Without one, any
    /// well-formed code is accepted and a local group is created.
    pub fn join_family_group(
        &self,
        code: &str,
        remote: Option<&RemoteFamily>,
    ) -> Result<FamilyGroup, AuthError> {
        let code = normalize_invite_code(code);
        if code.chars().count() != INVITE_CODE_LEN {
            return Err(AuthError::InvalidInviteCode(code));
        }
        self.mutate(|s| {
            let user_id = Self::current_user(s)?.id.clone();
            let group = match remote {
                Some(family) => FamilyGroup {
                    id: generate_local_id(),
                    remote_id: Some(family.id),
                    name: family.name.clone(),
                    invite_code: family.invite_code.clone(),
                    created_by: String::new(),
                    members: vec![user_id],
                },
                None => FamilyGroup {
                    id: generate_local_id(),
                    remote_id: None,
                    name: LOCAL_FAMILY_NAME.to_string(),
                    invite_code: code,
                    created_by: String::new(),
                    members: vec![user_id],
                },
            };
            s.family_group = Some(group.clone());
            Ok(group)
        })
    }

    /// Replaces the family's invite code and returns the new one.
    pub fn regenerate_invite_code(&self) -> Result<String, AuthError> {
        self.set_invite_code(generate_invite_code())
    }

    pub(crate) fn set_invite_code(&self, code: String) -> Result<String, AuthError> {
        self.mutate(|s| {
            let group = s.family_group.as_mut().ok_or(AuthError::NoFamily)?;
            group.invite_code = code.clone();
            Ok(code)
        })
    }

    /// Queues an invite for the current user to accept or decline.
    pub fn add_pending_invite(&self, invite: PendingInvite) {
        self.mutate(|s| {
            s.pending_invites.retain(|i| i.id != invite.id);
            s.pending_invites.push(invite);
        });
    }

    /// Accepts an invite and returns it, removing it from the pending list.
    pub fn accept_invite(&self, invite_id: &str) -> Option<PendingInvite> {
        self.mutate(|s| {
            let index = s.pending_invites.iter().position(|i| i.id == invite_id)?;
            Some(s.pending_invites.remove(index))
        })
    }

    pub fn decline_invite(&self, invite_id: &str) -> bool {
        self.mutate(|s| {
            let before = s.pending_invites.len();
            s.pending_invites.retain(|i| i.id != invite_id);
            s.pending_invites.len() != before
        })
    }

    /// Removes a user from the family's member list.
    pub fn remove_family_member(&self, user_id: &str) -> Result<bool, AuthError> {
        self.mutate(|s| {
            let group = s.family_group.as_mut().ok_or(AuthError::NoFamily)?;
            let before = group.members.len();
            group.members.retain(|id| id != user_id);
            Ok(group.members.len() != before)
        })
    }

    pub fn leave_family_group(&self) {
        self.mutate(|s| s.family_group = None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::remote::FamilyFields;
    use tempfile::TempDir;

    fn logged_in() -> AuthStore {
        let store = AuthStore::in_memory();
        store.register("Ana Souza", "Ana@Example.com", "secret").unwrap();
        store
    }

    #[test]
    fn test_register_and_login() {
        let store = logged_in();
        let user = store.user().unwrap();
        assert_eq!(user.email, "ana@example.com");
        assert_eq!(user.avatar, "A");
        assert!(MEMBER_COLORS.contains(&user.color.as_str()));

        store.logout();
        assert!(!store.is_authenticated());
        assert_eq!(
            store.login("ana@example.com", "wrong"),
            Err(AuthError::InvalidCredentials)
        );
        assert_eq!(store.login(" ANA@example.com", "secret").unwrap().id, user.id);
        assert!(store.is_authenticated());
    }

    #[test]
    fn test_register_rejects_duplicate_email() {
        let store = logged_in();
        assert_eq!(
            store.register("Other", "ana@example.com", "x"),
            Err(AuthError::EmailTaken("ana@example.com".to_string()))
        );
    }

    #[test]
    fn test_password_is_not_stored_in_clear() {
        let temp = TempDir::new().unwrap();
        let store = AuthStore::open(temp.path()).unwrap();
        store.register("Ana", "ana@example.com", "secret").unwrap();

        let raw = std::fs::read_to_string(temp.path().join("auth-storage.json")).unwrap();
        assert!(!raw.contains("\"secret\""));
        assert!(raw.contains(&hash_password("secret")));
    }

    #[test]
    fn test_failed_login_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("auth-storage.json");
        let store = AuthStore::open(temp.path()).unwrap();

        assert_eq!(
            store.login("nobody@example.com", "secret"),
            Err(AuthError::InvalidCredentials)
        );
        assert!(!path.exists());

        store.register("Ana", "ana@example.com", "secret").unwrap();
        store.logout();
        let saved = std::fs::read_to_string(&path).unwrap();

        assert!(store.login("ana@example.com", "wrong").is_err());
        assert!(!store.decline_invite("missing"));
        assert_eq!(store.remove_family_member("u1"), Err(AuthError::NoFamily));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), saved);
        assert!(!store.is_authenticated());

        store.login("ana@example.com", "secret").unwrap();
        assert_ne!(std::fs::read_to_string(&path).unwrap(), saved);
    }

    #[test]
    fn test_family_requires_login() {
        let store = AuthStore::in_memory();
        assert_eq!(
            store.create_family_group("Souza", None),
            Err(AuthError::NotAuthenticated)
        );
    }

    #[test]
    fn test_local_family_has_no_remote_id() {
        let store = logged_in();
        let group = store.create_family_group("Souza", None).unwrap();
        assert_eq!(group.invite_code.len(), INVITE_CODE_LEN);
        assert_eq!(store.family_remote_id(), None);

        let old = group.invite_code;
        let new = store.regenerate_invite_code().unwrap();
        assert_eq!(store.family_group().unwrap().invite_code, new);
        assert_eq!(new.len(), old.len());
    }

    #[test]
    fn test_join_bound_to_remote_family() {
        let store = logged_in();
        let remote = RemoteFamily::new(
            12,
            FamilyFields {
                name: "Silva".to_string(),
                invite_code: "ABC234".to_string(),
            },
        );

        let group = store.join_family_group("abc234", Some(&remote)).unwrap();
        assert_eq!(group.name, "Silva");
        assert_eq!(store.family_remote_id(), Some(12));
    }

    #[test]
    fn test_local_join_checks_code_length() {
        let store = logged_in();
        assert!(matches!(
            store.join_family_group("abc", None),
            Err(AuthError::InvalidInviteCode(_))
        ));

        let group = store.join_family_group("xyz789", None).unwrap();
        assert_eq!(group.invite_code, "XYZ789");
        assert!(group.remote_id.is_none());
    }

    #[test]
    fn test_invites_and_membership() {
        let store = logged_in();
        let user_id = store.user().unwrap().id;
        store.create_family_group("Souza", None).unwrap();

        let invite = PendingInvite {
            id: "inv1".to_string(),
            family_group_id: "g".to_string(),
            family_group_name: "Other".to_string(),
            invited_by: "u2".to_string(),
            invited_by_name: "Bia".to_string(),
            created_at: String::new(),
        };
        store.add_pending_invite(invite.clone());
        store.add_pending_invite(PendingInvite {
            id: "inv2".to_string(),
            ..invite
        });

        assert_eq!(store.accept_invite("inv1").unwrap().id, "inv1");
        assert!(store.accept_invite("inv1").is_none());
        assert!(store.decline_invite("inv2"));
        assert!(store.pending_invites().is_empty());

        assert_eq!(store.remove_family_member(&user_id), Ok(true));
        assert_eq!(store.remove_family_member(&user_id), Ok(false));

        store.leave_family_group();
        assert!(store.family_group().is_none());
        assert_eq!(store.regenerate_invite_code(), Err(AuthError::NoFamily));
    }
}
