//! Durable client-side credential storage.
//!
//! The session is kept as three string keys, `accessToken`, `refreshToken` and
//! `user` (the profile serialized as JSON). Every mutation is persisted before
//! the call returns.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};

use lendwise_shared::{Session, TokenPair, UserProfile};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Result type alias using `StoreError`.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while persisting credentials.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("credential storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The session could not be serialized.
    #[error("failed to encode credentials: {0}")]
    Encode(#[from] serde_json::Error),

    /// A partial update was attempted with no stored session.
    #[error("no session is stored")]
    NoSession,

    /// A lock guarding the store was poisoned.
    #[error("credential store lock poisoned")]
    Poisoned,
}

/// Key/value holder for the current session.
///
/// `is_authenticated` is presence-based: it only checks that an access token
/// exists and never decodes or validates it. Partial updates are atomic with
/// respect to every other mutation of the same store.
pub trait CredentialStore: Send + Sync {
    /// Persists the whole session, replacing anything stored.
    fn save(&self, session: &Session) -> StoreResult<()>;

    /// Loads the stored session, `None` when absent or incomplete.
    fn load(&self) -> StoreResult<Option<Session>>;

    /// Removes every stored key.
    fn clear(&self) -> StoreResult<()>;

    /// Returns the raw `accessToken` key, even if the rest of the session is
    /// unreadable.
    fn access_token(&self) -> StoreResult<Option<String>>;

    /// Returns the raw `refreshToken` key.
    fn refresh_token(&self) -> StoreResult<Option<String>>;

    /// Returns true if an access token is stored.
    fn is_authenticated(&self) -> bool {
        matches!(self.access_token(), Ok(Some(_)))
    }

    /// Replaces the token pair, keeping the stored user key untouched.
    ///
    /// Returns the resulting session, `None` if the stored user is unreadable.
    fn update_tokens(&self, tokens: &TokenPair) -> StoreResult<Option<Session>>;

    /// Replaces the stored user profile, keeping the tokens.
    fn update_user(&self, user: &UserProfile) -> StoreResult<Session>;
}

/// The persisted key/value layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CredentialRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user: Option<String>,
}

impl CredentialRecord {
    fn from_session(session: &Session) -> StoreResult<Self> {
        Ok(Self {
            access_token: Some(session.access_token.clone()),
            refresh_token: Some(session.refresh_token.clone()),
            user: Some(serde_json::to_string(&session.user)?),
        })
    }

    fn rotate(&mut self, tokens: &TokenPair) -> StoreResult<()> {
        if self.refresh_token.is_none() {
            return Err(StoreError::NoSession);
        }
        self.access_token = Some(tokens.access_token.clone());
        self.refresh_token = Some(tokens.refresh_token.clone());
        Ok(())
    }

    fn set_user(&mut self, user: &UserProfile) -> StoreResult<()> {
        if self.access_token.is_none() || self.refresh_token.is_none() {
            return Err(StoreError::NoSession);
        }
        self.user = Some(serde_json::to_string(user)?);
        Ok(())
    }

    fn to_session(&self) -> Option<Session> {
        let (Some(access_token), Some(refresh_token), Some(user)) =
            (&self.access_token, &self.refresh_token, &self.user)
        else {
            return None;
        };

        match serde_json::from_str::<UserProfile>(user) {
            Ok(user) => Some(Session {
                access_token: access_token.clone(),
                refresh_token: refresh_token.clone(),
                user,
            }),
            Err(error) => {
                warn!(error = %error, "Stored user profile is unreadable, ignoring session");
                None
            }
        }
    }
}

/// In-process store. Nothing survives the process; intended for tests and
/// short-lived tools.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    record: RwLock<CredentialRecord>,
}

impl MemoryCredentialStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store already holding `session`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Encode` if the profile cannot be serialized.
    pub fn with_session(session: &Session) -> StoreResult<Self> {
        Ok(Self {
            record: RwLock::new(CredentialRecord::from_session(session)?),
        })
    }

    /// Applies `change` to a copy of the record and commits it under one write lock.
    fn modify(
        &self,
        change: impl FnOnce(&mut CredentialRecord) -> StoreResult<()>,
    ) -> StoreResult<CredentialRecord> {
        let mut guard = self.record.write().map_err(|_| StoreError::Poisoned)?;
        let mut record = guard.clone();
        change(&mut record)?;
        *guard = record.clone();
        Ok(record)
    }

    fn read(&self) -> StoreResult<CredentialRecord> {
        Ok(self.record.read().map_err(|_| StoreError::Poisoned)?.clone())
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn save(&self, session: &Session) -> StoreResult<()> {
        let record = CredentialRecord::from_session(session)?;
        *self.record.write().map_err(|_| StoreError::Poisoned)? = record;
        Ok(())
    }

    fn load(&self) -> StoreResult<Option<Session>> {
        Ok(self.read()?.to_session())
    }

    fn clear(&self) -> StoreResult<()> {
        *self.record.write().map_err(|_| StoreError::Poisoned)? = CredentialRecord::default();
        Ok(())
    }

    fn access_token(&self) -> StoreResult<Option<String>> {
        Ok(self.read()?.access_token)
    }

    fn refresh_token(&self) -> StoreResult<Option<String>> {
        Ok(self.read()?.refresh_token)
    }

    fn update_tokens(&self, tokens: &TokenPair) -> StoreResult<Option<Session>> {
        Ok(self.modify(|record| record.rotate(tokens))?.to_session())
    }

    fn update_user(&self, user: &UserProfile) -> StoreResult<Session> {
        self.modify(|record| record.set_user(user))?
            .to_session()
            .ok_or(StoreError::NoSession)
    }
}

/// File-backed store holding one JSON document.
///
/// Writes go to a sibling temp file that is synced and renamed over the
/// target, so a crash never leaves a half-written document behind.
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileCredentialStore {
    /// Creates a store backed by `path`. The file is created on first save.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_record(&self) -> StoreResult<CredentialRecord> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                return Ok(CredentialRecord::default());
            }
            Err(error) => return Err(error.into()),
        };

        match serde_json::from_slice(&bytes) {
            Ok(record) => Ok(record),
            Err(error) => {
                warn!(
                    path = %self.path.display(),
                    error = %error,
                    "Credential file is corrupt, treating as empty"
                );
                Ok(CredentialRecord::default())
            }
        }
    }

    /// Reads, changes and rewrites the document while holding the write lock.
    fn modify(
        &self,
        change: impl FnOnce(&mut CredentialRecord) -> StoreResult<()>,
    ) -> StoreResult<CredentialRecord> {
        let _guard = self.write_lock.lock().map_err(|_| StoreError::Poisoned)?;
        let mut record = self.read_record()?;
        change(&mut record)?;
        self.write_unlocked(&record)?;
        Ok(record)
    }

    fn write_record(&self, record: &CredentialRecord) -> StoreResult<()> {
        let _guard = self.write_lock.lock().map_err(|_| StoreError::Poisoned)?;
        self.write_unlocked(record)
    }

    /// Caller must hold `write_lock`.
    fn write_unlocked(&self, record: &CredentialRecord) -> StoreResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut tmp_name = self.path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(&serde_json::to_vec_pretty(record)?)?;
        file.sync_all()?;
        drop(file);

        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

impl CredentialStore for FileCredentialStore {
    fn save(&self, session: &Session) -> StoreResult<()> {
        self.write_record(&CredentialRecord::from_session(session)?)
    }

    fn load(&self) -> StoreResult<Option<Session>> {
        Ok(self.read_record()?.to_session())
    }

    fn clear(&self) -> StoreResult<()> {
        let _guard = self.write_lock.lock().map_err(|_| StoreError::Poisoned)?;
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }

    fn access_token(&self) -> StoreResult<Option<String>> {
        Ok(self.read_record()?.access_token)
    }

    fn refresh_token(&self) -> StoreResult<Option<String>> {
        Ok(self.read_record()?.refresh_token)
    }

    fn update_tokens(&self, tokens: &TokenPair) -> StoreResult<Option<Session>> {
        Ok(self.modify(|record| record.rotate(tokens))?.to_session())
    }

    fn update_user(&self, user: &UserProfile) -> StoreResult<Session> {
        self.modify(|record| record.set_user(user))?
            .to_session()
            .ok_or(StoreError::NoSession)
    }
}
