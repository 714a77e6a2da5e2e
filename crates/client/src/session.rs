//! The single owned session value shared with UI collaborators.
//!
//! All credential mutations go through [`SessionContext`] so that subscribers
//! see every login, token rotation, profile update and logout. Mutations are
//! serialized, so the published value always matches the store.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use lendwise_shared::{Session, TokenPair, UserProfile};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::store::{CredentialStore, StoreResult};

/// Read + subscribe access to the current session.
pub struct SessionContext {
    store: Arc<dyn CredentialStore>,
    sender: watch::Sender<Option<Session>>,
    mutation: Mutex<()>,
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("authenticated", &self.is_authenticated())
            .field("store", &"[hidden]")
            .finish()
    }
}

impl SessionContext {
    /// Creates a context seeded from whatever `store` already holds.
    #[must_use]
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        let initial = store.load().unwrap_or_else(|error| {
            warn!(error = %error, "Failed to load stored session");
            None
        });
        let (sender, _) = watch::channel(initial);
        Self {
            store,
            sender,
            mutation: Mutex::new(()),
        }
    }

    /// Returns a snapshot of the current session.
    #[must_use]
    pub fn current(&self) -> Option<Session> {
        self.sender.borrow().clone()
    }

    /// Returns true if the credential store holds an access token.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.store.is_authenticated()
    }

    /// Subscribes to session changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.sender.subscribe()
    }

    /// Returns the stored access token, even if the stored profile is unreadable.
    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        self.store.access_token().unwrap_or_else(|error| {
            warn!(error = %error, "Failed to read stored access token");
            None
        })
    }

    /// Returns the stored refresh token.
    #[must_use]
    pub fn refresh_token(&self) -> Option<String> {
        self.store.refresh_token().unwrap_or_else(|error| {
            warn!(error = %error, "Failed to read stored refresh token");
            None
        })
    }

    /// Persists a freshly created session and publishes it.
    pub fn establish(&self, session: Session) -> StoreResult<()> {
        let _guard = self.lock();
        self.store.save(&session)?;
        self.sender.send_replace(Some(session));
        Ok(())
    }

    /// Persists a rotated token pair and publishes the updated session.
    ///
    /// Returns `None` when the tokens were stored but the stored profile is
    /// unreadable; subscribers then keep their previous value.
    pub fn rotate_tokens(&self, tokens: &TokenPair) -> StoreResult<Option<Session>> {
        let _guard = self.lock();
        let session = self.store.update_tokens(tokens)?;
        if let Some(session) = &session {
            self.sender.send_replace(Some(session.clone()));
        }
        Ok(session)
    }

    /// Persists a refreshed user profile and publishes the updated session.
    pub fn update_user(&self, user: &UserProfile) -> StoreResult<Session> {
        let _guard = self.lock();
        let session = self.store.update_user(user)?;
        self.sender.send_replace(Some(session.clone()));
        Ok(session)
    }

    /// Destroys the session locally. Never fails: a storage error is logged and
    /// subscribers still observe the logout.
    pub fn clear(&self) {
        let _guard = self.lock();
        if let Err(error) = self.store.clear() {
            warn!(error = %error, "Failed to clear stored credentials");
        }
        if self.sender.send_replace(None).is_some() {
            info!("Session cleared");
        }
    }

    /// The guarded value is `()`, so a poisoned lock carries no broken state.
    fn lock(&self) -> MutexGuard<'_, ()> {
        self.mutation.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryCredentialStore;
    use lendwise_shared::{UserStatus, UserType};

    fn session(access: &str) -> Session {
        Session::new(
            TokenPair::new(access, "refresh"),
            UserProfile {
                user_id: "u-1".to_string(),
                email: "amaka@example.ng".to_string(),
                full_name: "Amaka Eze".to_string(),
                user_type: UserType::Customer,
                status: UserStatus::Active,
            },
        )
    }

    #[test]
    fn test_seeded_from_store() {
        let store = Arc::new(MemoryCredentialStore::with_session(&session("a")).unwrap());
        let context = SessionContext::new(store);

        assert!(context.is_authenticated());
        assert_eq!(context.current(), Some(session("a")));
        assert_eq!(context.access_token().as_deref(), Some("a"));
        assert_eq!(context.refresh_token().as_deref(), Some("refresh"));
    }

    #[test]
    fn test_subscribers_observe_lifecycle() {
        let context = SessionContext::new(Arc::new(MemoryCredentialStore::new()));
        let mut receiver = context.subscribe();
        assert!(receiver.borrow_and_update().is_none());

        context.establish(session("a")).unwrap();
        assert!(receiver.has_changed().unwrap());
        assert_eq!(receiver.borrow_and_update().as_ref(), Some(&session("a")));

        let rotated = context
            .rotate_tokens(&TokenPair::new("b", "refresh-2"))
            .unwrap()
            .unwrap();
        assert_eq!(rotated.access_token, "b");
        assert_eq!(
            receiver.borrow_and_update().as_ref().map(|s| s.access_token.clone()),
            Some("b".to_string())
        );

        context.clear();
        assert!(receiver.borrow_and_update().is_none());
        assert!(!context.is_authenticated());
    }

    #[test]
    fn test_rotate_without_session_fails() {
        let context = SessionContext::new(Arc::new(MemoryCredentialStore::new()));
        assert!(context.rotate_tokens(&TokenPair::new("a", "r")).is_err());
        assert!(context.current().is_none());
    }

    #[test]
    fn test_published_session_tracks_store_under_concurrent_updates() {
        let context = Arc::new(SessionContext::new(Arc::new(
            MemoryCredentialStore::with_session(&session("a-0")).unwrap(),
        )));
        let profile = session("a-0").user;

        let writer = {
            let context = Arc::clone(&context);
            std::thread::spawn(move || {
                for _ in 0..2_000 {
                    context.update_user(&profile).unwrap();
                }
            })
        };
        for n in 1..=2_000 {
            context
                .rotate_tokens(&TokenPair::new(format!("a-{n}"), "refresh"))
                .unwrap();
        }
        writer.join().unwrap();

        assert_eq!(context.access_token().as_deref(), Some("a-2000"));
        assert_eq!(
            context.current().map(|s| s.access_token).as_deref(),
            Some("a-2000")
        );
    }
}
