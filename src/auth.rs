use tracing::{info, warn};

use crate::config::{LOGIN_FAILED, REGISTER_FAILED, TOKEN_KEY, USER_ID_KEY, USER_NAME_KEY};
use crate::core::api::ApiClient;
use crate::core::errors::ApiError;
use crate::core::storage::KeyValueStore;
use crate::models::models::{AuthOutcome, AuthResponse, Session};

/// Anything that can hand out the current bearer token.
pub trait TokenSource {
    fn token(&self) -> Option<String>;
}

impl<T: TokenSource + ?Sized> TokenSource for &T {
    fn token(&self) -> Option<String> {
        (**self).token()
    }
}

/// Fixed token, used when the caller already holds the credential.
impl TokenSource for Option<String> {
    fn token(&self) -> Option<String> {
        self.clone().filter(|t| !t.is_empty())
    }
}

/// Owns "who is logged in". Built by the application root and lent to
/// whatever needs the credential.
pub struct SessionStore<S: KeyValueStore> {
    store: S,
    api: ApiClient,
    session: Option<Session>,
}

impl<S: KeyValueStore> SessionStore<S> {
    /// The store starts unauthenticated until [`SessionStore::initialize`] runs.
    pub fn new(store: S, api: ApiClient) -> Self {
        Self {
            store,
            api,
            session: None,
        }
    }

    /// Rehydrate the session from persisted keys. Partial state counts as no session.
    pub fn initialize(&mut self) -> Option<&Session> {
        let read = |key: &str| match self.store.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "failed to read persisted session key");
                None
            }
        };

        self.session =
            Session::from_parts(read(TOKEN_KEY), read(USER_NAME_KEY), read(USER_ID_KEY));
        match &self.session {
            Some(session) => info!(user_id = %session.id, "session restored"),
            None => info!("no persisted session"),
        }
        self.session.as_ref()
    }

    pub async fn register(&mut self, name: &str, email: &str, password: &str) -> AuthOutcome {
        let result = self.api.register(name, email, password).await;
        self.complete_auth(result, REGISTER_FAILED)
    }

    pub async fn login(&mut self, email: &str, password: &str) -> AuthOutcome {
        let result = self.api.login(email, password).await;
        self.complete_auth(result, LOGIN_FAILED)
    }

    fn complete_auth(
        &mut self,
        result: Result<AuthResponse, ApiError>,
        fallback: &str,
    ) -> AuthOutcome {
        let auth = match result {
            Ok(auth) => auth,
            Err(e) => {
                warn!(error = %e, "authentication request failed");
                return AuthOutcome::Failure(e.server_message().unwrap_or(fallback).to_string());
            }
        };

        if let Err(e) = self.persist(&auth) {
            warn!(error = %e, "failed to persist session");
            // A half-written session would still hand out the new token
            self.clear_persisted();
            return AuthOutcome::Failure(fallback.to_string());
        }

        info!(user_id = %auth.id, "authenticated");
        self.session = Some(Session {
            name: auth.name,
            token: auth.token,
            id: auth.id,
        });
        AuthOutcome::Success
    }

    fn persist(&self, auth: &AuthResponse) -> anyhow::Result<()> {
        self.store.set(TOKEN_KEY, &auth.token)?;
        self.store.set(USER_NAME_KEY, &auth.name)?;
        self.store.set(USER_ID_KEY, &auth.id)?;
        Ok(())
    }

    fn clear_persisted(&self) {
        for key in [TOKEN_KEY, USER_NAME_KEY, USER_ID_KEY] {
            if let Err(e) = self.store.delete(key) {
                warn!(key, error = %e, "failed to clear persisted session key");
            }
        }
    }

    /// Forget the session locally. No server round-trip.
    pub fn logout(&mut self) {
        self.clear_persisted();
        self.session = None;
        info!("logged out");
    }

    /// Persisted token, read fresh so it is valid before `initialize` runs.
    pub fn get_token(&self) -> Option<String> {
        match self.store.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!(error = %e, "failed to read persisted token");
                None
            }
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn storage(&self) -> &S {
        &self.store
    }
}

impl<S: KeyValueStore> TokenSource for SessionStore<S> {
    fn token(&self) -> Option<String> {
        self.get_token()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::storage::MemoryStore;

    // Never contacted: these tests only exercise local state.
    fn offline_api() -> ApiClient {
        ApiClient::new("http://127.0.0.1:9").unwrap()
    }

    #[test]
    fn rehydrates_only_complete_sessions() {
        let cases: [(&[(&str, &str)], bool); 6] = [
            (&[(TOKEN_KEY, "t"), (USER_NAME_KEY, "Asha"), (USER_ID_KEY, "u1")], true),
            (&[(USER_NAME_KEY, "Asha"), (USER_ID_KEY, "u1")], false),
            (&[(TOKEN_KEY, "t"), (USER_ID_KEY, "u1")], false),
            (&[(TOKEN_KEY, "t"), (USER_NAME_KEY, "Asha")], false),
            (&[(TOKEN_KEY, ""), (USER_NAME_KEY, "Asha"), (USER_ID_KEY, "u1")], false),
            (&[], false),
        ];

        for (entries, expected) in cases {
            let store = MemoryStore::with_entries(entries.iter().copied());
            let mut sessions = SessionStore::new(store, offline_api());
            sessions.initialize();
            assert_eq!(sessions.is_authenticated(), expected, "entries: {:?}", entries);
        }
    }

    #[test]
    fn restored_session_carries_persisted_values() {
        let store = MemoryStore::with_entries([
            (TOKEN_KEY, "t"),
            (USER_NAME_KEY, "Asha"),
            (USER_ID_KEY, "u1"),
        ]);
        let mut sessions = SessionStore::new(store, offline_api());
        let session = sessions.initialize().cloned().unwrap();
        assert_eq!(session.name, "Asha");
        assert_eq!(session.token, "t");
        assert_eq!(session.id, "u1");
    }

    #[test]
    fn logout_clears_everything() {
        let store = MemoryStore::with_entries([
            (TOKEN_KEY, "t"),
            (USER_NAME_KEY, "Asha"),
            (USER_ID_KEY, "u1"),
        ]);
        let mut sessions = SessionStore::new(store, offline_api());
        sessions.initialize();
        sessions.logout();
        assert!(!sessions.is_authenticated());
        assert!(sessions.storage().is_empty());
        assert_eq!(sessions.get_token(), None);

        // Idempotent from an empty state too
        sessions.logout();
        assert!(sessions.storage().is_empty());
    }

    /// Memory store whose writes to one key always fail.
    struct BrokenKeyStore {
        inner: MemoryStore,
        broken: &'static str,
    }

    impl KeyValueStore for BrokenKeyStore {
        fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
            if key == self.broken {
                anyhow::bail!("disk full");
            }
            self.inner.set(key, value)
        }

        fn delete(&self, key: &str) -> anyhow::Result<()> {
            self.inner.delete(key)
        }
    }

    #[test]
    fn failed_persist_leaves_no_token_behind() {
        let store = BrokenKeyStore {
            inner: MemoryStore::new(),
            broken: USER_NAME_KEY,
        };
        let mut sessions = SessionStore::new(store, offline_api());
        let auth = AuthResponse {
            token: "t2".to_string(),
            name: "Asha".to_string(),
            id: "u1".to_string(),
        };

        let outcome = sessions.complete_auth(Ok(auth), LOGIN_FAILED);
        assert_eq!(outcome, AuthOutcome::Failure(LOGIN_FAILED.to_string()));
        assert!(!sessions.is_authenticated());
        assert_eq!(sessions.get_token(), None);
        assert!(sessions.storage().inner.is_empty());
    }

    #[test]
    fn get_token_ignores_in_memory_state() {
        let store = MemoryStore::with_entries([(TOKEN_KEY, "t")]);
        let sessions = SessionStore::new(store, offline_api());
        assert!(!sessions.is_authenticated());
        assert_eq!(sessions.get_token().as_deref(), Some("t"));
        assert_eq!(TokenSource::token(&sessions).as_deref(), Some("t"));
    }

    #[test]
    fn fixed_token_source_skips_empty() {
        assert_eq!(Some("t".to_string()).token().as_deref(), Some("t"));
        assert_eq!(Some(String::new()).token(), None);
        assert_eq!(None::<String>.token(), None);
    }
}
