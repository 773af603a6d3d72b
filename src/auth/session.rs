//! Server-side sessions keyed by an opaque cookie token.

use std::{collections::HashMap, sync::Arc};

use axum_extra::extract::cookie::{Cookie, SameSite};
use rand::{distributions::Alphanumeric, rngs::OsRng, Rng};
use tokio::sync::RwLock;
use tracing::debug;

use crate::config::SessionConfig;
use crate::error::ApiError;

const TOKEN_LEN: usize = 43;

/// Process-wide `token → user_id` registry.
///
/// Entries are removed only by logout or by a `start` that presents the old
/// token. Nothing expires, so the map grows without bound.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<String, i64>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, user_id: i64) -> String {
        let token: String = OsRng
            .sample_iter(&Alphanumeric)
            .take(TOKEN_LEN)
            .map(char::from)
            .collect();
        self.inner.write().await.insert(token.clone(), user_id);
        debug!(user_id, "session created");
        token
    }

    pub async fn resolve(&self, token: &str) -> Option<i64> {
        self.inner.read().await.get(token).copied()
    }

    /// Returns the user the token was bound to, if any.
    pub async fn revoke(&self, token: &str) -> Option<i64> {
        self.inner.write().await.remove(token)
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}

/// Session state for one request.
///
/// Built by the extractor from the presented cookie. [`Session::start`] and
/// [`Session::end`] return the cookie the handler must put in the response jar.
pub struct Session {
    store: SessionStore,
    config: SessionConfig,
    token: Option<String>,
    user_id: Option<i64>,
}

impl Session {
    pub(crate) fn new(
        store: SessionStore,
        config: SessionConfig,
        token: Option<String>,
        user_id: Option<i64>,
    ) -> Self {
        Self { store, config, token, user_id }
    }

    pub fn current(&self) -> Option<i64> {
        self.user_id
    }

    /// Binds this client to `user_id`, replacing whatever session it held.
    pub async fn start(&mut self, user_id: i64) -> Cookie<'static> {
        if let Some(old) = self.token.take() {
            self.store.revoke(&old).await;
        }
        let token = self.store.insert(user_id).await;
        self.user_id = Some(user_id);
        self.token = Some(token.clone());
        self.cookie(token)
    }

    pub async fn end(&mut self) -> Result<Cookie<'static>, ApiError> {
        let token = self.token.take().ok_or(ApiError::Unauthorized)?;
        let revoked = self.store.revoke(&token).await;
        self.user_id = None;
        match revoked {
            Some(user_id) => {
                debug!(user_id, "session ended");
                Ok(self.expired_cookie())
            }
            None => Err(ApiError::Unauthorized),
        }
    }

    fn cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build((self.config.cookie_name.clone(), token))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.config.cookie_secure)
            .build()
    }

    /// Removal cookie; name and path match the session cookie.
    pub fn expired_cookie(&self) -> Cookie<'static> {
        Cookie::build((self.config.cookie_name.clone(), ""))
            .path("/")
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SessionConfig {
        SessionConfig { cookie_name: "session".into(), cookie_secure: false }
    }

    #[tokio::test]
    async fn insert_resolve_revoke() {
        let store = SessionStore::new();
        let token = store.insert(7).await;
        assert_eq!(token.len(), TOKEN_LEN);
        assert_eq!(store.resolve(&token).await, Some(7));
        assert_eq!(store.revoke(&token).await, Some(7));
        assert_eq!(store.resolve(&token).await, None);
    }

    #[tokio::test]
    async fn tokens_are_distinct() {
        let store = SessionStore::new();
        let a = store.insert(1).await;
        let b = store.insert(1).await;
        assert_ne!(a, b);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn start_replaces_previous_session() {
        let store = SessionStore::new();
        let old = store.insert(1).await;
        let mut session = Session::new(store.clone(), config(), Some(old.clone()), Some(1));

        let cookie = session.start(2).await;
        assert_eq!(session.current(), Some(2));
        assert_eq!(store.resolve(&old).await, None);
        assert_eq!(store.resolve(cookie.value()).await, Some(2));
        assert!(cookie.http_only().unwrap_or(false));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn end_without_session_is_unauthorized() {
        let mut session = Session::new(SessionStore::new(), config(), None, None);
        assert!(matches!(session.end().await, Err(ApiError::Unauthorized)));
    }

    #[tokio::test]
    async fn end_with_stale_token_is_unauthorized() {
        let mut session =
            Session::new(SessionStore::new(), config(), Some("gone".into()), None);
        assert!(matches!(session.end().await, Err(ApiError::Unauthorized)));
    }

    #[tokio::test]
    async fn end_clears_store() {
        let store = SessionStore::new();
        let token = store.insert(3).await;
        let mut session = Session::new(store.clone(), config(), Some(token.clone()), Some(3));
        let cookie = session.end().await.unwrap();
        assert_eq!(cookie.name(), "session");
        assert_eq!(session.current(), None);
        assert_eq!(store.resolve(&token).await, None);
    }
}
