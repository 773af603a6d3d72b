use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::CookieJar;
use tracing::warn;

use super::session::Session;
use crate::error::ApiError;
use crate::state::AppState;

#[async_trait]
impl FromRequestParts<AppState> for Session {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let cfg = &state.config.session;
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(&cfg.cookie_name)
            .map(|c| c.value().to_owned())
            .filter(|t| !t.is_empty());

        let user_id = match &token {
            Some(t) => state.sessions.resolve(t).await,
            None => None,
        };

        Ok(Session::new(state.sessions.clone(), cfg.clone(), token, user_id))
    }
}

/// Authenticated user id; rejects before the body is read.
pub struct AuthUser(pub i64);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state).await?;
        match session.current() {
            Some(user_id) => Ok(AuthUser(user_id)),
            None => {
                warn!(uri = %parts.uri, "request without active session");
                Err(ApiError::Unauthorized)
            }
        }
    }
}
