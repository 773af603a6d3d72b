use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, SignupRequest, UserResponse},
        services::{authenticate, register},
        session::Session,
    },
    error::ApiError,
    extract::ApiJson,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/logout", delete(logout))
        .route("/check_session", get(check_session))
}

#[instrument(skip_all)]
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    mut session: Session,
    ApiJson(payload): ApiJson<SignupRequest>,
) -> Result<(StatusCode, CookieJar, Json<UserResponse>), ApiError> {
    let user = match register(state.repo.as_ref(), payload).await {
        Ok(u) => u,
        Err(e) => {
            if let ApiError::Validation(v) = &e {
                warn!(fields = ?v.messages().keys().collect::<Vec<_>>(), "signup rejected");
            }
            return Err(e);
        }
    };

    let cookie = session.start(user.id).await;
    info!(user_id = user.id, username = %user.username, "user registered");
    Ok((StatusCode::CREATED, jar.add(cookie), Json(user.into())))
}

#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    mut session: Session,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<(CookieJar, Json<UserResponse>), ApiError> {
    let user = authenticate(
        state.repo.as_ref(),
        payload.username.as_deref(),
        payload.password.as_deref(),
    )
    .await?;

    let cookie = session.start(user.id).await;
    info!(user_id = user.id, "user logged in");
    Ok((jar.add(cookie), Json(user.into())))
}

#[instrument(skip_all)]
pub async fn logout(
    jar: CookieJar,
    mut session: Session,
) -> Result<(StatusCode, CookieJar), ApiError> {
    let user_id = session.current();
    let expired = session.end().await?;
    info!(user_id = ?user_id, "user logged out");
    Ok((StatusCode::NO_CONTENT, jar.remove(expired)))
}

#[instrument(skip_all)]
pub async fn check_session(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<UserResponse>, ApiError> {
    let user_id = session.current().ok_or(ApiError::Unauthorized)?;
    match state.repo.find_user_by_id(user_id).await? {
        Some(user) => Ok(Json(user.into())),
        None => {
            warn!(user_id, "session refers to a missing user");
            Err(ApiError::Unauthorized)
        }
    }
}
