use crate::state::AppState;
use axum::Router;

pub mod dto;
pub(crate) mod extractors;
pub mod handlers;
pub mod password;
pub mod repo_types;
pub mod services;
pub mod session;

pub use extractors::AuthUser;

pub fn router() -> Router<AppState> {
    handlers::auth_routes()
}
