use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use tracing::{info, instrument};

use super::dto::{CreateRecipeRequest, RecipeResponse};
use super::services::create_recipe;
use crate::{auth::AuthUser, error::ApiError, extract::ApiJson, state::AppState};

pub fn recipe_routes() -> Router<AppState> {
    Router::new().route("/recipes", get(list_recipes).post(create))
}

#[instrument(skip(state))]
pub async fn list_recipes(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<RecipeResponse>>, ApiError> {
    let rows = state.repo.list_recipes().await?;
    Ok(Json(rows.into_iter().map(RecipeResponse::from).collect()))
}

/// `AuthUser` precedes the body extractor, so a missing session is reported
/// even when the body is also invalid.
#[instrument(skip(state, payload))]
pub async fn create(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(payload): ApiJson<CreateRecipeRequest>,
) -> Result<(StatusCode, Json<RecipeResponse>), ApiError> {
    let recipe = create_recipe(state.repo.as_ref(), payload, user_id).await?;
    info!(user_id, recipe_id = recipe.recipe.id, "recipe created");
    Ok((StatusCode::CREATED, Json(recipe.into())))
}
