use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::repo_types::RecipeWithOwner;

/// Request body for recipe creation.
///
/// `minutes_to_complete` is kept as raw JSON so a wrong type is reported as a
/// field error rather than a body rejection.
#[derive(Debug, Default, Deserialize)]
pub struct CreateRecipeRequest {
    pub title: Option<String>,
    pub instructions: Option<String>,
    pub minutes_to_complete: Option<Value>,
}

/// Minimal `{id, username}` projection of the recipe's owner.
#[derive(Debug, Serialize)]
pub struct OwnerSummary {
    pub id: i64,
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct RecipeResponse {
    pub id: i64,
    pub title: String,
    pub instructions: String,
    pub minutes_to_complete: i32,
    pub user: OwnerSummary,
}

impl From<RecipeWithOwner> for RecipeResponse {
    fn from(r: RecipeWithOwner) -> Self {
        Self {
            id: r.recipe.id,
            title: r.recipe.title,
            instructions: r.recipe.instructions,
            minutes_to_complete: r.recipe.minutes_to_complete,
            user: OwnerSummary {
                id: r.recipe.user_id,
                username: r.owner_username,
            },
        }
    }
}
