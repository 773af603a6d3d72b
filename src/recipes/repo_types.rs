use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Recipe {
    pub id: i64,
    pub title: String,
    pub instructions: String,
    pub minutes_to_complete: i32,
    pub user_id: i64,
    #[serde(skip_serializing)]
    pub created_at: OffsetDateTime,
}

/// A recipe joined with its owner's username.
#[derive(Debug, Clone, FromRow)]
pub struct RecipeWithOwner {
    #[sqlx(flatten)]
    pub recipe: Recipe,
    pub owner_username: String,
}

/// A recipe whose fields and owner have been validated.
#[derive(Debug, Clone)]
pub struct NewRecipe {
    pub(crate) title: String,
    pub(crate) instructions: String,
    pub(crate) minutes_to_complete: i32,
    pub(crate) user_id: i64,
}

impl NewRecipe {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    pub fn minutes_to_complete(&self) -> i32 {
        self.minutes_to_complete
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }
}
