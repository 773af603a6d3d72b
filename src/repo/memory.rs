use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use super::{RepoError, Repository};
use crate::auth::repo_types::{NewUser, User};
use crate::recipes::repo_types::{NewRecipe, Recipe, RecipeWithOwner};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    recipes: Vec<Recipe>,
    next_user_id: i64,
    next_recipe_id: i64,
}

impl Tables {
    fn user(&self, id: i64) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    fn with_owner(&self, recipe: &Recipe) -> Option<RecipeWithOwner> {
        self.user(recipe.user_id).map(|u| RecipeWithOwner {
            recipe: recipe.clone(),
            owner_username: u.username.clone(),
        })
    }
}

/// Process-local store with the same constraints as the Postgres schema.
#[derive(Default)]
pub struct MemoryRepository {
    tables: RwLock<Tables>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops a user and, like `ON DELETE CASCADE`, every recipe they own.
    pub async fn delete_user(&self, id: i64) {
        let mut t = self.tables.write().await;
        t.users.retain(|u| u.id != id);
        t.recipes.retain(|r| r.user_id != id);
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn find_user_by_id(&self, id: i64) -> anyhow::Result<Option<User>> {
        Ok(self.tables.read().await.user(id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        let t = self.tables.read().await;
        Ok(t.users.iter().find(|u| u.username == username).cloned())
    }

    async fn create_user(&self, user: &NewUser) -> Result<User, RepoError> {
        let mut t = self.tables.write().await;
        if t.users.iter().any(|u| u.username == user.username) {
            return Err(RepoError::UniqueViolation);
        }
        t.next_user_id += 1;
        let row = User {
            id: t.next_user_id,
            username: user.username.clone(),
            password_hash: user.password_hash.clone(),
            image_url: user.image_url.clone(),
            bio: user.bio.clone(),
            created_at: OffsetDateTime::now_utc(),
        };
        t.users.push(row.clone());
        Ok(row)
    }

    async fn create_recipe(&self, recipe: &NewRecipe) -> Result<RecipeWithOwner, RepoError> {
        let mut t = self.tables.write().await;
        if t.user(recipe.user_id).is_none() {
            return Err(RepoError::ForeignKeyViolation);
        }
        t.next_recipe_id += 1;
        let row = Recipe {
            id: t.next_recipe_id,
            title: recipe.title.clone(),
            instructions: recipe.instructions.clone(),
            minutes_to_complete: recipe.minutes_to_complete,
            user_id: recipe.user_id,
            created_at: OffsetDateTime::now_utc(),
        };
        t.recipes.push(row.clone());
        t.with_owner(&row)
            .ok_or_else(|| RepoError::Other(anyhow::anyhow!("owner vanished during insert")))
    }

    async fn list_recipes(&self) -> anyhow::Result<Vec<RecipeWithOwner>> {
        let t = self.tables.read().await;
        Ok(t.recipes.iter().filter_map(|r| t.with_owner(r)).collect())
    }

    async fn delete_all(&self) -> anyhow::Result<()> {
        let mut t = self.tables.write().await;
        t.recipes.clear();
        t.users.clear();
        Ok(())
    }
}
