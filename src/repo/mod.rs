//! Persistence gateway.
//!
//! Handlers only see [`Repository`]; Postgres backs it in production and the
//! in-memory store backs it in tests. Both enforce the same constraints, so a
//! uniqueness or foreign-key conflict detected at commit time surfaces as a
//! typed [`RepoError`] instead of a raw driver error.

use async_trait::async_trait;
use thiserror::Error;

use crate::auth::repo_types::{NewUser, User};
use crate::recipes::repo_types::{NewRecipe, RecipeWithOwner};

pub mod memory;
pub mod postgres;

pub use memory::MemoryRepository;
pub use postgres::PgRepository;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("unique constraint violated")]
    UniqueViolation,

    #[error("foreign key constraint violated")]
    ForeignKeyViolation,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[async_trait]
pub trait Repository: Send + Sync {
    async fn find_user_by_id(&self, id: i64) -> anyhow::Result<Option<User>>;

    async fn find_user_by_username(&self, username: &str) -> anyhow::Result<Option<User>>;

    async fn create_user(&self, user: &NewUser) -> Result<User, RepoError>;

    async fn create_recipe(&self, recipe: &NewRecipe) -> Result<RecipeWithOwner, RepoError>;

    /// All recipes, oldest first, each joined with its owner.
    async fn list_recipes(&self) -> anyhow::Result<Vec<RecipeWithOwner>>;

    /// Removes every recipe and user.
    async fn delete_all(&self) -> anyhow::Result<()>;
}
