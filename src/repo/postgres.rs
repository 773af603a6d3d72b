use anyhow::Context;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};

use super::{RepoError, Repository};
use crate::auth::repo_types::{NewUser, User};
use crate::config::AppConfig;
use crate::recipes::repo_types::{NewRecipe, RecipeWithOwner};

#[derive(Clone)]
pub struct PgRepository {
    db: PgPool,
}

impl PgRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn connect(config: &AppConfig) -> anyhow::Result<Self> {
        let db = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;
        Ok(Self::new(db))
    }

    /// Applies the embedded migrations; failure is logged and otherwise ignored.
    pub async fn migrate(&self) {
        if let Err(e) = sqlx::migrate!("./migrations").run(&self.db).await {
            tracing::warn!(error = %e, "migrations folder not found or migration failed; continuing");
        }
    }
}

fn classify(e: sqlx::Error, what: &'static str) -> RepoError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            return RepoError::UniqueViolation;
        }
        if db.is_foreign_key_violation() {
            return RepoError::ForeignKeyViolation;
        }
    }
    RepoError::Other(anyhow::Error::new(e).context(what))
}

#[async_trait]
impl Repository for PgRepository {
    async fn find_user_by_id(&self, id: i64) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, image_url, bio, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find user by id")?;
        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, image_url, bio, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await
        .context("find user by username")?;
        Ok(user)
    }

    async fn create_user(&self, user: &NewUser) -> Result<User, RepoError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash, image_url, bio)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, password_hash, image_url, bio, created_at
            "#,
        )
        .bind(user.username())
        .bind(user.password_hash())
        .bind(user.image_url())
        .bind(user.bio())
        .fetch_one(&self.db)
        .await
        .map_err(|e| classify(e, "insert user"))
    }

    async fn create_recipe(&self, recipe: &NewRecipe) -> Result<RecipeWithOwner, RepoError> {
        let query = r#"
            WITH r AS (
                INSERT INTO recipes (title, instructions, minutes_to_complete, user_id)
                VALUES ($1, $2, $3, $4)
                RETURNING id, title, instructions, minutes_to_complete, user_id, created_at
            )
            SELECT r.id, r.title, r.instructions, r.minutes_to_complete, r.user_id, r.created_at,
                   u.username AS owner_username
            FROM r
            JOIN users u ON u.id = r.user_id
            "#;
        sqlx::query_as::<_, RecipeWithOwner>(query)
            .bind(recipe.title())
            .bind(recipe.instructions())
            .bind(recipe.minutes_to_complete())
            .bind(recipe.user_id())
            .fetch_one(&self.db)
            .await
            .map_err(|e| classify(e, "insert recipe"))
    }

    async fn list_recipes(&self) -> anyhow::Result<Vec<RecipeWithOwner>> {
        let rows = sqlx::query_as::<_, RecipeWithOwner>(
            r#"
            SELECT r.id, r.title, r.instructions, r.minutes_to_complete, r.user_id, r.created_at,
                   u.username AS owner_username
            FROM recipes r
            JOIN users u ON u.id = r.user_id
            ORDER BY r.id ASC
            "#,
        )
            .fetch_all(&self.db)
            .await
            .context("list recipes")?;
        Ok(rows)
    }

    async fn delete_all(&self) -> anyhow::Result<()> {
        let mut tx = self.db.begin().await.context("begin tx")?;
        sqlx::query("DELETE FROM recipes")
            .execute(&mut *tx)
            .await
            .context("delete recipes")?;
        sqlx::query("DELETE FROM users")
            .execute(&mut *tx)
            .await
            .context("delete users")?;
        tx.commit().await.context("commit tx")?;
        Ok(())
    }
}
