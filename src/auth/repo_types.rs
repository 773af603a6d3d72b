use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,                    // storage-generated id
    pub username: String,           // unique, never changes
    #[serde(skip_serializing)]
    pub password_hash: String,      // Argon2 PHC string, not exposed in JSON
    pub image_url: Option<String>,
    pub bio: Option<String>,
    #[serde(skip_serializing)]
    pub created_at: OffsetDateTime,
}

/// A user that passed signup validation and carries a hashed password.
///
/// Only [`crate::auth::services::build_new_user`] constructs one, so every
/// value that reaches the repository has already been checked.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub(crate) username: String,
    pub(crate) password_hash: String,
    pub(crate) image_url: Option<String>,
    pub(crate) bio: Option<String>,
}

impl NewUser {
    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    pub fn bio(&self) -> Option<&str> {
        self.bio.as_deref()
    }
}
