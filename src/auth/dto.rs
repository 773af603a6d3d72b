use serde::{Deserialize, Serialize};

use super::repo_types::User;

/// Request body for signup. Absent fields become field errors, not parse errors.
#[derive(Debug, Default, Deserialize)]
pub struct SignupRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub image_url: Option<String>,
    pub bio: Option<String>,
}

/// Request body for login.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub image_url: Option<String>,
    pub bio: Option<String>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            image_url: u.image_url,
            bio: u.bio,
        }
    }
}
