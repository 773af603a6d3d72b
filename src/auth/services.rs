use tracing::{error, warn};

use super::dto::SignupRequest;
use super::password::{hash_password, verify_against_dummy, verify_password};
use super::repo_types::{NewUser, User};
use crate::error::ApiError;
use crate::repo::{RepoError, Repository};
use crate::validation::{validate_required, FieldError, ValidationErrors};

const USERNAME_TAKEN: &str = "Username already exists.";

/// Checks signup input, collecting every field error before returning.
///
/// Returns the owned `(username, password)` pair on success.
pub async fn validate_signup(
    repo: &dyn Repository,
    username: Option<&str>,
    password: Option<&str>,
) -> Result<(String, String), ApiError> {
    let mut errors = ValidationErrors::new();

    let username = errors.check(
        "username",
        validate_required(username, "Username is required."),
    );
    if let Some(name) = &username {
        if repo.find_user_by_username(name).await?.is_some() {
            errors.add("username", FieldError::duplicate(USERNAME_TAKEN));
        }
    }
    let password = errors.check(
        "password",
        validate_required(password, "Password is required."),
    );

    match (username, password) {
        (Some(u), Some(p)) if errors.is_empty() => Ok((u, p)),
        _ => Err(errors.into()),
    }
}

/// Validates the request and hashes the password. Nothing is written.
pub async fn build_new_user(repo: &dyn Repository, req: SignupRequest) -> Result<NewUser, ApiError> {
    let (username, password) =
        validate_signup(repo, req.username.as_deref(), req.password.as_deref()).await?;
    let password_hash = hash_password(&password)?;
    Ok(NewUser {
        username,
        password_hash,
        image_url: req.image_url,
        bio: req.bio,
    })
}

/// Creates the user, turning a commit-time uniqueness race into a field error.
pub async fn register(repo: &dyn Repository, req: SignupRequest) -> Result<User, ApiError> {
    let new_user = build_new_user(repo, req).await?;
    match repo.create_user(&new_user).await {
        Ok(user) => Ok(user),
        Err(RepoError::UniqueViolation) => {
            warn!(username = %new_user.username(), "username taken at commit");
            Err(ApiError::field("username", FieldError::duplicate(USERNAME_TAKEN)))
        }
        Err(e) => {
            error!(error = %e, "create user failed");
            Err(ApiError::Internal(e.into()))
        }
    }
}

/// Resolves credentials to a user. Unknown usernames and wrong passwords are
/// indistinguishable to the caller.
pub async fn authenticate(
    repo: &dyn Repository,
    username: Option<&str>,
    password: Option<&str>,
) -> Result<User, ApiError> {
    let password = password.unwrap_or_default();
    let user = match username.filter(|u| !u.is_empty()) {
        Some(name) => repo.find_user_by_username(name).await?,
        None => None,
    };

    match user {
        Some(u) if verify_password(password, &u.password_hash) => Ok(u),
        Some(u) => {
            warn!(user_id = u.id, "login invalid password");
            Err(ApiError::InvalidCredentials)
        }
        None => {
            verify_against_dummy(password);
            warn!("login unknown username");
            Err(ApiError::InvalidCredentials)
        }
    }
}
