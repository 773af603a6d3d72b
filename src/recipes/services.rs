use tracing::{error, warn};

use super::dto::CreateRecipeRequest;
use super::repo_types::{NewRecipe, RecipeWithOwner};
use crate::error::ApiError;
use crate::repo::{RepoError, Repository};
use crate::validation::{
    validate_instructions, validate_minutes, validate_title, FieldError, ValidationErrors,
};

const NO_OWNER: &str = "Every recipe must be linked to a valid user.";

/// Field checks only; collects every failure.
pub fn validate_recipe_fields(
    req: &CreateRecipeRequest,
) -> Result<(String, String, i32), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let title = errors.check("title", validate_title(req.title.as_deref()));
    let instructions = errors.check(
        "instructions",
        validate_instructions(req.instructions.as_deref()),
    );
    let minutes = errors.check(
        "minutes_to_complete",
        validate_minutes(req.minutes_to_complete.as_ref()),
    );
    match (title, instructions, minutes) {
        (Some(t), Some(i), Some(m)) => Ok((t, i, m)),
        _ => Err(errors),
    }
}

/// Confirms `user_id` is present and names an existing user.
pub async fn validate_owner(repo: &dyn Repository, user_id: Option<i64>) -> Result<i64, ApiError> {
    let Some(id) = user_id else {
        return Err(ApiError::field("user_id", FieldError::invalid(NO_OWNER)));
    };
    match repo.find_user_by_id(id).await? {
        Some(_) => Ok(id),
        None => {
            warn!(user_id = id, "recipe owner does not exist");
            Err(ApiError::field("user_id", FieldError::invalid(NO_OWNER)))
        }
    }
}

/// Fields first, then the owner. Nothing is written.
pub async fn build_new_recipe(
    repo: &dyn Repository,
    req: CreateRecipeRequest,
    owner: Option<i64>,
) -> Result<NewRecipe, ApiError> {
    let (title, instructions, minutes_to_complete) = validate_recipe_fields(&req)?;
    let user_id = validate_owner(repo, owner).await?;
    Ok(NewRecipe {
        title,
        instructions,
        minutes_to_complete,
        user_id,
    })
}

pub async fn create_recipe(
    repo: &dyn Repository,
    req: CreateRecipeRequest,
    owner: i64,
) -> Result<RecipeWithOwner, ApiError> {
    let new_recipe = build_new_recipe(repo, req, Some(owner)).await?;
    match repo.create_recipe(&new_recipe).await {
        Ok(r) => Ok(r),
        Err(RepoError::ForeignKeyViolation) => {
            warn!(user_id = owner, "owner removed before commit");
            Err(ApiError::field("user_id", FieldError::invalid(NO_OWNER)))
        }
        Err(e) => {
            error!(error = %e, "create recipe failed");
            Err(ApiError::Internal(e.into()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::auth::repo_types::{NewUser, User};
    use crate::repo::MemoryRepository;
    use crate::validation::FieldErrorKind;
    use serde_json::json;

    const LONG: &str = "Preheat the oven, season generously, then roast until golden brown.";

    fn request(title: Option<&str>, instructions: Option<&str>, minutes: serde_json::Value) -> CreateRecipeRequest {
        CreateRecipeRequest {
            title: title.map(Into::into),
            instructions: instructions.map(Into::into),
            minutes_to_complete: Some(minutes),
        }
    }

    async fn repo_with_user() -> (MemoryRepository, i64) {
        let repo = MemoryRepository::new();
        let user = repo
            .create_user(&NewUser {
                username: "TestUser".into(),
                password_hash: "$argon2id$fake".into(),
                image_url: None,
                bio: None,
            })
            .await
            .unwrap();
        (repo, user.id)
    }

    #[test]
    fn collects_every_field_error() {
        let errors = validate_recipe_fields(&CreateRecipeRequest::default()).unwrap_err();
        assert_eq!(errors.get("title").unwrap().kind, FieldErrorKind::Invalid);
        assert_eq!(errors.get("instructions").unwrap().kind, FieldErrorKind::Invalid);
        assert_eq!(errors.get("minutes_to_complete").unwrap().kind, FieldErrorKind::Invalid);
    }

    #[tokio::test]
    async fn builds_valid_recipe() {
        let (repo, user_id) = repo_with_user().await;
        let recipe = build_new_recipe(&repo, request(Some("Delicious Shed Ham"), Some(LONG), json!(60)), Some(user_id))
            .await
            .unwrap();
        assert_eq!(recipe.title(), "Delicious Shed Ham");
        assert_eq!(recipe.minutes_to_complete(), 60);
        assert_eq!(recipe.user_id(), user_id);
    }

    #[tokio::test]
    async fn missing_owner_is_invalid() {
        let (repo, _) = repo_with_user().await;
        let err = build_new_recipe(&repo, request(Some("Orphaned Recipe"), Some(LONG), json!(20)), None)
            .await
            .unwrap_err();
        let ApiError::Validation(v) = err else { panic!("expected validation error") };
        assert_eq!(v.get("user_id").unwrap().message, NO_OWNER);
    }

    #[tokio::test]
    async fn unknown_owner_is_invalid() {
        let (repo, user_id) = repo_with_user().await;
        let err = build_new_recipe(&repo, request(Some("Ghost"), Some(LONG), json!(20)), Some(user_id + 100))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(ref v) if v.get("user_id").is_some()));
    }

    #[tokio::test]
    async fn field_errors_win_over_owner_errors() {
        let (repo, _) = repo_with_user().await;
        let err = build_new_recipe(&repo, request(None, Some("Too short!"), json!(30)), None)
            .await
            .unwrap_err();
        let ApiError::Validation(v) = err else { panic!("expected validation error") };
        assert!(v.get("title").is_some());
        assert!(v.get("instructions").is_some());
        assert!(v.get("user_id").is_none());
    }

    #[tokio::test]
    async fn invalid_recipe_is_never_persisted() {
        let (repo, user_id) = repo_with_user().await;
        let res = create_recipe(&repo, request(Some("Short"), Some("Too short!"), json!(30)), user_id).await;
        assert!(res.is_err());
        assert!(repo.list_recipes().await.unwrap().is_empty());
    }

    /// Deletes the recipe's owner between validation and the insert.
    struct OwnerVanishesRepo(MemoryRepository);

    #[async_trait]
    impl Repository for OwnerVanishesRepo {
        async fn find_user_by_id(&self, id: i64) -> anyhow::Result<Option<User>> {
            self.0.find_user_by_id(id).await
        }

        async fn find_user_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
            self.0.find_user_by_username(username).await
        }

        async fn create_user(&self, user: &NewUser) -> Result<User, RepoError> {
            self.0.create_user(user).await
        }

        async fn create_recipe(&self, recipe: &NewRecipe) -> Result<RecipeWithOwner, RepoError> {
            self.0.delete_user(recipe.user_id()).await;
            self.0.create_recipe(recipe).await
        }

        async fn list_recipes(&self) -> anyhow::Result<Vec<RecipeWithOwner>> {
            self.0.list_recipes().await
        }

        async fn delete_all(&self) -> anyhow::Result<()> {
            self.0.delete_all().await
        }
    }

    #[tokio::test]
    async fn owner_deleted_before_commit_is_field_error() {
        let (inner, user_id) = repo_with_user().await;
        let repo = OwnerVanishesRepo(inner);

        let err = create_recipe(&repo, request(Some("Race"), Some(LONG), json!(5)), user_id)
            .await
            .unwrap_err();
        let ApiError::Validation(v) = err else { panic!("expected validation error") };
        let field = v.get("user_id").unwrap();
        assert_eq!(field.kind, FieldErrorKind::Invalid);
        assert_eq!(field.message, NO_OWNER);
        assert!(repo.list_recipes().await.unwrap().is_empty());
    }
}
