use super::error::FeedServiceError;
use crate::domain::recipe::{Category, Recipe, RecipeId, UserId};
use crate::domain::user::Follower;
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;

/// Backend collaborator that owns recipes and the follow/like relations.
///
/// Recipes come back newest first; the feed never reorders them.
#[async_trait]
pub trait DataProvider: Send + Sync {
    async fn fetch_recipes(&self) -> Result<Vec<Recipe>, FeedServiceError>;

    async fn fetch_user_recipes(&self, user_id: UserId) -> Result<Vec<Recipe>, FeedServiceError>;

    async fn find_recipe(&self, recipe_id: RecipeId) -> Result<Option<Recipe>, FeedServiceError>;

    async fn fetch_categories(&self) -> Result<Vec<Category>, FeedServiceError>;

    async fn fetch_followed_user_ids(&self, viewer_id: UserId)
        -> Result<Vec<UserId>, FeedServiceError>;

    async fn fetch_liked_recipe_ids(&self, viewer_id: UserId)
        -> Result<Vec<RecipeId>, FeedServiceError>;

    /// Returns `false` when no recipe with that id existed.
    async fn delete_recipe(&self, recipe_id: RecipeId) -> Result<bool, FeedServiceError>;

    /// Idempotent: liking an already liked recipe is not an error.
    async fn like_recipe(&self, viewer_id: UserId, recipe_id: RecipeId)
        -> Result<(), FeedServiceError>;

    async fn unlike_recipe(&self, viewer_id: UserId, recipe_id: RecipeId)
        -> Result<(), FeedServiceError>;

    /// Idempotent, like `like_recipe`.
    async fn follow_user(&self, follower_id: UserId, following_id: UserId)
        -> Result<(), FeedServiceError>;

    async fn unfollow_user(&self, follower_id: UserId, following_id: UserId)
        -> Result<(), FeedServiceError>;

    /// Users following `user_id`, most recent follow first.
    async fn fetch_followers(&self, user_id: UserId) -> Result<Vec<Follower>, FeedServiceError>;

    async fn check_ready(&self) -> Result<(), FeedServiceError> {
        Ok(())
    }
}

/// Runs a provider call under a deadline.
pub async fn with_timeout<T, F>(
    operation: &'static str,
    after: Duration,
    call: F,
) -> Result<T, FeedServiceError>
where
    F: Future<Output = Result<T, FeedServiceError>>,
{
    tokio::time::timeout(after, call)
        .await
        .map_err(|_| FeedServiceError::Timeout { operation, after })?
}
