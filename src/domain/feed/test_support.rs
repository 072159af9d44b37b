use super::error::FeedServiceError;
use super::provider::DataProvider;
use crate::domain::recipe::{Category, Recipe, RecipeId, UserId};
use crate::domain::user::Follower;
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, TimeZone, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use uuid::Uuid;

pub fn user(n: u128) -> UserId {
    Uuid::from_u128(n)
}

/// Recipes built here get later timestamps for higher ids.
pub fn recipe(id: RecipeId, category: &str, owner: UserId) -> Recipe {
    Recipe {
        category: Some(Category {
            id: category.len() as i64,
            category_name: category.to_string(),
        }),
        ..uncategorized_recipe(id, owner)
    }
}

pub fn uncategorized_recipe(id: RecipeId, owner: UserId) -> Recipe {
    let epoch = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
    Recipe {
        id,
        title: format!("Recipe {}", id),
        servings: 4,
        total_time_minutes: 30,
        steps_description: "Mix and cook.".to_string(),
        image_url: None,
        time_of_creation: epoch + ChronoDuration::minutes(id),
        users_id: owner,
        category: None,
        ingredient_text: Some("water 1l".to_string()),
        author_username: Some(format!("user-{}", owner.as_u128())),
    }
}

/// In-memory provider with switchable failures.
#[derive(Default)]
pub struct FakeProvider {
    recipes: Mutex<Vec<Recipe>>,
    categories: Vec<Category>,
    followings: Mutex<HashMap<UserId, Vec<UserId>>>,
    likes: Mutex<HashMap<UserId, Vec<RecipeId>>>,
    latency: Option<Duration>,
    recipes_fail: AtomicBool,
    categories_fail: AtomicBool,
    followings_fail: AtomicBool,
    deletes_fail: AtomicBool,
    mutations_fail: AtomicBool,
    followings_calls: AtomicUsize,
    delete_calls: AtomicUsize,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_recipes(self, recipes: Vec<Recipe>) -> Self {
        *self.recipes.lock() = recipes;
        self
    }

    pub fn with_categories(mut self, names: &[&str]) -> Self {
        self.categories = names
            .iter()
            .enumerate()
            .map(|(i, name)| Category {
                id: i as i64 + 1,
                category_name: name.to_string(),
            })
            .collect();
        self
    }

    pub fn with_following(self, viewer: UserId, followed: &[UserId]) -> Self {
        self.followings.lock().insert(viewer, followed.to_vec());
        self
    }

    pub fn with_likes(self, viewer: UserId, liked: &[RecipeId]) -> Self {
        self.likes.lock().insert(viewer, liked.to_vec());
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn fail_recipes(&self) {
        self.recipes_fail.store(true, Ordering::SeqCst);
    }

    pub fn fail_categories(&self) {
        self.categories_fail.store(true, Ordering::SeqCst);
    }

    pub fn fail_followings(&self) {
        self.followings_fail.store(true, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self) {
        self.deletes_fail.store(true, Ordering::SeqCst);
    }

    /// Makes like, unlike, follow and unfollow fail.
    pub fn fail_mutations(&self) {
        self.mutations_fail.store(true, Ordering::SeqCst);
    }

    pub fn followings_calls(&self) -> usize {
        self.followings_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    pub fn liked_ids(&self, viewer: UserId) -> Vec<RecipeId> {
        self.likes.lock().get(&viewer).cloned().unwrap_or_default()
    }

    pub fn followed_ids(&self, viewer: UserId) -> Vec<UserId> {
        self.followings.lock().get(&viewer).cloned().unwrap_or_default()
    }

    async fn delay(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }

    fn check(flag: &AtomicBool) -> Result<(), FeedServiceError> {
        if flag.load(Ordering::SeqCst) {
            return Err(FeedServiceError::Dependency(
                "backend unavailable".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl DataProvider for FakeProvider {
    async fn fetch_recipes(&self) -> Result<Vec<Recipe>, FeedServiceError> {
        self.delay().await;
        Self::check(&self.recipes_fail)?;
        Ok(self.recipes.lock().clone())
    }

    async fn fetch_user_recipes(&self, user_id: UserId) -> Result<Vec<Recipe>, FeedServiceError> {
        self.delay().await;
        Self::check(&self.recipes_fail)?;
        Ok(self
            .recipes
            .lock()
            .iter()
            .filter(|r| r.users_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_recipe(&self, recipe_id: RecipeId) -> Result<Option<Recipe>, FeedServiceError> {
        self.delay().await;
        Self::check(&self.recipes_fail)?;
        Ok(self.recipes.lock().iter().find(|r| r.id == recipe_id).cloned())
    }

    async fn fetch_categories(&self) -> Result<Vec<Category>, FeedServiceError> {
        self.delay().await;
        Self::check(&self.categories_fail)?;
        Ok(self.categories.clone())
    }

    async fn fetch_followed_user_ids(
        &self,
        viewer_id: UserId,
    ) -> Result<Vec<UserId>, FeedServiceError> {
        self.followings_calls.fetch_add(1, Ordering::SeqCst);
        self.delay().await;
        Self::check(&self.followings_fail)?;
        Ok(self.followed_ids(viewer_id))
    }

    async fn fetch_liked_recipe_ids(
        &self,
        viewer_id: UserId,
    ) -> Result<Vec<RecipeId>, FeedServiceError> {
        Ok(self.liked_ids(viewer_id))
    }

    async fn delete_recipe(&self, recipe_id: RecipeId) -> Result<bool, FeedServiceError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        Self::check(&self.deletes_fail)?;
        let mut recipes = self.recipes.lock();
        let before = recipes.len();
        recipes.retain(|r| r.id != recipe_id);
        Ok(recipes.len() < before)
    }

    async fn like_recipe(
        &self,
        viewer_id: UserId,
        recipe_id: RecipeId,
    ) -> Result<(), FeedServiceError> {
        Self::check(&self.mutations_fail)?;
        let mut likes = self.likes.lock();
        let liked = likes.entry(viewer_id).or_default();
        if !liked.contains(&recipe_id) {
            liked.push(recipe_id);
        }
        Ok(())
    }

    async fn unlike_recipe(
        &self,
        viewer_id: UserId,
        recipe_id: RecipeId,
    ) -> Result<(), FeedServiceError> {
        Self::check(&self.mutations_fail)?;
        if let Some(liked) = self.likes.lock().get_mut(&viewer_id) {
            liked.retain(|id| *id != recipe_id);
        }
        Ok(())
    }

    async fn follow_user(
        &self,
        follower_id: UserId,
        following_id: UserId,
    ) -> Result<(), FeedServiceError> {
        Self::check(&self.mutations_fail)?;
        let mut followings = self.followings.lock();
        let followed = followings.entry(follower_id).or_default();
        if !followed.contains(&following_id) {
            followed.push(following_id);
        }
        Ok(())
    }

    async fn unfollow_user(
        &self,
        follower_id: UserId,
        following_id: UserId,
    ) -> Result<(), FeedServiceError> {
        Self::check(&self.mutations_fail)?;
        if let Some(followed) = self.followings.lock().get_mut(&follower_id) {
            followed.retain(|id| *id != following_id);
        }
        Ok(())
    }

    async fn fetch_followers(&self, user_id: UserId) -> Result<Vec<Follower>, FeedServiceError> {
        Self::check(&self.followings_fail)?;
        let mut followers: Vec<Follower> = self
            .followings
            .lock()
            .iter()
            .filter(|(_, followed)| followed.contains(&user_id))
            .map(|(follower, _)| Follower {
                follower_id: *follower,
                username: Some(format!("user-{}", follower.as_u128())),
            })
            .collect();
        followers.sort_by_key(|f| f.follower_id);
        Ok(followers)
    }
}
