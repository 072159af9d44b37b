use async_trait::async_trait;
use parking_lot::Mutex;
use recipe_feed_backend::domain::feed::{DataProvider, FeedServiceError};
use recipe_feed_backend::domain::recipe::{Category, Recipe, RecipeId, UserId};
use recipe_feed_backend::domain::user::Follower;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Data provider backed by plain collections, with switches that make
/// individual calls fail like an unreachable backend would.
#[derive(Default)]
pub struct InMemoryProvider {
    recipes: Mutex<Vec<Recipe>>,
    categories: Mutex<Vec<Category>>,
    // (follower, following) in the order the follows happened
    followings: Mutex<Vec<(UserId, UserId)>>,
    likes: Mutex<HashMap<UserId, Vec<RecipeId>>>,
    usernames: Mutex<HashMap<UserId, String>>,
    recipes_fail: AtomicBool,
    categories_fail: AtomicBool,
    followings_fail: AtomicBool,
    deletes_fail: AtomicBool,
    mutations_fail: AtomicBool,
    ready: AtomicBool,
    delete_calls: AtomicUsize,
}

#[allow(dead_code)]
impl InMemoryProvider {
    pub fn new() -> Self {
        let provider = Self::default();
        provider.ready.store(true, Ordering::SeqCst);
        provider
    }

    pub fn set_recipes(&self, recipes: Vec<Recipe>) {
        *self.recipes.lock() = recipes;
    }

    pub fn set_categories(&self, categories: Vec<Category>) {
        *self.categories.lock() = categories;
    }

    pub fn follow(&self, follower: UserId, followed: UserId) {
        let mut followings = self.followings.lock();
        if !followings.contains(&(follower, followed)) {
            followings.push((follower, followed));
        }
    }

    pub fn like(&self, user: UserId, recipe_id: RecipeId) {
        let mut likes = self.likes.lock();
        let liked = likes.entry(user).or_default();
        if !liked.contains(&recipe_id) {
            liked.push(recipe_id);
        }
    }

    pub fn set_username(&self, user: UserId, username: &str) {
        self.usernames.lock().insert(user, username.to_string());
    }

    pub fn liked_ids(&self, user: UserId) -> Vec<RecipeId> {
        self.likes.lock().get(&user).cloned().unwrap_or_default()
    }

    pub fn followed_ids(&self, follower: UserId) -> Vec<UserId> {
        self.followings
            .lock()
            .iter()
            .filter(|(f, _)| *f == follower)
            .map(|(_, followed)| *followed)
            .collect()
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

    pub fn fail_mutations(&self) {
        self.mutations_fail.store(true, Ordering::SeqCst);
    }

    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
    }

    pub fn recipe_ids(&self) -> Vec<RecipeId> {
        self.recipes.lock().iter().map(|r| r.id).collect()
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
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
impl DataProvider for InMemoryProvider {
    async fn fetch_recipes(&self) -> Result<Vec<Recipe>, FeedServiceError> {
        Self::check(&self.recipes_fail)?;
        Ok(self.recipes.lock().clone())
    }

    async fn fetch_user_recipes(&self, user_id: UserId) -> Result<Vec<Recipe>, FeedServiceError> {
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
        Self::check(&self.recipes_fail)?;
        Ok(self.recipes.lock().iter().find(|r| r.id == recipe_id).cloned())
    }

    async fn fetch_categories(&self) -> Result<Vec<Category>, FeedServiceError> {
        Self::check(&self.categories_fail)?;
        Ok(self.categories.lock().clone())
    }

    async fn fetch_followed_user_ids(
        &self,
        viewer_id: UserId,
    ) -> Result<Vec<UserId>, FeedServiceError> {
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
        self.like(viewer_id, recipe_id);
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
        self.follow(follower_id, following_id);
        Ok(())
    }

    async fn unfollow_user(
        &self,
        follower_id: UserId,
        following_id: UserId,
    ) -> Result<(), FeedServiceError> {
        Self::check(&self.mutations_fail)?;
        self.followings
            .lock()
            .retain(|pair| *pair != (follower_id, following_id));
        Ok(())
    }

    async fn fetch_followers(&self, user_id: UserId) -> Result<Vec<Follower>, FeedServiceError> {
        Self::check(&self.followings_fail)?;
        let usernames = self.usernames.lock();
        Ok(self
            .followings
            .lock()
            .iter()
            .rev()
            .filter(|(_, followed)| *followed == user_id)
            .map(|(follower, _)| Follower {
                follower_id: *follower,
                username: usernames.get(follower).cloned(),
            })
            .collect())
    }

    async fn check_ready(&self) -> Result<(), FeedServiceError> {
        if self.ready.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(FeedServiceError::Dependency("database unreachable".to_string()))
        }
    }
}
