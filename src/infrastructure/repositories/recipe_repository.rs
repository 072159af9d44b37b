use crate::domain::feed::{DataProvider, FeedServiceError};
use crate::domain::recipe::{Category, Recipe, RecipeId, UserId};
use crate::domain::user::Follower;
use crate::error::AppResult;
use crate::infrastructure::db::{check_connection, DbPool};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use moka::future::Cache;
use sqlx::FromRow;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

const CATEGORIES_KEY: &str = "all";

// The inner join on ingredients drops recipes that have no ingredient row.
const RECIPE_SELECT: &str = r#"
    SELECT r.id, r.title, r.servings, r.total_time_minutes, r.steps_description,
           r.image_url, r.time_of_creation, r.users_id,
           c.id AS category_id, c.category_name,
           i.ingredient_text,
           u.username AS author_username
    FROM published_recipes r
    INNER JOIN ingredients i ON i.id = r.ingredients_id
    LEFT JOIN categories c ON c.id = r.categories_id
    LEFT JOIN users u ON u.id = r.users_id
"#;

#[derive(Debug, FromRow)]
struct RecipeRow {
    id: i64,
    title: String,
    servings: i32,
    total_time_minutes: i32,
    steps_description: String,
    image_url: Option<String>,
    time_of_creation: DateTime<Utc>,
    users_id: Uuid,
    category_id: Option<i64>,
    category_name: Option<String>,
    ingredient_text: Option<String>,
    author_username: Option<String>,
}

impl From<RecipeRow> for Recipe {
    fn from(row: RecipeRow) -> Self {
        let category = match (row.category_id, row.category_name) {
            (Some(id), Some(category_name)) => Some(Category { id, category_name }),
            _ => None,
        };

        Self {
            id: row.id,
            title: row.title,
            servings: row.servings,
            total_time_minutes: row.total_time_minutes,
            steps_description: row.steps_description,
            image_url: row.image_url,
            time_of_creation: row.time_of_creation,
            users_id: row.users_id,
            category,
            ingredient_text: row.ingredient_text,
            author_username: row.author_username,
        }
    }
}

pub struct RecipeRepository {
    pool: Arc<DbPool>,
    categories_cache: Option<Cache<&'static str, Vec<Category>>>,
}

impl RecipeRepository {
    pub fn new(pool: Arc<DbPool>, category_cache_enabled: bool) -> Self {
        // Categories change rarely; a short TTL keeps admin edits visible.
        let categories_cache = if category_cache_enabled {
            Some(
                Cache::builder()
                    .max_capacity(1)
                    .time_to_live(Duration::from_secs(5 * 60))
                    .build(),
            )
        } else {
            None
        };

        Self {
            pool,
            categories_cache,
        }
    }

    /// Get all published recipes, newest first
    pub async fn find_all(&self) -> AppResult<Vec<Recipe>> {
        let pool = self.pool.as_ref();
        let rows = sqlx::query_as::<_, RecipeRow>(&format!(
            "{RECIPE_SELECT} ORDER BY r.time_of_creation DESC"
        ))
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(Recipe::from).collect())
    }

    /// Get recipes published by one user, newest first
    pub async fn find_by_user(&self, user_id: Uuid) -> AppResult<Vec<Recipe>> {
        let pool = self.pool.as_ref();
        let rows = sqlx::query_as::<_, RecipeRow>(&format!(
            "{RECIPE_SELECT} WHERE r.users_id = $1 ORDER BY r.time_of_creation DESC"
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(Recipe::from).collect())
    }

    /// Get a recipe by ID
    pub async fn find_by_id(&self, recipe_id: i64) -> AppResult<Option<Recipe>> {
        let pool = self.pool.as_ref();
        let row = sqlx::query_as::<_, RecipeRow>(&format!("{RECIPE_SELECT} WHERE r.id = $1"))
            .bind(recipe_id)
            .fetch_optional(pool)
            .await?;

        Ok(row.map(Recipe::from))
    }

    pub async fn find_categories(&self) -> AppResult<Vec<Category>> {
        if let Some(cache) = &self.categories_cache {
            if let Some(categories) = cache.get(CATEGORIES_KEY).await {
                tracing::debug!(count = categories.len(), "Category cache hit");
                return Ok(categories);
            }
        }

        let pool = self.pool.as_ref();
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, category_name
            FROM categories
            ORDER BY id
            "#,
        )
        .fetch_all(pool)
        .await?;

        if let Some(cache) = &self.categories_cache {
            cache.insert(CATEGORIES_KEY, categories.clone()).await;
        }

        Ok(categories)
    }

    /// Users the follower follows
    pub async fn find_followed_ids(&self, follower_id: Uuid) -> AppResult<Vec<Uuid>> {
        let pool = self.pool.as_ref();
        let ids = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT following_id
            FROM followings
            WHERE follower_id = $1
            "#,
        )
        .bind(follower_id)
        .fetch_all(pool)
        .await?;

        Ok(ids)
    }

    pub async fn find_liked_ids(&self, user_id: Uuid) -> AppResult<Vec<i64>> {
        let pool = self.pool.as_ref();
        let ids = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT published_recipes_id
            FROM liked_recipes
            WHERE users_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(ids)
    }

    /// Delete a recipe
    pub async fn delete(&self, recipe_id: i64) -> AppResult<bool> {
        let pool = self.pool.as_ref();
        let result = sqlx::query(
            r#"
            DELETE FROM published_recipes
            WHERE id = $1
            "#,
        )
        .bind(recipe_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn insert_like(&self, user_id: Uuid, recipe_id: i64) -> AppResult<()> {
        let pool = self.pool.as_ref();
        sqlx::query(
            r#"
            INSERT INTO liked_recipes (users_id, published_recipes_id)
            SELECT $1, $2
            WHERE NOT EXISTS (
                SELECT 1 FROM liked_recipes
                WHERE users_id = $1 AND published_recipes_id = $2
            )
            "#,
        )
        .bind(user_id)
        .bind(recipe_id)
        .execute(pool)
        .await?;

        Ok(())
    }

    pub async fn delete_like(&self, user_id: Uuid, recipe_id: i64) -> AppResult<()> {
        let pool = self.pool.as_ref();
        sqlx::query(
            r#"
            DELETE FROM liked_recipes
            WHERE users_id = $1 AND published_recipes_id = $2
            "#,
        )
        .bind(user_id)
        .bind(recipe_id)
        .execute(pool)
        .await?;

        Ok(())
    }

    pub async fn insert_following(&self, follower_id: Uuid, following_id: Uuid) -> AppResult<()> {
        let pool = self.pool.as_ref();
        sqlx::query(
            r#"
            INSERT INTO followings (follower_id, following_id)
            SELECT $1, $2
            WHERE NOT EXISTS (
                SELECT 1 FROM followings
                WHERE follower_id = $1 AND following_id = $2
            )
            "#,
        )
        .bind(follower_id)
        .bind(following_id)
        .execute(pool)
        .await?;

        Ok(())
    }

    pub async fn delete_following(&self, follower_id: Uuid, following_id: Uuid) -> AppResult<()> {
        let pool = self.pool.as_ref();
        sqlx::query(
            r#"
            DELETE FROM followings
            WHERE follower_id = $1 AND following_id = $2
            "#,
        )
        .bind(follower_id)
        .bind(following_id)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Followers of a user with their usernames, newest follow first
    pub async fn find_followers(&self, user_id: Uuid) -> AppResult<Vec<Follower>> {
        let pool = self.pool.as_ref();
        let followers = sqlx::query_as::<_, Follower>(
            r#"
            SELECT f.follower_id, u.username
            FROM followings f
            LEFT JOIN users u ON u.id = f.follower_id
            WHERE f.following_id = $1
            ORDER BY f.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(followers)
    }
}

#[async_trait]
impl DataProvider for RecipeRepository {
    async fn fetch_recipes(&self) -> Result<Vec<Recipe>, FeedServiceError> {
        Ok(self.find_all().await?)
    }

    async fn fetch_user_recipes(&self, user_id: UserId) -> Result<Vec<Recipe>, FeedServiceError> {
        Ok(self.find_by_user(user_id).await?)
    }

    async fn find_recipe(&self, recipe_id: RecipeId) -> Result<Option<Recipe>, FeedServiceError> {
        Ok(self.find_by_id(recipe_id).await?)
    }

    async fn fetch_categories(&self) -> Result<Vec<Category>, FeedServiceError> {
        Ok(self.find_categories().await?)
    }

    async fn fetch_followed_user_ids(
        &self,
        viewer_id: UserId,
    ) -> Result<Vec<UserId>, FeedServiceError> {
        Ok(self.find_followed_ids(viewer_id).await?)
    }

    async fn fetch_liked_recipe_ids(
        &self,
        viewer_id: UserId,
    ) -> Result<Vec<RecipeId>, FeedServiceError> {
        Ok(self.find_liked_ids(viewer_id).await?)
    }

    async fn delete_recipe(&self, recipe_id: RecipeId) -> Result<bool, FeedServiceError> {
        Ok(self.delete(recipe_id).await?)
    }

    async fn like_recipe(
        &self,
        viewer_id: UserId,
        recipe_id: RecipeId,
    ) -> Result<(), FeedServiceError> {
        Ok(self.insert_like(viewer_id, recipe_id).await?)
    }

    async fn unlike_recipe(
        &self,
        viewer_id: UserId,
        recipe_id: RecipeId,
    ) -> Result<(), FeedServiceError> {
        Ok(self.delete_like(viewer_id, recipe_id).await?)
    }

    async fn follow_user(
        &self,
        follower_id: UserId,
        following_id: UserId,
    ) -> Result<(), FeedServiceError> {
        Ok(self.insert_following(follower_id, following_id).await?)
    }

    async fn unfollow_user(
        &self,
        follower_id: UserId,
        following_id: UserId,
    ) -> Result<(), FeedServiceError> {
        Ok(self.delete_following(follower_id, following_id).await?)
    }

    async fn fetch_followers(&self, user_id: UserId) -> Result<Vec<Follower>, FeedServiceError> {
        Ok(self.find_followers(user_id).await?)
    }

    async fn check_ready(&self) -> Result<(), FeedServiceError> {
        check_connection(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| FeedServiceError::Dependency(e.to_string()))
    }
}
