use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub type RecipeId = i64;
pub type UserId = Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: i64,
    pub category_name: String,
}

/// A published recipe as the feed sees it, with its category and
/// ingredient text already joined in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: RecipeId,
    pub title: String,
    pub servings: i32,
    pub total_time_minutes: i32,
    pub steps_description: String,
    pub image_url: Option<String>,
    pub time_of_creation: DateTime<Utc>,
    pub users_id: UserId,
    pub category: Option<Category>,
    pub ingredient_text: Option<String>,
    pub author_username: Option<String>,
}

impl Recipe {
    pub fn category_name(&self) -> Option<&str> {
        self.category.as_ref().map(|c| c.category_name.as_str())
    }

    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.users_id == user_id
    }
}
