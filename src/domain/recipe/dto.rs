use super::{Category, Recipe, RecipeId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Response for single recipe endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct RecipeResponse {
    pub id: RecipeId,
    pub title: String,
    pub servings: i32,
    pub total_time_minutes: i32,
    pub steps_description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub time_of_creation: DateTime<Utc>,
    pub users_id: UserId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingredient_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_username: Option<String>,
}

/// Response for like and unlike
#[derive(Debug, Serialize, Deserialize)]
pub struct LikeResponse {
    pub recipe_id: RecipeId,
    pub liked: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryResponse {
    pub id: i64,
    pub name: String,
}

impl From<Recipe> for RecipeResponse {
    fn from(recipe: Recipe) -> Self {
        Self {
            category_name: recipe.category.map(|c| c.category_name),
            id: recipe.id,
            title: recipe.title,
            servings: recipe.servings,
            total_time_minutes: recipe.total_time_minutes,
            steps_description: recipe.steps_description,
            image_url: recipe.image_url,
            time_of_creation: recipe.time_of_creation,
            users_id: recipe.users_id,
            ingredient_text: recipe.ingredient_text,
            author_username: recipe.author_username,
        }
    }
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.category_name,
        }
    }
}
