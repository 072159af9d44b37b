pub mod dto;
pub mod model;

pub use dto::{CategoryResponse, LikeResponse, RecipeResponse};
pub use model::{Category, Recipe, RecipeId, UserId};
