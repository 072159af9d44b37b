use axum::{
    extract::{Path, State},
    Extension, Json,
};
use std::sync::Arc;

use crate::domain::feed::DeleteRecipeResponse;
use crate::domain::recipe::{LikeResponse, RecipeId, RecipeResponse};
use crate::{
    domain::feed::{FeedService, FeedServiceApi},
    domain::session::Session,
    error::AppResult,
};

pub struct RecipeController {
    feed_service: Arc<FeedService>,
}

impl RecipeController {
    pub fn new(feed_service: Arc<FeedService>) -> Self {
        Self { feed_service }
    }

    /// GET /api/recipes/{recipeId} - Single recipe
    pub async fn get_recipe(
        State(controller): State<Arc<RecipeController>>,
        Path(recipe_id): Path<RecipeId>,
    ) -> AppResult<Json<RecipeResponse>> {
        let recipe = controller.feed_service.get_recipe(recipe_id).await?;
        Ok(Json(recipe))
    }

    /// DELETE /api/recipes/{recipeId} - Delete own recipe
    pub async fn delete_recipe(
        State(controller): State<Arc<RecipeController>>,
        Extension(session): Extension<Session>,
        Path(recipe_id): Path<RecipeId>,
    ) -> AppResult<Json<DeleteRecipeResponse>> {
        let response = controller
            .feed_service
            .delete_recipe(&session, recipe_id)
            .await?;
        Ok(Json(response))
    }

    /// POST /api/recipes/{recipeId}/like - Like a recipe
    pub async fn like_recipe(
        State(controller): State<Arc<RecipeController>>,
        Extension(session): Extension<Session>,
        Path(recipe_id): Path<RecipeId>,
    ) -> AppResult<Json<LikeResponse>> {
        let response = controller
            .feed_service
            .set_like(&session, recipe_id, true)
            .await?;
        Ok(Json(response))
    }

    /// DELETE /api/recipes/{recipeId}/like - Remove a like
    pub async fn unlike_recipe(
        State(controller): State<Arc<RecipeController>>,
        Extension(session): Extension<Session>,
        Path(recipe_id): Path<RecipeId>,
    ) -> AppResult<Json<LikeResponse>> {
        let response = controller
            .feed_service
            .set_like(&session, recipe_id, false)
            .await?;
        Ok(Json(response))
    }
}
