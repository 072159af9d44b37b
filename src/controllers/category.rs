use axum::{extract::State, Json};
use std::sync::Arc;

use crate::domain::feed::{FeedService, FeedServiceApi};
use crate::domain::recipe::CategoryResponse;
use crate::error::AppResult;

pub struct CategoryController {
    feed_service: Arc<FeedService>,
}

impl CategoryController {
    pub fn new(feed_service: Arc<FeedService>) -> Self {
        Self { feed_service }
    }

    /// GET /api/categories - All recipe categories
    pub async fn list_categories(
        State(controller): State<Arc<CategoryController>>,
    ) -> AppResult<Json<Vec<CategoryResponse>>> {
        let categories = controller.feed_service.get_categories().await?;
        Ok(Json(categories))
    }
}
