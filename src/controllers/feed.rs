use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::feed::{FeedQuery, FeedResponse};
use crate::{
    domain::feed::{FeedService, FeedServiceApi},
    domain::session::Session,
    error::AppResult,
};

pub struct FeedController {
    feed_service: Arc<FeedService>,
}

impl FeedController {
    pub fn new(feed_service: Arc<FeedService>) -> Self {
        Self { feed_service }
    }

    /// GET /api/recipes - Public recipe feed
    pub async fn get_feed(
        State(controller): State<Arc<FeedController>>,
        Extension(session): Extension<Session>,
        Query(query): Query<FeedQuery>,
    ) -> AppResult<Json<FeedResponse>> {
        let feed = controller.feed_service.get_feed(&session, query).await?;
        Ok(Json(feed))
    }

    /// GET /api/users/{userId}/recipes - One author's recipes
    pub async fn get_user_feed(
        State(controller): State<Arc<FeedController>>,
        Extension(session): Extension<Session>,
        Path(user_id): Path<Uuid>,
        Query(query): Query<FeedQuery>,
    ) -> AppResult<Json<FeedResponse>> {
        let feed = controller
            .feed_service
            .get_user_feed(&session, user_id, query)
            .await?;
        Ok(Json(feed))
    }
}
