use axum::{
    extract::{Path, State},
    Extension, Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::user::{FollowResponse, FollowerResponse};
use crate::{
    domain::feed::{FeedService, FeedServiceApi},
    domain::session::Session,
    error::AppResult,
};

pub struct UserController {
    feed_service: Arc<FeedService>,
}

impl UserController {
    pub fn new(feed_service: Arc<FeedService>) -> Self {
        Self { feed_service }
    }

    /// POST /api/users/{userId}/follow - Follow a user
    pub async fn follow_user(
        State(controller): State<Arc<UserController>>,
        Extension(session): Extension<Session>,
        Path(user_id): Path<Uuid>,
    ) -> AppResult<Json<FollowResponse>> {
        let response = controller
            .feed_service
            .set_following(&session, user_id, true)
            .await?;
        Ok(Json(response))
    }

    /// DELETE /api/users/{userId}/follow - Stop following a user
    pub async fn unfollow_user(
        State(controller): State<Arc<UserController>>,
        Extension(session): Extension<Session>,
        Path(user_id): Path<Uuid>,
    ) -> AppResult<Json<FollowResponse>> {
        let response = controller
            .feed_service
            .set_following(&session, user_id, false)
            .await?;
        Ok(Json(response))
    }

    /// GET /api/users/{userId}/followers
    pub async fn list_followers(
        State(controller): State<Arc<UserController>>,
        Path(user_id): Path<Uuid>,
    ) -> AppResult<Json<Vec<FollowerResponse>>> {
        let followers = controller.feed_service.get_followers(user_id).await?;
        Ok(Json(followers))
    }
}
