use crate::domain::recipe::UserId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One entry of a user's followers list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Follower {
    pub follower_id: UserId,
    pub username: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FollowerResponse {
    pub id: UserId,
    pub username: Option<String>,
}

impl From<Follower> for FollowerResponse {
    fn from(follower: Follower) -> Self {
        Self {
            id: follower.follower_id,
            username: follower.username,
        }
    }
}

/// Response for follow and unfollow
#[derive(Debug, Serialize, Deserialize)]
pub struct FollowResponse {
    pub user_id: UserId,
    pub following: bool,
}
