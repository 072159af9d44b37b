use super::provider::{with_timeout, DataProvider};
use crate::domain::recipe::UserId;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

/// Auxiliary sets loaded alongside a feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationData {
    pub categories: Vec<String>,
    pub followed: HashSet<UserId>,
}

/// Identifies one relation fetch: the generation it was issued in and the
/// viewer it was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationTicket {
    generation: u64,
    viewer_id: Option<UserId>,
}

impl RelationTicket {
    pub fn viewer_id(&self) -> Option<UserId> {
        self.viewer_id
    }
}

#[derive(Debug)]
pub struct RelationOutcome {
    pub ticket: RelationTicket,
    pub data: RelationData,
}

/// Generation counter deciding whether a completed fetch may still be applied.
#[derive(Debug, Default)]
pub struct RelationLoader {
    generation: u64,
    mounted: bool,
}

impl RelationLoader {
    /// Starts a new generation; every earlier ticket becomes stale.
    pub fn issue(&mut self, viewer_id: Option<UserId>) -> RelationTicket {
        self.generation += 1;
        self.mounted = true;
        RelationTicket {
            generation: self.generation,
            viewer_id,
        }
    }

    pub fn unmount(&mut self) {
        self.generation += 1;
        self.mounted = false;
    }

    pub fn is_current(&self, ticket: &RelationTicket) -> bool {
        self.mounted && ticket.generation == self.generation
    }
}

/// Fetches categories and followed ids concurrently.
///
/// Never fails: each half that errors or times out resolves to an empty set
/// on its own and is logged.
pub async fn load_relations(
    provider: Arc<dyn DataProvider>,
    ticket: RelationTicket,
    timeout: Duration,
) -> RelationOutcome {
    let categories = async {
        match with_timeout("fetch categories", timeout, provider.fetch_categories()).await {
            Ok(categories) => categories.into_iter().map(|c| c.category_name).collect(),
            Err(e) => {
                tracing::warn!(error = %e, "Category fetch failed, continuing without categories");
                Vec::new()
            }
        }
    };

    let followed = async {
        let Some(viewer_id) = ticket.viewer_id else {
            return HashSet::new();
        };
        match with_timeout(
            "fetch followed users",
            timeout,
            provider.fetch_followed_user_ids(viewer_id),
        )
        .await
        {
            Ok(ids) => ids.into_iter().collect(),
            Err(e) => {
                tracing::warn!(
                    viewer_id = %viewer_id,
                    error = %e,
                    "Followed users fetch failed, continuing without followings"
                );
                HashSet::new()
            }
        }
    };

    let (categories, followed) = tokio::join!(categories, followed);

    RelationOutcome {
        ticket,
        data: RelationData {
            categories,
            followed,
        },
    }
}
