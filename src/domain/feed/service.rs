use super::dto::{DeleteRecipeResponse, FeedQuery, FeedResponse};
use super::error::FeedServiceError;
use super::filter::RelationFacet;
use super::provider::{with_timeout, DataProvider};
use super::view::{FeedOptions, FeedTimeouts, RecipeFeed};
use crate::domain::recipe::{
    CategoryResponse, LikeResponse, Recipe, RecipeId, RecipeResponse, UserId,
};
use crate::domain::session::SessionProvider;
use crate::domain::user::{FollowResponse, FollowerResponse};
use async_trait::async_trait;
use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;

pub struct FeedService {
    provider: Arc<dyn DataProvider>,
    timeouts: FeedTimeouts,
}

impl FeedService {
    pub fn new(provider: Arc<dyn DataProvider>, timeouts: FeedTimeouts) -> Self {
        Self { provider, timeouts }
    }
}

#[async_trait]
pub trait FeedServiceApi: Send + Sync {
    /// Public feed of every published recipe, filtered for the viewer.
    async fn get_feed(
        &self,
        session: &dyn SessionProvider,
        query: FeedQuery,
    ) -> Result<FeedResponse, FeedServiceError>;

    /// Recipes of one author. Manageable when the viewer is that author.
    async fn get_user_feed(
        &self,
        session: &dyn SessionProvider,
        owner_id: UserId,
        query: FeedQuery,
    ) -> Result<FeedResponse, FeedServiceError>;

    async fn get_recipe(&self, recipe_id: RecipeId) -> Result<RecipeResponse, FeedServiceError>;

    async fn get_categories(&self) -> Result<Vec<CategoryResponse>, FeedServiceError>;

    /// Deletes one of the viewer's own recipes and returns what is left of
    /// their recipes.
    async fn delete_recipe(
        &self,
        session: &dyn SessionProvider,
        recipe_id: RecipeId,
    ) -> Result<DeleteRecipeResponse, FeedServiceError>;

    async fn set_like(
        &self,
        session: &dyn SessionProvider,
        recipe_id: RecipeId,
        liked: bool,
    ) -> Result<LikeResponse, FeedServiceError>;

    async fn set_following(
        &self,
        session: &dyn SessionProvider,
        user_id: UserId,
        following: bool,
    ) -> Result<FollowResponse, FeedServiceError>;

    async fn get_followers(&self, user_id: UserId)
        -> Result<Vec<FollowerResponse>, FeedServiceError>;
}

#[async_trait]
impl FeedServiceApi for FeedService {
    async fn get_feed(
        &self,
        session: &dyn SessionProvider,
        query: FeedQuery,
    ) -> Result<FeedResponse, FeedServiceError> {
        let recipes = self
            .snapshot("fetch recipes", self.provider.fetch_recipes())
            .await;
        let liked = self.liked_ids(session).await;

        let options = FeedOptions::for_session(session, recipes, liked);
        let feed = self.open_feed(options, &query).await?;

        Ok(FeedResponse::from(&feed))
    }

    async fn get_user_feed(
        &self,
        session: &dyn SessionProvider,
        owner_id: UserId,
        query: FeedQuery,
    ) -> Result<FeedResponse, FeedServiceError> {
        let recipes = self
            .snapshot(
                "fetch user recipes",
                self.provider.fetch_user_recipes(owner_id),
            )
            .await;
        let liked = self.liked_ids(session).await;

        let options = FeedOptions::for_user_page(session, owner_id, recipes, liked);
        let feed = self.open_feed(options, &query).await?;

        Ok(FeedResponse::from(&feed))
    }

    async fn get_recipe(&self, recipe_id: RecipeId) -> Result<RecipeResponse, FeedServiceError> {
        let recipe = self.find_recipe(recipe_id).await?;
        Ok(RecipeResponse::from(recipe))
    }

    async fn get_categories(&self) -> Result<Vec<CategoryResponse>, FeedServiceError> {
        let categories = with_timeout(
            "fetch categories",
            self.timeouts.fetch,
            self.provider.fetch_categories(),
        )
        .await?;
        Ok(categories.into_iter().map(CategoryResponse::from).collect())
    }

    async fn delete_recipe(
        &self,
        session: &dyn SessionProvider,
        recipe_id: RecipeId,
    ) -> Result<DeleteRecipeResponse, FeedServiceError> {
        let viewer_id = session
            .current_viewer_id()
            .ok_or(FeedServiceError::Unauthorized)?;

        // Someone else's recipe is reported exactly like a missing one.
        let recipe = self.find_recipe(recipe_id).await?;
        if !recipe.is_owned_by(viewer_id) {
            return Err(FeedServiceError::NotFound);
        }

        let recipes = with_timeout(
            "fetch user recipes",
            self.timeouts.fetch,
            self.provider.fetch_user_recipes(viewer_id),
        )
        .await?;
        let liked = self.liked_ids(session).await;

        let options = FeedOptions::for_user_page(session, viewer_id, Some(recipes), liked);
        let mut feed = RecipeFeed::new(self.provider.clone(), options, self.timeouts);
        feed.request_delete(recipe_id).await?;

        Ok(DeleteRecipeResponse::new(recipe_id, &feed))
    }

    async fn set_like(
        &self,
        session: &dyn SessionProvider,
        recipe_id: RecipeId,
        liked: bool,
    ) -> Result<LikeResponse, FeedServiceError> {
        if !session.is_logged_in() {
            return Err(FeedServiceError::Unauthorized);
        }
        let recipe = self.find_recipe(recipe_id).await?;

        let options = FeedOptions::for_session(session, Some(vec![recipe]), HashSet::new());
        let mut feed = RecipeFeed::new(self.provider.clone(), options, self.timeouts);
        feed.request_like(recipe_id, liked).await?;

        tracing::info!(recipe_id, liked, "Recipe like updated");

        Ok(LikeResponse {
            recipe_id,
            liked: feed.liked_recipe_ids().contains(&recipe_id),
        })
    }

    async fn set_following(
        &self,
        session: &dyn SessionProvider,
        user_id: UserId,
        following: bool,
    ) -> Result<FollowResponse, FeedServiceError> {
        if !session.is_logged_in() {
            return Err(FeedServiceError::Unauthorized);
        }

        let options = FeedOptions::for_session(session, None, HashSet::new());
        let mut feed = RecipeFeed::new(self.provider.clone(), options, self.timeouts);
        feed.request_follow(user_id, following).await?;

        tracing::info!(user_id = %user_id, following, "Following updated");

        Ok(FollowResponse {
            user_id,
            following: feed.relations().followed.contains(&user_id),
        })
    }

    async fn get_followers(
        &self,
        user_id: UserId,
    ) -> Result<Vec<FollowerResponse>, FeedServiceError> {
        let followers = with_timeout(
            "fetch followers",
            self.timeouts.fetch,
            self.provider.fetch_followers(user_id),
        )
        .await?;
        Ok(followers.into_iter().map(FollowerResponse::from).collect())
    }
}

impl FeedService {
    /// Initial snapshot. A failed or timed out fetch leaves the feed without a
    /// collection, which renders as "no matches".
    async fn snapshot<F>(&self, operation: &'static str, fetch: F) -> Option<Vec<Recipe>>
    where
        F: Future<Output = Result<Vec<Recipe>, FeedServiceError>> + Send,
    {
        match with_timeout(operation, self.timeouts.fetch, fetch).await {
            Ok(recipes) => Some(recipes),
            Err(e) => {
                tracing::warn!(error = %e, "Recipe fetch failed, rendering empty feed");
                None
            }
        }
    }

    async fn liked_ids(&self, session: &dyn SessionProvider) -> HashSet<RecipeId> {
        let Some(viewer_id) = session.current_viewer_id() else {
            return HashSet::new();
        };
        match with_timeout(
            "fetch liked recipes",
            self.timeouts.fetch,
            self.provider.fetch_liked_recipe_ids(viewer_id),
        )
        .await
        {
            Ok(ids) => ids.into_iter().collect(),
            Err(e) => {
                tracing::warn!(viewer_id = %viewer_id, error = %e, "Liked recipes fetch failed");
                HashSet::new()
            }
        }
    }

    /// Builds a mounted feed and applies the query's selections.
    async fn open_feed(
        &self,
        options: FeedOptions,
        query: &FeedQuery,
    ) -> Result<RecipeFeed, FeedServiceError> {
        let facets = query
            .facet_tokens()
            .iter()
            .map(|token| token.parse::<RelationFacet>())
            .collect::<Result<Vec<_>, _>>()?;

        if !facets.is_empty() && !options.show_user_filter {
            return Err(FeedServiceError::Unauthorized);
        }

        let mut feed = RecipeFeed::new(self.provider.clone(), options, self.timeouts);
        feed.mount().await;

        for category in query.category_tokens() {
            feed.toggle_category(category, true);
        }
        for facet in facets {
            feed.toggle_relation(facet, true);
        }

        tracing::debug!(
            criteria = ?feed.criteria(),
            total = feed.state().len(),
            "Feed opened"
        );

        Ok(feed)
    }

    /// Only a missing row is `NotFound`; provider failures propagate.
    async fn find_recipe(&self, recipe_id: RecipeId) -> Result<Recipe, FeedServiceError> {
        with_timeout(
            "find recipe",
            self.timeouts.fetch,
            self.provider.find_recipe(recipe_id),
        )
        .await?
        .ok_or(FeedServiceError::NotFound)
    }
}
