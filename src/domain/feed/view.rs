use super::error::FeedServiceError;
use super::filter::{filter_recipes, FilterCriteria, RelationFacet};
use super::provider::{with_timeout, DataProvider};
use super::relations::{load_relations, RelationData, RelationLoader, RelationOutcome};
use super::selector::{CategorySelector, UserRelationSelector};
use super::state::FeedState;
use crate::domain::recipe::{Recipe, RecipeId, UserId};
use crate::domain::session::SessionProvider;
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_MUTATION_TIMEOUT: Duration = Duration::from_secs(10);

/// Deadlines for provider calls: reads (snapshots, relations, lookups) and
/// mutations (delete, like, follow).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedTimeouts {
    pub fetch: Duration,
    pub mutation: Duration,
}

impl Default for FeedTimeouts {
    fn default() -> Self {
        Self {
            fetch: DEFAULT_FETCH_TIMEOUT,
            mutation: DEFAULT_MUTATION_TIMEOUT,
        }
    }
}

/// Everything a feed view is created from.
#[derive(Debug, Clone, Default)]
pub struct FeedOptions {
    pub recipes: Option<Vec<Recipe>>,
    pub liked_recipe_ids: HashSet<RecipeId>,
    pub viewer_id: Option<UserId>,
    pub is_logged_in: bool,
    /// Whether the relation selector is offered at all.
    pub show_user_filter: bool,
    /// The listed recipes belong to the viewer and can be managed.
    pub is_user_recipe: bool,
    /// The feed is rendered on an author's own page.
    pub is_user_page: bool,
    /// Author whose page this is, when the feed lists a single author.
    pub page_owner: Option<UserId>,
}

impl FeedOptions {
    pub fn for_session(
        session: &dyn SessionProvider,
        recipes: Option<Vec<Recipe>>,
        liked_recipe_ids: HashSet<RecipeId>,
    ) -> Self {
        let is_logged_in = session.is_logged_in();
        Self {
            recipes,
            liked_recipe_ids,
            viewer_id: session.current_viewer_id(),
            is_logged_in,
            show_user_filter: is_logged_in,
            is_user_recipe: false,
            is_user_page: false,
            page_owner: None,
        }
    }

    /// Options for one author's page. The cards are manageable and the
    /// relation selector hidden when the viewer is that author.
    pub fn for_user_page(
        session: &dyn SessionProvider,
        owner_id: UserId,
        recipes: Option<Vec<Recipe>>,
        liked_recipe_ids: HashSet<RecipeId>,
    ) -> Self {
        let mut options = Self::for_session(session, recipes, liked_recipe_ids);
        let is_own = options.viewer_id == Some(owner_id);
        options.page_owner = Some(owner_id);
        options.is_user_recipe = is_own;
        options.is_user_page = true;
        options.show_user_filter = options.is_logged_in && !is_own;
        options
    }
}

/// One rendered entry with the viewer-specific overlays resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeCard {
    pub recipe: Recipe,
    pub is_liked: bool,
    pub can_like: bool,
    pub can_manage: bool,
    pub show_author: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FeedRender {
    Recipes(Vec<RecipeCard>),
    NoMatches,
}

impl FeedRender {
    pub fn is_no_matches(&self) -> bool {
        matches!(self, FeedRender::NoMatches)
    }

    pub fn cards(&self) -> &[RecipeCard] {
        match self {
            FeedRender::Recipes(cards) => cards,
            FeedRender::NoMatches => &[],
        }
    }

    pub fn into_cards(self) -> Vec<RecipeCard> {
        match self {
            FeedRender::Recipes(cards) => cards,
            FeedRender::NoMatches => Vec::new(),
        }
    }
}

#[derive(Debug)]
pub struct DeleteOutcome {
    pub recipe_id: RecipeId,
    pub result: Result<(), FeedServiceError>,
}

/// Result of a like or unlike issued for `viewer_id`.
#[derive(Debug)]
pub struct LikeOutcome {
    pub viewer_id: Option<UserId>,
    pub recipe_id: RecipeId,
    pub liked: bool,
    pub result: Result<(), FeedServiceError>,
}

/// Result of a follow or unfollow issued for `viewer_id`.
#[derive(Debug)]
pub struct FollowOutcome {
    pub viewer_id: Option<UserId>,
    pub user_id: UserId,
    pub following: bool,
    pub result: Result<(), FeedServiceError>,
}

/// Client-side state of one recipe feed.
///
/// Network work is handed out as owned futures (`begin_mount`,
/// `begin_delete`, `begin_like`, `begin_follow`) so completions can
/// interleave; their results are folded back in with the matching `apply_*`
/// in arrival order.
pub struct RecipeFeed {
    provider: Arc<dyn DataProvider>,
    timeouts: FeedTimeouts,
    state: FeedState,
    relations: RelationData,
    loader: RelationLoader,
    liked_recipe_ids: HashSet<RecipeId>,
    criteria: FilterCriteria,
    category_selector: CategorySelector,
    relation_selector: UserRelationSelector,
    viewer_id: Option<UserId>,
    is_logged_in: bool,
    show_user_filter: bool,
    is_user_recipe: bool,
    is_user_page: bool,
    page_owner: Option<UserId>,
}

impl RecipeFeed {
    pub fn new(provider: Arc<dyn DataProvider>, options: FeedOptions, timeouts: FeedTimeouts) -> Self {
        Self {
            provider,
            timeouts,
            state: FeedState::new(options.recipes),
            relations: RelationData::default(),
            loader: RelationLoader::default(),
            liked_recipe_ids: options.liked_recipe_ids,
            criteria: FilterCriteria::default(),
            category_selector: CategorySelector::new(),
            relation_selector: UserRelationSelector::new(),
            viewer_id: options.viewer_id,
            is_logged_in: options.is_logged_in,
            show_user_filter: options.show_user_filter,
            is_user_recipe: options.is_user_recipe,
            is_user_page: options.is_user_page,
            page_owner: options.page_owner,
        }
    }

    /// Issues the relation fetch for the current viewer.
    pub fn begin_mount(&mut self) -> impl Future<Output = RelationOutcome> + Send + 'static {
        let ticket = self.loader.issue(self.viewer_id);
        load_relations(self.provider.clone(), ticket, self.timeouts.fetch)
    }

    pub async fn mount(&mut self) {
        let outcome = self.begin_mount().await;
        self.apply_relations(outcome);
    }

    /// Switches the viewer. Every viewer-bound field is replaced from the new
    /// session and `liked_recipe_ids`, and the returned refetch must run;
    /// results of earlier fetches are discarded from now on. Returns `None`
    /// when the identity did not change.
    pub fn set_viewer(
        &mut self,
        session: &dyn SessionProvider,
        liked_recipe_ids: HashSet<RecipeId>,
    ) -> Option<impl Future<Output = RelationOutcome> + Send + 'static> {
        let viewer_id = session.current_viewer_id();
        if self.viewer_id == viewer_id {
            return None;
        }
        tracing::debug!(
            previous = ?self.viewer_id,
            current = ?viewer_id,
            "Feed viewer changed, reloading relations"
        );

        self.viewer_id = viewer_id;
        self.is_logged_in = session.is_logged_in();
        self.liked_recipe_ids = liked_recipe_ids;
        if let Some(owner) = self.page_owner {
            self.is_user_recipe = viewer_id == Some(owner);
        }
        self.show_user_filter = self.is_logged_in && !self.is_user_recipe;
        self.relations.followed.clear();

        // A hidden relation selector cannot keep restricting the feed.
        if !self.show_user_filter {
            let selected = self.relation_selector.clear().clone();
            self.on_user_filter_change(selected);
        }

        Some(self.begin_mount())
    }

    pub fn unmount(&mut self) {
        self.loader.unmount();
    }

    /// Applies a finished relation fetch unless it is stale.
    pub fn apply_relations(&mut self, outcome: RelationOutcome) -> bool {
        if !self.loader.is_current(&outcome.ticket) {
            tracing::debug!(
                viewer_id = ?outcome.ticket.viewer_id(),
                "Discarding stale relation result"
            );
            return false;
        }
        self.relations = outcome.data;
        true
    }

    pub fn on_category_filter_change(&mut self, selected: BTreeSet<String>) {
        self.criteria.categories = selected;
    }

    pub fn on_user_filter_change(&mut self, selected: BTreeSet<RelationFacet>) {
        self.criteria.facets = selected;
    }

    pub fn toggle_category(&mut self, name: impl Into<String>, checked: bool) {
        let selected = self.category_selector.toggle(name.into(), checked).clone();
        self.on_category_filter_change(selected);
    }

    pub fn toggle_relation(&mut self, facet: RelationFacet, checked: bool) {
        let selected = self.relation_selector.toggle(facet, checked).clone();
        self.on_user_filter_change(selected);
    }

    /// Issues a delete without touching local state.
    pub fn begin_delete(
        &self,
        recipe_id: RecipeId,
    ) -> impl Future<Output = DeleteOutcome> + Send + 'static {
        let provider = self.provider.clone();
        let timeout = self.timeouts.mutation;
        async move {
            let result =
                match with_timeout("delete recipe", timeout, provider.delete_recipe(recipe_id)).await {
                    Ok(true) => Ok(()),
                    Ok(false) => Err(FeedServiceError::NotFound),
                    Err(e) => Err(e),
                };
            DeleteOutcome { recipe_id, result }
        }
    }

    /// Removes the recipe once its delete is confirmed; a failure leaves the
    /// feed untouched and is handed back to the caller.
    pub fn apply_delete(&mut self, outcome: DeleteOutcome) -> Result<(), FeedServiceError> {
        match outcome.result {
            Ok(()) => {
                self.state.remove(outcome.recipe_id);
                tracing::info!(recipe_id = outcome.recipe_id, "Recipe deleted");
                Ok(())
            }
            Err(e) => {
                tracing::error!(
                    recipe_id = outcome.recipe_id,
                    error = %e,
                    "Failed to delete recipe"
                );
                Err(e)
            }
        }
    }

    pub async fn request_delete(&mut self, recipe_id: RecipeId) -> Result<(), FeedServiceError> {
        let outcome = self.begin_delete(recipe_id).await;
        self.apply_delete(outcome)
    }

    /// Issues a like (`liked = true`) or unlike for the current viewer.
    pub fn begin_like(
        &self,
        recipe_id: RecipeId,
        liked: bool,
    ) -> impl Future<Output = LikeOutcome> + Send + 'static {
        let provider = self.provider.clone();
        let timeout = self.timeouts.mutation;
        let viewer_id = self.viewer_id;
        async move {
            let result = match viewer_id {
                None => Err(FeedServiceError::Unauthorized),
                Some(viewer) if liked => {
                    with_timeout("like recipe", timeout, provider.like_recipe(viewer, recipe_id)).await
                }
                Some(viewer) => {
                    with_timeout(
                        "unlike recipe",
                        timeout,
                        provider.unlike_recipe(viewer, recipe_id),
                    )
                    .await
                }
            };
            LikeOutcome {
                viewer_id,
                recipe_id,
                liked,
                result,
            }
        }
    }

    /// Folds a confirmed like into the liked set. A result issued for a
    /// previous viewer is dropped.
    pub fn apply_like(&mut self, outcome: LikeOutcome) -> Result<(), FeedServiceError> {
        outcome.result?;
        if outcome.viewer_id != self.viewer_id {
            tracing::debug!(recipe_id = outcome.recipe_id, "Discarding like for previous viewer");
            return Ok(());
        }
        if outcome.liked {
            self.liked_recipe_ids.insert(outcome.recipe_id);
        } else {
            self.liked_recipe_ids.remove(&outcome.recipe_id);
        }
        Ok(())
    }

    pub async fn request_like(
        &mut self,
        recipe_id: RecipeId,
        liked: bool,
    ) -> Result<(), FeedServiceError> {
        let outcome = self.begin_like(recipe_id, liked).await;
        self.apply_like(outcome)
    }

    /// Issues a follow (`following = true`) or unfollow of `user_id`.
    pub fn begin_follow(
        &self,
        user_id: UserId,
        following: bool,
    ) -> impl Future<Output = FollowOutcome> + Send + 'static {
        let provider = self.provider.clone();
        let timeout = self.timeouts.mutation;
        let viewer_id = self.viewer_id;
        async move {
            let result = match viewer_id {
                None => Err(FeedServiceError::Unauthorized),
                Some(viewer) if viewer == user_id => Err(FeedServiceError::Invalid(
                    "cannot follow yourself".to_string(),
                )),
                Some(viewer) if following => {
                    with_timeout("follow user", timeout, provider.follow_user(viewer, user_id)).await
                }
                Some(viewer) => {
                    with_timeout(
                        "unfollow user",
                        timeout,
                        provider.unfollow_user(viewer, user_id),
                    )
                    .await
                }
            };
            FollowOutcome {
                viewer_id,
                user_id,
                following,
                result,
            }
        }
    }

    pub fn apply_follow(&mut self, outcome: FollowOutcome) -> Result<(), FeedServiceError> {
        outcome.result?;
        if outcome.viewer_id != self.viewer_id {
            return Ok(());
        }
        if outcome.following {
            self.relations.followed.insert(outcome.user_id);
        } else {
            self.relations.followed.remove(&outcome.user_id);
        }
        Ok(())
    }

    pub async fn request_follow(
        &mut self,
        user_id: UserId,
        following: bool,
    ) -> Result<(), FeedServiceError> {
        let outcome = self.begin_follow(user_id, following).await;
        self.apply_follow(outcome)
    }

    pub fn visible_recipes(&self) -> Vec<Recipe> {
        filter_recipes(
            self.state.recipes(),
            &self.criteria,
            &self.liked_recipe_ids,
            &self.relations.followed,
        )
    }

    pub fn render(&self) -> FeedRender {
        let cards: Vec<RecipeCard> = self
            .visible_recipes()
            .into_iter()
            .map(|recipe| RecipeCard {
                is_liked: self.liked_recipe_ids.contains(&recipe.id),
                can_like: self.is_logged_in && !self.is_user_recipe,
                can_manage: self.is_logged_in && self.is_user_recipe,
                show_author: !self.is_user_page,
                recipe,
            })
            .collect();

        if cards.is_empty() {
            FeedRender::NoMatches
        } else {
            FeedRender::Recipes(cards)
        }
    }

    pub fn state(&self) -> &FeedState {
        &self.state
    }

    pub fn relations(&self) -> &RelationData {
        &self.relations
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn liked_recipe_ids(&self) -> &HashSet<RecipeId> {
        &self.liked_recipe_ids
    }

    pub fn viewer_id(&self) -> Option<UserId> {
        self.viewer_id
    }

    pub fn show_user_filter(&self) -> bool {
        self.show_user_filter
    }
}
