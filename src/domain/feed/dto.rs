use super::filter::RelationFacet;
use super::view::{FeedRender, RecipeCard, RecipeFeed};
use crate::domain::recipe::{RecipeId, RecipeResponse};
use serde::{Deserialize, Serialize};

/// Query string of the feed endpoints: comma separated selections.
#[derive(Debug, Default, Deserialize)]
pub struct FeedQuery {
    pub categories: Option<String>,
    pub facets: Option<String>,
}

impl FeedQuery {
    pub fn category_tokens(&self) -> Vec<String> {
        split_tokens(self.categories.as_deref())
    }

    pub fn facet_tokens(&self) -> Vec<String> {
        split_tokens(self.facets.as_deref())
    }
}

fn split_tokens(raw: Option<&str>) -> Vec<String> {
    raw.map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecipeCardResponse {
    #[serde(flatten)]
    pub recipe: RecipeResponse,
    pub is_liked: bool,
    pub can_like: bool,
    pub can_manage: bool,
    pub show_author: bool,
}

impl From<RecipeCard> for RecipeCardResponse {
    fn from(card: RecipeCard) -> Self {
        Self {
            recipe: RecipeResponse::from(card.recipe),
            is_liked: card.is_liked,
            can_like: card.can_like,
            can_manage: card.can_manage,
            show_author: card.show_author,
        }
    }
}

/// Response for feed endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct FeedResponse {
    pub categories: Vec<String>,
    pub selected_categories: Vec<String>,
    pub selected_facets: Vec<RelationFacet>,
    pub show_user_filter: bool,
    pub no_matches: bool,
    pub recipes: Vec<RecipeCardResponse>,
}

/// Response for a delete: the viewer's recipes that remain.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteRecipeResponse {
    pub deleted_id: RecipeId,
    pub no_matches: bool,
    pub recipes: Vec<RecipeCardResponse>,
}

impl DeleteRecipeResponse {
    pub fn new(deleted_id: RecipeId, feed: &RecipeFeed) -> Self {
        let render = feed.render();
        Self {
            deleted_id,
            no_matches: render.is_no_matches(),
            recipes: card_responses(render),
        }
    }
}

fn card_responses(render: FeedRender) -> Vec<RecipeCardResponse> {
    render
        .into_cards()
        .into_iter()
        .map(RecipeCardResponse::from)
        .collect()
}

impl From<&RecipeFeed> for FeedResponse {
    fn from(feed: &RecipeFeed) -> Self {
        let render = feed.render();
        let no_matches = render.is_no_matches();
        let recipes = card_responses(render);

        Self {
            categories: feed.relations().categories.clone(),
            selected_categories: feed.criteria().categories.iter().cloned().collect(),
            selected_facets: feed.criteria().facets.iter().copied().collect(),
            show_user_filter: feed.show_user_filter(),
            no_matches,
            recipes,
        }
    }
}
