pub mod dto;
pub mod error;
pub mod filter;
pub mod provider;
pub mod relations;
pub mod selector;
pub mod service;
pub mod state;
pub mod view;

#[cfg(test)]
pub(crate) mod test_support;

pub use dto::{DeleteRecipeResponse, FeedQuery, FeedResponse, RecipeCardResponse};
pub use error::FeedServiceError;
pub use filter::{filter_recipes, FilterCriteria, RelationFacet};
pub use provider::DataProvider;
pub use relations::{RelationData, RelationLoader, RelationOutcome, RelationTicket};
pub use selector::{CategorySelector, Selector, UserRelationSelector};
pub use service::{FeedService, FeedServiceApi};
pub use state::FeedState;
pub use view::{
    DeleteOutcome, FeedOptions, FeedRender, FeedTimeouts, FollowOutcome, LikeOutcome, RecipeCard,
    RecipeFeed,
};
