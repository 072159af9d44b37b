use super::error::FeedServiceError;
use crate::domain::recipe::{Recipe, RecipeId, UserId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::str::FromStr;

/// Viewer-relative filter option. Selected facets are OR-combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationFacet {
    Liked,
    Followed,
}

impl RelationFacet {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationFacet::Liked => "liked",
            RelationFacet::Followed => "followed",
        }
    }
}

impl fmt::Display for RelationFacet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationFacet {
    type Err = FeedServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "liked" => Ok(RelationFacet::Liked),
            "followed" => Ok(RelationFacet::Followed),
            other => Err(FeedServiceError::Invalid(format!(
                "unknown relation filter '{}'",
                other
            ))),
        }
    }
}

/// The two independent filter dimensions. An empty set means no restriction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub categories: BTreeSet<String>,
    pub facets: BTreeSet<RelationFacet>,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.facets.is_empty()
    }

    fn matches_category(&self, recipe: &Recipe) -> bool {
        if self.categories.is_empty() {
            return true;
        }
        recipe
            .category_name()
            .is_some_and(|name| self.categories.contains(name))
    }

    fn matches_relation(
        &self,
        recipe: &Recipe,
        liked: &HashSet<RecipeId>,
        followed: &HashSet<UserId>,
    ) -> bool {
        if self.facets.is_empty() {
            return true;
        }
        self.facets.iter().any(|facet| match facet {
            RelationFacet::Liked => liked.contains(&recipe.id),
            RelationFacet::Followed => followed.contains(&recipe.users_id),
        })
    }

    pub fn matches(
        &self,
        recipe: &Recipe,
        liked: &HashSet<RecipeId>,
        followed: &HashSet<UserId>,
    ) -> bool {
        self.matches_category(recipe) && self.matches_relation(recipe, liked, followed)
    }
}

/// Derives the displayed subsequence of `recipes`.
///
/// Pure: the output keeps the input order and never repeats an entry. An
/// absent collection yields an empty result rather than an error.
pub fn filter_recipes(
    recipes: Option<&[Recipe]>,
    criteria: &FilterCriteria,
    liked: &HashSet<RecipeId>,
    followed: &HashSet<UserId>,
) -> Vec<Recipe> {
    let Some(recipes) = recipes else {
        return Vec::new();
    };

    recipes
        .iter()
        .filter(|recipe| criteria.matches(recipe, liked, followed))
        .cloned()
        .collect()
}
