use crate::domain::recipe::{Recipe, RecipeId};

/// In-memory recipe collection backing one feed view.
///
/// Seeded once from a snapshot; the only mutation is removal of a recipe
/// whose delete was confirmed. `None` marks an absent snapshot.
#[derive(Debug, Clone, Default)]
pub struct FeedState {
    recipes: Option<Vec<Recipe>>,
}

impl FeedState {
    pub fn new(snapshot: Option<Vec<Recipe>>) -> Self {
        Self { recipes: snapshot }
    }

    pub fn recipes(&self) -> Option<&[Recipe]> {
        self.recipes.as_deref()
    }

    pub fn len(&self) -> usize {
        self.recipes.as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, recipe_id: RecipeId) -> bool {
        self.recipes
            .as_ref()
            .is_some_and(|recipes| recipes.iter().any(|r| r.id == recipe_id))
    }

    /// Removes the recipe with exactly this id. Returns whether one was found.
    pub fn remove(&mut self, recipe_id: RecipeId) -> bool {
        let Some(recipes) = self.recipes.as_mut() else {
            return false;
        };
        match recipes.iter().position(|r| r.id == recipe_id) {
            Some(index) => {
                recipes.remove(index);
                true
            }
            None => false,
        }
    }
}
