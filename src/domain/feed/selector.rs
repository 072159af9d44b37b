use super::filter::RelationFacet;
use std::collections::BTreeSet;
use std::fmt;

pub type SelectionCallback<T> = Box<dyn FnMut(&BTreeSet<T>) + Send>;

/// Local set of chosen tokens. Every toggle notifies the registered callback
/// with the full selection, even when the toggle changed nothing.
pub struct Selector<T> {
    selected: BTreeSet<T>,
    on_change: Option<SelectionCallback<T>>,
}

pub type CategorySelector = Selector<String>;
pub type UserRelationSelector = Selector<RelationFacet>;

impl<T: Ord + fmt::Debug> Selector<T> {
    pub fn new() -> Self {
        Self {
            selected: BTreeSet::new(),
            on_change: None,
        }
    }

    pub fn with_callback(callback: impl FnMut(&BTreeSet<T>) + Send + 'static) -> Self {
        Self {
            selected: BTreeSet::new(),
            on_change: Some(Box::new(callback)),
        }
    }

    pub fn toggle(&mut self, token: T, checked: bool) -> &BTreeSet<T> {
        if checked {
            self.selected.insert(token);
        } else {
            self.selected.remove(&token);
        }

        self.notify()
    }

    /// Drops every selected token and notifies the callback.
    pub fn clear(&mut self) -> &BTreeSet<T> {
        self.selected.clear();
        self.notify()
    }

    fn notify(&mut self) -> &BTreeSet<T> {
        tracing::debug!(selected = ?self.selected, "Selection changed");

        if let Some(callback) = self.on_change.as_mut() {
            callback(&self.selected);
        }
        &self.selected
    }

    pub fn selected(&self) -> &BTreeSet<T> {
        &self.selected
    }
}

impl<T: Ord + fmt::Debug> Default for Selector<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Selector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Selector")
            .field("selected", &self.selected)
            .field("has_callback", &self.on_change.is_some())
            .finish()
    }
}
