use crate::core::category::{Category, FALLBACK_CATEGORY, default_categories};

/// The fixed category set. Categories are seeded once at startup and never
/// destroyed; rename and recolor are the only mutations.
#[derive(Debug, Clone)]
pub struct CategoryStore {
    categories: Vec<Category>,
}

impl Default for CategoryStore {
    fn default() -> Self {
        Self {
            categories: default_categories(),
        }
    }
}

impl CategoryStore {
    /// Install a persisted set; an empty list falls back to the seed so
    /// `find` always has somewhere to land.
    pub fn new(categories: Vec<Category>) -> Self {
        if categories.is_empty() {
            Self::default()
        } else {
            Self { categories }
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn rename(&mut self, id: &str, name: &str) -> bool {
        match self.get_mut(id) {
            Some(category) => {
                category.name = name.to_string();
                true
            }
            None => false,
        }
    }

    pub fn recolor(&mut self, id: &str, color: &str) -> bool {
        match self.get_mut(id) {
            Some(category) => {
                category.color = color.to_string();
                true
            }
            None => false,
        }
    }

    /// Display lookup. Unknown ids resolve to the fallback category, and
    /// to the first entry should the fallback itself be missing, so an
    /// orphaned task never crashes rendering.
    pub fn find(&self, id: &str) -> &Category {
        self.categories
            .iter()
            .find(|c| c.id == id)
            .or_else(|| self.categories.iter().find(|c| c.id == FALLBACK_CATEGORY))
            .unwrap_or(&self.categories[0])
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut Category> {
        self.categories.iter_mut().find(|c| c.id == id)
    }
}
