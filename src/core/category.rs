use serde::{Deserialize, Serialize};

/// Category id that orphaned or unknown task categories resolve to.
pub const FALLBACK_CATEGORY: &str = "other";

/// A named, colored grouping for tasks. The id is stable for the process
/// lifetime; only name and color mutate after startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    /// Base color as hex RGB. Display variants are derived by the
    /// rendering layer, not stored.
    pub color: String,
}

impl Category {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: color.into(),
        }
    }
}

/// The fixed seed set, in definition order. Grouping and rendering follow
/// this order.
pub fn default_categories() -> Vec<Category> {
    vec![
        Category::new("work", "仕事", "#5B8FA3"),
        Category::new("home", "家のこと", "#7BA883"),
        Category::new("personal", "自分のこと", "#9B7BA8"),
        Category::new("other", "その他", "#B8B8B8"),
    ]
}
