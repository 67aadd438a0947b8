pub mod categories;
pub mod tasks;

pub use categories::CategoryStore;
pub use tasks::TaskStore;
