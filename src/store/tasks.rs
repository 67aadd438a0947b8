use uuid::Uuid;

use crate::core::category::Category;
use crate::core::task::{Task, TimingFilter};

/// Ordered task collection. Every mutator tolerates an unknown id as a
/// safe no-op and reports whether anything changed, so the controller can
/// skip persistence and refresh signaling when nothing happened.
/// Concurrent UI surfaces firing at a task that just left the store must
/// never crash it.
#[derive(Debug, Clone, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

impl TaskStore {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    fn get_mut(&mut self, id: Uuid) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// Discard current contents and install a new ordered sequence.
    /// Used after extraction.
    pub fn replace_all(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
    }

    /// Append an empty task under the given category and return its id.
    /// The caller signals begin-edit for it.
    pub fn add(&mut self, category: impl Into<String>) -> Uuid {
        let task = Task::new(category);
        let id = task.id;
        self.tasks.push(task);
        id
    }

    /// Commit an edit: trims and sets the text. Unknown id is a no-op.
    pub fn commit_edit(&mut self, id: Uuid, text: &str) -> bool {
        match self.get_mut(id) {
            Some(task) => {
                task.text = text.trim().to_string();
                true
            }
            None => false,
        }
    }

    pub fn cycle_timing(&mut self, id: Uuid) -> bool {
        match self.get_mut(id) {
            Some(task) => {
                task.timing = task.timing.cycle();
                true
            }
            None => false,
        }
    }

    /// Move a task to another category, as from a drag gesture. No-op when
    /// the id is unknown or the target equals the current category.
    pub fn recategorize(&mut self, id: Uuid, new_category: &str) -> bool {
        match self.get_mut(id) {
            Some(task) if task.category != new_category => {
                task.category = new_category.to_string();
                true
            }
            _ => false,
        }
    }

    /// First half of completion: the task is flagged but stays resident so
    /// the presentation layer can animate its exit. `remove` finishes the
    /// job after the dwell.
    pub fn mark_complete(&mut self, id: Uuid) -> bool {
        match self.get_mut(id) {
            Some(task) if task.is_active() => {
                task.completed = true;
                true
            }
            _ => false,
        }
    }

    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }

    /// True when no active task remains. Completed-but-not-yet-removed
    /// tasks do not count as remaining work.
    pub fn is_all_complete(&self) -> bool {
        self.tasks.iter().all(|t| t.completed)
    }

    /// The ordered subsequence matching the filter. Pure; `All` returns
    /// the full sequence unchanged.
    pub fn filtered_view(&self, filter: TimingFilter) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| filter.matches(t.timing))
            .collect()
    }
}

/// Partition a task sequence into one run per category, in
/// category-definition order, dropping categories with no matches.
pub fn group_by_category<'a>(
    tasks: &[&'a Task],
    categories: &'a [Category],
) -> Vec<(&'a Category, Vec<&'a Task>)> {
    categories
        .iter()
        .filter_map(|category| {
            let members: Vec<&Task> = tasks
                .iter()
                .copied()
                .filter(|t| t.category == category.id)
                .collect();
            if members.is_empty() {
                None
            } else {
                Some((category, members))
            }
        })
        .collect()
}
