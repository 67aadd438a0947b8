use std::time::Duration;

use uuid::Uuid;

use crate::classify::{Classifier, ERROR_NOTICE_DWELL, Extraction, extract};
use crate::config::AppConfig;
use crate::core::category::Category;
use crate::core::task::{Task, TimingFilter};
use crate::storage::Storage;
use crate::store::tasks::group_by_category;
use crate::store::{CategoryStore, TaskStore};

/// How long a completed task stays resident before removal, giving the
/// presentation layer time to animate its exit.
pub const COMPLETION_REMOVAL_DELAY: Duration = Duration::from_millis(300);

/// Signals for the rendering collaborator. The controller mutates state
/// and reports what happened; drawing is someone else's job.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    Refresh,
    /// A freshly added task wants input focus.
    BeginEdit(Uuid),
    /// Play the completion effect at this anchor point.
    CompletionBurst { x: f32, y: f32 },
    /// The last task just left the store.
    AllComplete,
    /// Transient status line text.
    Notice(String),
}

/// Application state and its single controller. All mutations flow
/// through here; each state-changing operation persists on change and
/// returns the events the rendering layer should react to.
pub struct App {
    pub tasks: TaskStore,
    pub categories: CategoryStore,
    pub filter: TimingFilter,
    credential: Option<String>,
    storage: Storage,
    /// Capture generation. An extraction started under an older generation
    /// is dropped when it resolves, so a stale classification can never
    /// overwrite a newer session (last-write-wins by intent, not by
    /// completion order).
    generation: u64,
}

impl App {
    /// Load persisted state. Honors the persist-tasks flag: when off, the
    /// task key is cleared and every run starts with an empty list.
    pub fn load(config: &AppConfig, storage: Storage) -> Self {
        let categories = match storage.load_categories() {
            Ok(Some(list)) => CategoryStore::new(list),
            Ok(None) => CategoryStore::default(),
            Err(e) => {
                log::warn!("could not load categories, reseeding: {}", e);
                CategoryStore::default()
            }
        };

        let tasks = if config.persist_tasks {
            match storage.load_tasks() {
                Ok(Some(list)) => TaskStore::new(list),
                Ok(None) => TaskStore::default(),
                Err(e) => {
                    log::warn!("could not load tasks, starting empty: {}", e);
                    TaskStore::default()
                }
            }
        } else {
            if let Err(e) = storage.clear_tasks() {
                log::warn!("could not clear persisted tasks: {}", e);
            }
            TaskStore::default()
        };

        let credential = storage.load_credential().unwrap_or_else(|e| {
            log::warn!("could not load credential: {}", e);
            None
        });

        Self {
            tasks,
            categories,
            filter: TimingFilter::default(),
            credential,
            storage,
            generation: 0,
        }
    }

    pub fn credential(&self) -> Option<&str> {
        self.credential.as_deref()
    }

    pub fn set_credential(&mut self, credential: &str) {
        if let Err(e) = self.storage.save_credential(credential) {
            log::error!("failed to persist credential: {}", e);
        }
        let trimmed = credential.trim();
        self.credential = (!trimmed.is_empty()).then(|| trimmed.to_string());
    }

    /// Start a new capture generation: the list clears immediately and any
    /// extraction still in flight from an earlier generation is ignored
    /// when it resolves.
    pub fn begin_session(&mut self) -> u64 {
        self.generation += 1;
        self.tasks.replace_all(Vec::new());
        self.persist_tasks();
        self.generation
    }

    /// Apply a finished extraction, unless a newer session superseded it.
    pub fn apply_extraction(&mut self, generation: u64, tasks: Vec<Task>) -> Vec<AppEvent> {
        if generation != self.generation {
            log::info!(
                "dropping stale extraction from generation {} (current {})",
                generation,
                self.generation
            );
            return Vec::new();
        }
        let count = tasks.len();
        self.tasks.replace_all(tasks);
        self.persist_tasks();
        vec![
            AppEvent::Notice(format!("added {} tasks", count)),
            AppEvent::Refresh,
        ]
    }

    /// The full capture-to-list path for one transcript. An empty
    /// transcript does not invoke the pipeline.
    pub async fn run_extraction<C: Classifier>(
        &mut self,
        classifier: &C,
        transcript: &str,
    ) -> Vec<AppEvent> {
        let transcript = transcript.trim();
        if transcript.is_empty() {
            return Vec::new();
        }

        let generation = self.begin_session();
        match extract(classifier, transcript).await {
            Extraction::Classified(tasks) | Extraction::Fallback(tasks) => {
                self.apply_extraction(generation, tasks)
            }
            Extraction::Recovered { error, tasks } => {
                // Let the failure notice dwell before the fallback appears
                let mut events =
                    vec![AppEvent::Notice(format!("classification failed: {}", error))];
                tokio::time::sleep(ERROR_NOTICE_DWELL).await;
                events.extend(self.apply_extraction(generation, tasks));
                events
            }
        }
    }

    /// Append an empty task and hand focus to it.
    pub fn add_task(&mut self, category: &str) -> Vec<AppEvent> {
        let id = self.tasks.add(category);
        self.persist_tasks();
        vec![AppEvent::Refresh, AppEvent::BeginEdit(id)]
    }

    /// Commit an edit, from loss of focus or an explicit confirm; both
    /// arrive here the same way.
    pub fn commit_edit(&mut self, id: Uuid, text: &str) -> Vec<AppEvent> {
        if self.tasks.commit_edit(id, text) {
            self.persist_tasks();
            vec![AppEvent::Refresh]
        } else {
            Vec::new()
        }
    }

    pub fn cycle_timing(&mut self, id: Uuid) -> Vec<AppEvent> {
        if self.tasks.cycle_timing(id) {
            self.persist_tasks();
            vec![AppEvent::Refresh]
        } else {
            Vec::new()
        }
    }

    pub fn recategorize(&mut self, id: Uuid, new_category: &str) -> Vec<AppEvent> {
        if self.tasks.recategorize(id, new_category) {
            self.persist_tasks();
            vec![AppEvent::Refresh]
        } else {
            Vec::new()
        }
    }

    /// Complete a task: mark it, let the exit effect play at the given
    /// anchor, then remove it. Emits `AllComplete` instead of a refresh
    /// when the last task leaves the store.
    pub async fn complete_task(&mut self, id: Uuid, anchor: (f32, f32)) -> Vec<AppEvent> {
        if !self.tasks.mark_complete(id) {
            return Vec::new();
        }
        let mut events = vec![AppEvent::CompletionBurst {
            x: anchor.0,
            y: anchor.1,
        }];

        tokio::time::sleep(COMPLETION_REMOVAL_DELAY).await;
        self.tasks.remove(id);
        self.persist_tasks();

        if self.tasks.is_empty() {
            events.push(AppEvent::AllComplete);
        } else {
            events.push(AppEvent::Refresh);
        }
        events
    }

    /// Pure view-state change; never persisted.
    pub fn set_filter(&mut self, filter: TimingFilter) -> Vec<AppEvent> {
        self.filter = filter;
        vec![AppEvent::Refresh]
    }

    pub fn rename_category(&mut self, id: &str, name: &str) -> Vec<AppEvent> {
        if self.categories.rename(id, name) {
            self.persist_categories();
            vec![AppEvent::Refresh]
        } else {
            Vec::new()
        }
    }

    pub fn recolor_category(&mut self, id: &str, color: &str) -> Vec<AppEvent> {
        if self.categories.recolor(id, color) {
            self.persist_categories();
            vec![AppEvent::Refresh]
        } else {
            Vec::new()
        }
    }

    pub fn filtered(&self) -> Vec<&Task> {
        self.tasks.filtered_view(self.filter)
    }

    /// The filtered list grouped for presentation, in category order.
    pub fn grouped(&self) -> Vec<(&Category, Vec<&Task>)> {
        let view = self.filtered();
        group_by_category(&view, self.categories.categories())
    }

    fn persist_tasks(&self) {
        if let Err(e) = self.storage.save_tasks(self.tasks.tasks()) {
            log::error!("failed to persist tasks: {}", e);
        }
    }

    fn persist_categories(&self) {
        if let Err(e) = self.storage.save_categories(self.categories.categories()) {
            log::error!("failed to persist categories: {}", e);
        }
    }
}
