use std::fs;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::core::category::Category;
use crate::core::task::Task;

const TASKS_KEY: &str = "tasks.json";
const CATEGORIES_KEY: &str = "categories.json";
const CREDENTIAL_KEY: &str = "credential";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] io::Error),
    #[error("corrupt stored value: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// String-keyed durable store backed by one file per key in a single
/// directory. An absent key is valid and loads as `None`; callers fall
/// back to their defaults.
///
/// The credential is stored as plain text. Known weakness, not a design
/// goal.
#[derive(Debug, Clone)]
pub struct Storage {
    dir: PathBuf,
}

impl Storage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn default_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("~/.local/share"))
            .join("murmur")
    }

    pub fn load_tasks(&self) -> Result<Option<Vec<Task>>, StorageError> {
        match self.read(TASKS_KEY)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn save_tasks(&self, tasks: &[Task]) -> Result<(), StorageError> {
        self.write(TASKS_KEY, &serde_json::to_string(tasks)?)
    }

    /// Drop the task key only. Used at startup when task persistence
    /// across restarts is disabled.
    pub fn clear_tasks(&self) -> Result<(), StorageError> {
        match fs::remove_file(self.path(TASKS_KEY)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn load_categories(&self) -> Result<Option<Vec<Category>>, StorageError> {
        match self.read(CATEGORIES_KEY)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn save_categories(&self, categories: &[Category]) -> Result<(), StorageError> {
        self.write(CATEGORIES_KEY, &serde_json::to_string(categories)?)
    }

    /// The bearer credential for the classification service, if one has
    /// been stored. Blank values count as absent.
    pub fn load_credential(&self) -> Result<Option<String>, StorageError> {
        Ok(self
            .read(CREDENTIAL_KEY)?
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()))
    }

    pub fn save_credential(&self, credential: &str) -> Result<(), StorageError> {
        self.write(CREDENTIAL_KEY, credential.trim())
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }

    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path(key), value)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::category::default_categories;

    fn temp_storage() -> (tempfile::TempDir, Storage) {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path());
        (dir, storage)
    }

    #[test]
    fn absent_keys_load_as_none() {
        let (_dir, storage) = temp_storage();
        assert!(storage.load_tasks().unwrap().is_none());
        assert!(storage.load_categories().unwrap().is_none());
        assert!(storage.load_credential().unwrap().is_none());
    }

    #[test]
    fn task_round_trip_reproduces_equal_sequence() {
        let (_dir, storage) = temp_storage();
        let mut tasks = vec![
            Task::from_extracted("会議の資料を準備する", "work"),
            Task::from_extracted("牛乳を買いに行く", "home"),
        ];
        tasks[1].timing = tasks[1].timing.cycle();
        tasks[1].completed = true;

        storage.save_tasks(&tasks).unwrap();
        let loaded = storage.load_tasks().unwrap().unwrap();
        assert_eq!(loaded, tasks);
    }

    #[test]
    fn category_round_trip() {
        let (_dir, storage) = temp_storage();
        let categories = default_categories();
        storage.save_categories(&categories).unwrap();
        assert_eq!(storage.load_categories().unwrap().unwrap(), categories);
    }

    #[test]
    fn clear_tasks_leaves_other_keys_alone() {
        let (_dir, storage) = temp_storage();
        storage.save_tasks(&[Task::new("work")]).unwrap();
        storage.save_categories(&default_categories()).unwrap();

        storage.clear_tasks().unwrap();
        assert!(storage.load_tasks().unwrap().is_none());
        assert!(storage.load_categories().unwrap().is_some());

        // clearing an already-absent key is fine
        storage.clear_tasks().unwrap();
    }

    #[test]
    fn blank_credential_counts_as_absent() {
        let (_dir, storage) = temp_storage();
        storage.save_credential("  \n").unwrap();
        assert!(storage.load_credential().unwrap().is_none());

        storage.save_credential(" sk-test-123 ").unwrap();
        assert_eq!(storage.load_credential().unwrap().as_deref(), Some("sk-test-123"));
    }
}
