use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::Serialize;

use super::task::TaskRecord;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize tasks: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Ordered task list backed by a single JSON file.
///
/// Every mutation rewrites the whole file. Out-of-range indices are ignored.
#[derive(Debug)]
pub struct TaskStore {
    path: PathBuf,
    tasks: Vec<TaskRecord>,
}

impl TaskStore {
    /// Create a store for `path` and load whatever is already there.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let mut store = Self {
            path: path.into(),
            tasks: Vec::new(),
        };
        store.load();
        store
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn tasks(&self) -> &[TaskRecord] {
        &self.tasks
    }

    pub fn get(&self, index: usize) -> Option<&TaskRecord> {
        self.tasks.get(index)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Append a task stamped with the current local time.
    pub fn add(&mut self, task: TaskRecord) {
        self.add_at(task, chrono::Local::now().naive_local());
    }

    /// Append a task stamped with `now`, replacing any caller-supplied timestamp.
    pub fn add_at(&mut self, mut task: TaskRecord, now: NaiveDateTime) {
        task.stamp(now);
        log::debug!("Adding task: {}", task.title);
        self.tasks.push(task);
        self.persist();
    }

    /// Add each task in order. Returns how many were added.
    pub fn extend(&mut self, tasks: impl IntoIterator<Item = TaskRecord>) -> usize {
        let mut count = 0;
        for task in tasks {
            self.add(task);
            count += 1;
        }
        count
    }

    pub fn remove(&mut self, index: usize) -> Option<TaskRecord> {
        if index >= self.tasks.len() {
            return None;
        }
        let removed = self.tasks.remove(index);
        log::debug!("Removed task {}: {}", index, removed.title);
        self.persist();
        Some(removed)
    }

    /// Overwrite the editable fields of the task at `index`. `created_at` is kept.
    pub fn update(
        &mut self,
        index: usize,
        title: impl Into<String>,
        deadline: impl Into<String>,
        description: impl Into<String>,
    ) -> bool {
        let Some(task) = self.tasks.get_mut(index) else {
            return false;
        };
        task.title = title.into();
        task.deadline = deadline.into();
        task.description = description.into();
        self.persist();
        true
    }

    /// Write the full list to disk as indented JSON, replacing the file.
    pub fn save(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.tasks.serialize(&mut ser)?;

        std::fs::write(&self.path, buf).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }

    /// Replace the in-memory list with the file contents.
    ///
    /// A missing, unreadable or malformed file leaves the store empty.
    pub fn load(&mut self) {
        self.tasks = match std::fs::read_to_string(&self.path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(tasks) => tasks,
                Err(e) => {
                    log::warn!("Ignoring malformed task file {}: {}", self.path.display(), e);
                    Vec::new()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("No task file at {}", self.path.display());
                Vec::new()
            }
            Err(e) => {
                log::warn!("Failed to read task file {}: {}", self.path.display(), e);
                Vec::new()
            }
        };
        log::info!("Loaded {} tasks from {}", self.tasks.len(), self.path.display());
    }

    fn persist(&self) {
        if let Err(e) = self.save() {
            log::error!("Failed to save tasks: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn store_in(dir: &tempfile::TempDir) -> TaskStore {
        TaskStore::open(dir.path().join("tasks.json"))
    }

    fn seeded(dir: &tempfile::TempDir) -> TaskStore {
        let mut store = store_in(dir);
        store.add_at(TaskRecord::new("Call Bob", "2026-10-20 15:00", "About the lease"), at(9, 0));
        store.add_at(TaskRecord::new("Pay rent", "2026-11-01 09:00", ""), at(9, 5));
        store.add_at(TaskRecord::new("Buy milk", "", "Oat, not dairy"), at(9, 10));
        store
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert!(store.is_empty());
    }

    #[test]
    fn corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(TaskStore::open(&path).is_empty());

        std::fs::write(&path, r#"{"title": "not a list"}"#).unwrap();
        assert!(TaskStore::open(&path).is_empty());
    }

    #[test]
    fn loose_field_types_load_and_survive_next_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        std::fs::write(
            &path,
            r#"[
                {"title": "Call Bob", "deadline": null, "description": "lease", "created_at": "2026-10-18 10:00:00"},
                {"title": "Pay rent", "deadline": "2026-11-01 09:00", "description": 1200}
            ]"#,
        )
        .unwrap();

        let mut store = TaskStore::open(&path);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(0).unwrap().deadline, "");
        assert_eq!(store.get(1).unwrap().description, "1200");

        store.add_at(TaskRecord::new("New", "", ""), at(11, 0));
        let reopened = TaskStore::open(&path);
        let titles: Vec<&str> = reopened.tasks().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["Call Bob", "Pay rent", "New"]);
        assert_eq!(reopened.get(0).unwrap().created_at, "2026-10-18 10:00:00");
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = seeded(&dir);
        let reopened = TaskStore::open(store.path());
        assert_eq!(reopened.tasks(), store.tasks());
    }

    #[test]
    fn saved_file_is_indented_and_keeps_unicode() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        store.add_at(TaskRecord::new("明天开会", "", ""), at(8, 0));

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("明天开会"));
        assert!(raw.contains("\n        \"title\""));
    }

    #[test]
    fn save_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = TaskStore::open(dir.path().join("nested/deeper/tasks.json"));
        store.add_at(TaskRecord::new("Water plants", "", ""), at(7, 0));
        assert!(store.path().exists());
    }

    #[test]
    fn add_overwrites_supplied_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        let mut task = TaskRecord::new("Stretch", "", "");
        task.created_at = "1999-01-01 00:00:00".into();
        store.add_at(task, at(12, 30));
        assert_eq!(store.get(0).unwrap().created_at, "2026-10-19 12:30:00");
    }

    #[test]
    fn add_stamps_current_time() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        let before = chrono::Local::now().naive_local();
        store.add(TaskRecord::new("Stretch", "", ""));
        let stamped = NaiveDateTime::parse_from_str(
            &store.get(0).unwrap().created_at,
            crate::core::task::CREATED_AT_FORMAT,
        )
        .unwrap();
        assert!(stamped >= before.with_nanosecond(0).unwrap());
    }

    #[test]
    fn remove_out_of_range_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = seeded(&dir);
        let before = store.tasks().to_vec();
        assert!(store.remove(3).is_none());
        assert!(store.remove(usize::MAX).is_none());
        assert_eq!(store.tasks(), before.as_slice());
    }

    #[test]
    fn remove_shifts_later_indices() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = seeded(&dir);
        let removed = store.remove(0).unwrap();
        assert_eq!(removed.title, "Call Bob");
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(0).unwrap().title, "Pay rent");
        assert_eq!(store.get(1).unwrap().title, "Buy milk");

        let reopened = TaskStore::open(store.path());
        assert_eq!(reopened.len(), 2);
    }

    #[test]
    fn update_out_of_range_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = seeded(&dir);
        let before = store.tasks().to_vec();
        assert!(!store.update(7, "x", "y", "z"));
        assert_eq!(store.tasks(), before.as_slice());
    }

    #[test]
    fn update_preserves_created_at() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = seeded(&dir);
        let created = store.get(1).unwrap().created_at.clone();

        assert!(store.update(1, "Pay rent early", "2026-10-28 09:00", "Transfer by phone"));

        let task = store.get(1).unwrap();
        assert_eq!(task.title, "Pay rent early");
        assert_eq!(task.deadline, "2026-10-28 09:00");
        assert_eq!(task.description, "Transfer by phone");
        assert_eq!(task.created_at, created);

        let reopened = TaskStore::open(store.path());
        assert_eq!(reopened.get(1), store.get(1));
    }

    #[test]
    fn extend_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        let added = store.extend(vec![
            TaskRecord::new("First", "", ""),
            TaskRecord::new("Second", "", ""),
        ]);
        assert_eq!(added, 2);
        let titles: Vec<&str> = store.tasks().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["First", "Second"]);
    }
}
