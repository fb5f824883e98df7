/// In-memory task collection with snapshot persistence
use anyhow::{Result, bail};
use chrono::{NaiveDate, Utc};
use std::collections::HashSet;

use crate::models::{Task, TaskDraft, TaskPatch, dedup_tags};
use crate::storage::{Storage, TODOS_KEY};

/// Owns the canonical task collection.
///
/// Every mutation that changes the collection writes the full JSON snapshot
/// through the storage handle before returning. Mutations that match nothing
/// (unknown id, empty bulk set) leave both memory and storage untouched.
pub struct TaskStore {
    tasks: Vec<Task>,
    last_id: i64,
    storage: Box<dyn Storage>,
}

impl TaskStore {
    /// Load the saved snapshot from storage.
    ///
    /// A missing key means an empty collection. An unreadable snapshot is
    /// reported and discarded rather than crashing; the store starts empty
    /// and the next mutation overwrites the corrupt value.
    pub fn load(storage: Box<dyn Storage>) -> Result<Self> {
        let tasks = match storage.get(TODOS_KEY)? {
            None => Vec::new(),
            Some(raw) => match serde_json::from_str::<Vec<Task>>(&raw) {
                Ok(tasks) => tasks,
                Err(e) => {
                    eprintln!("Warning: discarding unreadable task snapshot: {}", e);
                    Vec::new()
                }
            },
        };

        let last_id = tasks.iter().map(|t| t.id).max().unwrap_or(0);

        Ok(Self {
            tasks,
            last_id,
            storage,
        })
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

    pub fn get(&self, id: i64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Add a task with just text and an optional deadline.
    pub fn add(&mut self, text: &str, deadline: Option<NaiveDate>) -> Result<Task> {
        let mut draft = TaskDraft::new(text);
        draft.deadline = deadline;
        self.add_draft(draft)
    }

    /// Add a task from a full draft. Rejects empty trimmed text.
    pub fn add_draft(&mut self, draft: TaskDraft) -> Result<Task> {
        if draft.text.trim().is_empty() {
            bail!("task text cannot be empty");
        }

        let task = Task::new(self.next_id(), draft);
        self.tasks.push(task.clone());
        self.persist()?;

        Ok(task)
    }

    /// Apply a patch to the task with the given id.
    ///
    /// Unknown ids are a silent no-op: the caller may hold a stale reference
    /// to an already-deleted task. Patching the text to an empty string is a
    /// validation error and leaves the task unchanged.
    pub fn update(&mut self, id: i64, patch: TaskPatch) -> Result<()> {
        if patch.is_empty() {
            return Ok(());
        }
        if let Some(text) = &patch.text {
            if text.trim().is_empty() {
                bail!("task text cannot be empty");
            }
        }

        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(());
        };

        if let Some(text) = patch.text {
            task.text = text.trim().to_string();
        }
        if let Some(deadline) = patch.deadline {
            task.deadline = deadline;
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        if let Some(category) = patch.category {
            task.category = category;
        }
        if let Some(tags) = patch.tags {
            task.tags = dedup_tags(tags);
        }
        task.updated_at = Utc::now();

        self.persist()
    }

    /// Flip the completion flag. Silent no-op on unknown id.
    pub fn toggle_complete(&mut self, id: i64) -> Result<()> {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(());
        };

        task.completed = !task.completed;
        task.updated_at = Utc::now();

        self.persist()
    }

    /// Remove the task with the given id. Idempotent.
    pub fn delete(&mut self, id: i64) -> Result<()> {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);

        if self.tasks.len() == before {
            return Ok(());
        }
        self.persist()
    }

    /// Remove every task whose id is in the set; unknown ids are ignored.
    pub fn bulk_delete(&mut self, ids: &HashSet<i64>) -> Result<()> {
        let before = self.tasks.len();
        self.tasks.retain(|t| !ids.contains(&t.id));

        if self.tasks.len() == before {
            return Ok(());
        }
        self.persist()
    }

    /// Mark every task whose id is in the set as completed (not a toggle);
    /// unknown ids are ignored.
    pub fn bulk_complete(&mut self, ids: &HashSet<i64>) -> Result<()> {
        let now = Utc::now();
        let mut changed = false;

        for task in self.tasks.iter_mut().filter(|t| ids.contains(&t.id)) {
            if !task.completed {
                task.completed = true;
                task.updated_at = now;
                changed = true;
            }
        }

        if !changed {
            return Ok(());
        }
        self.persist()
    }

    /// Ids are creation time in milliseconds, bumped past the previous id so
    /// two adds in the same millisecond (or a clock step backwards) still
    /// get unique, increasing values.
    fn next_id(&mut self) -> i64 {
        let millis = Utc::now().timestamp_millis();
        self.last_id = millis.max(self.last_id + 1);
        self.last_id
    }

    fn persist(&mut self) -> Result<()> {
        let snapshot = serde_json::to_string(&self.tasks)?;
        self.storage.set(TODOS_KEY, &snapshot)
    }
}
