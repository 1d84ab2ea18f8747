pub mod queries;
pub mod storage;
pub mod types;

use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard};

use thiserror::Error;

use crate::shared::errors::StorageError;
use crate::shared::paths;
use types::{List, NamePatch, NewTask, Tag, Task, TaskPatch, TasksData};

/// Errors surfaced by store mutations. Persistence failures pass through
/// unchanged; list and tag writes also reject colors outside [`types::PALETTE`].
#[derive(Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Unknown palette color: {0}")]
    UnknownColor(String),
}

fn check_color(color: &str) -> Result<(), StoreError> {
    if types::is_palette_color(color) {
        Ok(())
    } else {
        Err(StoreError::UnknownColor(color.to_string()))
    }
}

/// Thread-safe in-memory store with whole-file persistence.
///
/// The store is an explicit handle: construct one and pass it around, there
/// is no ambient global. Every mutation writes the full snapshot back to disk
/// before returning; persistence failures propagate to the caller.
///
/// Updates and deletes aimed at an id that does not exist are silent no-ops.
pub struct TaskStore {
    data: RwLock<TasksData>,
    path: PathBuf,
}

impl TaskStore {
    /// Open the store backed by the given data file. A missing file starts
    /// from the seeded defaults.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let data = storage::load_data(&path)?;
        tracing::info!(
            target: "tasks",
            "Task store initialized: {} tasks, {} lists, {} tags",
            data.tasks.len(),
            data.lists.len(),
            data.tags.len()
        );
        Ok(Self {
            data: RwLock::new(data),
            path,
        })
    }

    /// Open the store at its default XDG location.
    pub fn open_default() -> Result<Self, StorageError> {
        Self::load(paths::data_file("tasks"))
    }

    pub fn data_path(&self) -> &Path {
        &self.path
    }

    pub fn read(&self) -> RwLockReadGuard<'_, TasksData> {
        self.data.read().unwrap()
    }

    /// Run a mutation under the write lock, then persist the snapshot. The
    /// write completes before the lock is released, so readers never observe
    /// state that is not on disk.
    fn mutate<R>(&self, op: impl FnOnce(&mut TasksData) -> R) -> Result<R, StoreError> {
        let mut data = self.data.write().unwrap();
        let out = op(&mut data);
        storage::save_data(&self.path, &data)?;
        Ok(out)
    }

    // ------------------------------------------------------------------
    // Tasks
    // ------------------------------------------------------------------

    /// Create a task from a draft. The store assigns the id from a monotonic
    /// counter; ids are never reused, even after deleting the highest one.
    /// `todo` emptiness is the caller's concern, not enforced here.
    pub fn add_task(&self, draft: NewTask) -> Result<Task, StoreError> {
        self.mutate(|data| {
            let task = Task {
                id: data.next_task_id,
                todo: draft.todo,
                completed: false,
                description: draft.description,
                due_date: draft.due_date,
                reminder_time: draft.reminder_time,
                list_id: draft.list_id,
                tag_ids: draft.tag_ids,
                subtasks: draft.subtasks,
            };
            data.next_task_id += 1;
            data.tasks.push(task.clone());
            tracing::debug!(target: "tasks", id = task.id, "Task created");
            task
        })
    }

    /// Shallow-merge a patch into the matching task.
    pub fn update_task(&self, id: u64, patch: TaskPatch) -> Result<(), StoreError> {
        self.mutate(|data| {
            match data.tasks.iter_mut().find(|t| t.id == id) {
                Some(task) => patch.apply(task),
                None => tracing::debug!(target: "tasks", id, "Update for unknown task ignored"),
            }
        })
    }

    pub fn delete_task(&self, id: u64) -> Result<(), StoreError> {
        self.mutate(|data| {
            data.tasks.retain(|t| t.id != id);
        })
    }

    /// Flip the completion flag. Applying it twice restores the original state.
    pub fn toggle_task_complete(&self, id: u64) -> Result<(), StoreError> {
        let current = self.read().tasks.iter().find(|t| t.id == id).map(|t| t.completed);
        match current {
            Some(completed) => self.update_task(
                id,
                TaskPatch {
                    completed: Some(!completed),
                    ..TaskPatch::default()
                },
            ),
            None => Ok(()),
        }
    }

    /// Set or clear the `hh:mm` reminder time on a task.
    pub fn set_task_reminder(
        &self,
        id: u64,
        reminder_time: Option<String>,
    ) -> Result<(), StoreError> {
        self.update_task(
            id,
            TaskPatch {
                reminder_time: Some(reminder_time),
                ..TaskPatch::default()
            },
        )
    }

    /// Clear the whole task collection. Lists and tags survive. Destructive
    /// and irreversible; confirmation belongs at the caller boundary.
    pub fn reset_tasks(&self) -> Result<(), StoreError> {
        self.mutate(|data| {
            let dropped = data.tasks.len();
            data.tasks.clear();
            tracing::info!(target: "tasks", dropped, "Task collection reset");
        })
    }

    // ------------------------------------------------------------------
    // Lists
    // ------------------------------------------------------------------

    pub fn add_list(&self, name: String, color: String) -> Result<List, StoreError> {
        check_color(&color)?;
        self.mutate(|data| {
            let list = List {
                id: data.next_list_id,
                name,
                color,
            };
            data.next_list_id += 1;
            data.lists.push(list.clone());
            list
        })
    }

    pub fn update_list(&self, id: u64, patch: NamePatch) -> Result<(), StoreError> {
        if let Some(color) = patch.color.as_deref() {
            check_color(color)?;
        }
        self.mutate(|data| {
            if let Some(list) = data.lists.iter_mut().find(|l| l.id == id) {
                if let Some(name) = patch.name {
                    list.name = name;
                }
                if let Some(color) = patch.color {
                    list.color = color;
                }
            }
        })
    }

    /// Delete a list, clearing the reference on every task that pointed at
    /// it (orphan clearing). The tasks themselves survive.
    pub fn delete_list(&self, id: u64) -> Result<(), StoreError> {
        self.mutate(|data| {
            for task in data.tasks.iter_mut().filter(|t| t.list_id == Some(id)) {
                task.list_id = None;
            }
            data.lists.retain(|l| l.id != id);
        })
    }

    // ------------------------------------------------------------------
    // Tags
    // ------------------------------------------------------------------

    pub fn add_tag(&self, name: String, color: String) -> Result<Tag, StoreError> {
        check_color(&color)?;
        self.mutate(|data| {
            let tag = Tag {
                id: data.next_tag_id,
                name,
                color,
            };
            data.next_tag_id += 1;
            data.tags.push(tag.clone());
            tag
        })
    }

    pub fn update_tag(&self, id: u64, patch: NamePatch) -> Result<(), StoreError> {
        if let Some(color) = patch.color.as_deref() {
            check_color(color)?;
        }
        self.mutate(|data| {
            if let Some(tag) = data.tags.iter_mut().find(|t| t.id == id) {
                if let Some(name) = patch.name {
                    tag.name = name;
                }
                if let Some(color) = patch.color {
                    tag.color = color;
                }
            }
        })
    }

    /// Delete a tag, stripping it from every task that carried it.
    pub fn delete_tag(&self, id: u64) -> Result<(), StoreError> {
        self.mutate(|data| {
            for task in &mut data.tasks {
                task.tag_ids.retain(|tag_id| *tag_id != id);
            }
            data.tags.retain(|t| t.id != id);
        })
    }
}
