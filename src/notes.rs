//! Sticky-wall notes: flat collection with whole-file persistence, same
//! container shape as the task store.

use std::path::PathBuf;
use std::sync::{RwLock, RwLockReadGuard};

use serde::{Deserialize, Serialize};

use crate::shared::errors::StorageError;
use crate::shared::paths::{self, ensure_parent_dir};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub color: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNote {
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub color: String,
}

/// Shallow-merge update for a note.
#[derive(Clone, Debug, Default)]
pub struct NotePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub color: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotesData {
    #[serde(default)]
    pub notes: Vec<Note>,
    #[serde(default)]
    pub next_note_id: u64,
}

impl Default for NotesData {
    fn default() -> Self {
        Self {
            notes: Vec::new(),
            next_note_id: 1,
        }
    }
}

impl NotesData {
    fn normalize_counter(&mut self) {
        let max_id = self.notes.iter().map(|n| n.id).max().unwrap_or(0);
        self.next_note_id = self.next_note_id.max(max_id + 1);
    }
}

/// Thread-safe sticky-notes store with whole-file persistence. Unknown ids
/// on update/delete are silent no-ops, like the task store.
pub struct NotesStore {
    data: RwLock<NotesData>,
    path: PathBuf,
}

impl NotesStore {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let data = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let mut data: NotesData = serde_json::from_str(&content)?;
            data.normalize_counter();
            data
        } else {
            NotesData::default()
        };
        tracing::info!(target: "notes", "Notes store initialized: {} notes", data.notes.len());
        Ok(Self {
            data: RwLock::new(data),
            path,
        })
    }

    pub fn open_default() -> Result<Self, StorageError> {
        Self::load(paths::data_file("notes"))
    }

    pub fn read(&self) -> RwLockReadGuard<'_, NotesData> {
        self.data.read().unwrap()
    }

    fn mutate<R>(&self, op: impl FnOnce(&mut NotesData) -> R) -> Result<R, StorageError> {
        let mut data = self.data.write().unwrap();
        let out = op(&mut data);
        ensure_parent_dir(&self.path)?;
        let content = serde_json::to_string_pretty(&*data)?;
        std::fs::write(&self.path, &content)?;
        Ok(out)
    }

    pub fn add_note(&self, draft: NewNote) -> Result<Note, StorageError> {
        self.mutate(|data| {
            let note = Note {
                id: data.next_note_id,
                title: draft.title,
                content: draft.content,
                color: draft.color,
            };
            data.next_note_id += 1;
            data.notes.push(note.clone());
            note
        })
    }

    pub fn update_note(&self, id: u64, patch: NotePatch) -> Result<(), StorageError> {
        self.mutate(|data| {
            if let Some(note) = data.notes.iter_mut().find(|n| n.id == id) {
                if let Some(title) = patch.title {
                    note.title = title;
                }
                if let Some(content) = patch.content {
                    note.content = content;
                }
                if let Some(color) = patch.color {
                    note.color = color;
                }
            }
        })
    }

    pub fn delete_note(&self, id: u64) -> Result<(), StorageError> {
        self.mutate(|data| {
            data.notes.retain(|n| n.id != id);
        })
    }

    pub fn notes(&self) -> Vec<Note> {
        self.read().notes.clone()
    }
}
