use serde::{Deserialize, Serialize};

/// Symbolic color tokens lists and tags may carry. The UI maps these to the
/// actual theme colors; list and tag writes reject anything else.
pub const PALETTE: &[&str] = &[
    "bg-primary",
    "bg-secondary",
    "bg-accent1",
    "bg-accent2",
    "bg-accent3",
];

/// Membership check behind list and tag color validation.
pub fn is_palette_color(color: &str) -> bool {
    PALETTE.contains(&color)
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subtask {
    pub id: u32,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: u64,
    pub todo: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub description: String,
    /// Compact `DD-MM-YY` token or composite `DD-MM-YYThh:mm`, stored verbatim.
    #[serde(default)]
    pub due_date: Option<String>,
    /// `hh:mm`; only meaningful together with `due_date`.
    #[serde(default)]
    pub reminder_time: Option<String>,
    /// Soft reference to a [`List`]; display name resolved at read time.
    #[serde(default)]
    pub list_id: Option<u64>,
    #[serde(default)]
    pub tag_ids: Vec<u64>,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
}

impl Task {
    /// Derived subtask count; the sequence itself is the source of truth.
    pub fn subtask_count(&self) -> usize {
        self.subtasks.len()
    }

    /// Whether this task qualifies for reminder scheduling (time eligibility
    /// is the scheduler's concern).
    pub fn has_active_reminder(&self) -> bool {
        !self.completed && self.due_date.is_some() && self.reminder_time.is_some()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct List {
    pub id: u64,
    pub name: String,
    pub color: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: u64,
    pub name: String,
    pub color: String,
}

/// Draft for a task about to be created; the store assigns the id.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub todo: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub reminder_time: Option<String>,
    #[serde(default)]
    pub list_id: Option<u64>,
    #[serde(default)]
    pub tag_ids: Vec<u64>,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
}

/// Shallow-merge update for a task. `None` leaves a field untouched; the
/// nested `Option` on clearable fields distinguishes "set to nothing" from
/// "leave alone".
#[derive(Clone, Debug, Default)]
pub struct TaskPatch {
    pub todo: Option<String>,
    pub completed: Option<bool>,
    pub description: Option<String>,
    pub due_date: Option<Option<String>>,
    pub reminder_time: Option<Option<String>>,
    pub list_id: Option<Option<u64>>,
    pub tag_ids: Option<Vec<u64>>,
    pub subtasks: Option<Vec<Subtask>>,
}

impl TaskPatch {
    pub fn apply(self, task: &mut Task) {
        if let Some(todo) = self.todo {
            task.todo = todo;
        }
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
        if let Some(reminder_time) = self.reminder_time {
            task.reminder_time = reminder_time;
        }
        if let Some(list_id) = self.list_id {
            task.list_id = list_id;
        }
        if let Some(tag_ids) = self.tag_ids {
            task.tag_ids = tag_ids;
        }
        if let Some(subtasks) = self.subtasks {
            task.subtasks = subtasks;
        }
    }
}

/// Shallow-merge update for a list or tag.
#[derive(Clone, Debug, Default)]
pub struct NamePatch {
    pub name: Option<String>,
    pub color: Option<String>,
}

/// Completion partition used by `filter_tasks` and the calendar projector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Completed,
    Active,
}

impl StatusFilter {
    pub fn matches(self, task: &Task) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Completed => task.completed,
            StatusFilter::Active => !task.completed,
        }
    }
}

/// Persisted snapshot of the whole task state. Id counters are stored so
/// ids are never reused, even across restarts and deletions.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TasksData {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub lists: Vec<List>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub next_task_id: u64,
    #[serde(default)]
    pub next_list_id: u64,
    #[serde(default)]
    pub next_tag_id: u64,
}

impl Default for TasksData {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            lists: Vec::new(),
            tags: Vec::new(),
            next_task_id: 1,
            next_list_id: 1,
            next_tag_id: 1,
        }
    }
}

impl TasksData {
    /// Starter data for a fresh install: two lists and two tags, no tasks.
    pub fn seeded() -> Self {
        Self {
            tasks: Vec::new(),
            lists: vec![
                List {
                    id: 1,
                    name: "Personal".to_string(),
                    color: "bg-secondary".to_string(),
                },
                List {
                    id: 2,
                    name: "Work".to_string(),
                    color: "bg-accent1".to_string(),
                },
            ],
            tags: vec![
                Tag {
                    id: 1,
                    name: "Tag 1".to_string(),
                    color: "bg-accent1".to_string(),
                },
                Tag {
                    id: 2,
                    name: "Tag 2".to_string(),
                    color: "bg-secondary".to_string(),
                },
            ],
            next_task_id: 1,
            next_list_id: 3,
            next_tag_id: 3,
        }
    }

    /// Repair counters on data written before they existed (or tampered
    /// with): a counter never sits at or below an id already in use.
    pub fn normalize_counters(&mut self) {
        let max_task = self.tasks.iter().map(|t| t.id).max().unwrap_or(0);
        let max_list = self.lists.iter().map(|l| l.id).max().unwrap_or(0);
        let max_tag = self.tags.iter().map(|t| t.id).max().unwrap_or(0);
        self.next_task_id = self.next_task_id.max(max_task + 1);
        self.next_list_id = self.next_list_id.max(max_list + 1);
        self.next_tag_id = self.next_tag_id.max(max_tag + 1);
    }
}
