//! Derived queries over the task collection.
//!
//! All date-dependent queries take the reference day explicitly so behavior
//! is testable against fixed dates; the `_now` variants plug in the local
//! wall-clock day. Tasks whose due date fails to parse are excluded from the
//! result (logged, never an error): the fail-open policy shared with the
//! calendar projector. [`TaskStore::tasks_with_invalid_due_dates`] is the
//! diagnostic counterpart that surfaces exactly those tasks.

use chrono::{Local, NaiveDate};

use super::types::{List, StatusFilter, Tag, Task};
use super::TaskStore;
use crate::dates;

/// Parsed due day of a task, logging unparseable values once per query pass.
fn due_day(task: &Task) -> Option<NaiveDate> {
    let raw = task.due_date.as_deref()?;
    let parsed = dates::parse_due_day(raw);
    if parsed.is_none() {
        tracing::debug!(
            target: "tasks",
            id = task.id,
            due_date = raw,
            "Unparseable due date, excluding task from derived view"
        );
    }
    parsed
}

impl TaskStore {
    /// Tasks due exactly on `today` (date-only comparison, time stripped).
    /// Tasks without a due date are not today tasks.
    pub fn today_tasks(&self, today: NaiveDate) -> Vec<Task> {
        self.read()
            .tasks
            .iter()
            .filter(|t| due_day(t) == Some(today))
            .cloned()
            .collect()
    }

    pub fn today_tasks_now(&self) -> Vec<Task> {
        self.today_tasks(Local::now().date_naive())
    }

    /// Tasks due strictly after `today` (date-only comparison).
    pub fn upcoming_tasks(&self, today: NaiveDate) -> Vec<Task> {
        self.read()
            .tasks
            .iter()
            .filter(|t| matches!(due_day(t), Some(day) if day > today))
            .cloned()
            .collect()
    }

    pub fn upcoming_tasks_now(&self) -> Vec<Task> {
        self.upcoming_tasks(Local::now().date_naive())
    }

    /// Partition by completion flag.
    pub fn filter_tasks(&self, filter: StatusFilter) -> Vec<Task> {
        self.read()
            .tasks
            .iter()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect()
    }

    pub fn tasks_by_list(&self, list_id: u64) -> Vec<Task> {
        self.read()
            .tasks
            .iter()
            .filter(|t| t.list_id == Some(list_id))
            .cloned()
            .collect()
    }

    pub fn tasks_by_tag(&self, tag_id: u64) -> Vec<Task> {
        self.read()
            .tasks
            .iter()
            .filter(|t| t.tag_ids.contains(&tag_id))
            .cloned()
            .collect()
    }

    /// Tasks the reminder scheduler should consider: due date and reminder
    /// time both set, not completed.
    pub fn tasks_with_reminders(&self) -> Vec<Task> {
        self.read()
            .tasks
            .iter()
            .filter(|t| t.has_active_reminder())
            .cloned()
            .collect()
    }

    /// Diagnostic view: tasks carrying a due date that no view can place.
    /// These silently vanish from Today/Upcoming/calendar otherwise.
    pub fn tasks_with_invalid_due_dates(&self) -> Vec<Task> {
        self.read()
            .tasks
            .iter()
            .filter(|t| {
                t.due_date
                    .as_deref()
                    .is_some_and(|raw| dates::parse_due_day(raw).is_none())
            })
            .cloned()
            .collect()
    }

    pub fn lists(&self) -> Vec<List> {
        self.read().lists.clone()
    }

    pub fn tags(&self) -> Vec<Tag> {
        self.read().tags.clone()
    }

    /// Resolve the display name of a list reference. Tasks keep ids, names
    /// are looked up at read time so renames stay consistent.
    pub fn list_name(&self, id: u64) -> Option<String> {
        self.read()
            .lists
            .iter()
            .find(|l| l.id == id)
            .map(|l| l.name.clone())
    }

    pub fn tag_name(&self, id: u64) -> Option<String> {
        self.read()
            .tags
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.name.clone())
    }
}
