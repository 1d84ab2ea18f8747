//! organic-mind core: personal task and sticky-notes management.
//!
//! The crate owns the task/list/tag collections with their derived queries
//! (today, upcoming, by list, by tag), the compact due-date format, reminder
//! scheduling over a pluggable notification capability, and the projection of
//! tasks into day/week/month calendar grids. Routing and rendering live in
//! the embedding application.

pub mod calendar;
pub mod dates;
pub mod logging;
pub mod notes;
pub mod reminders;
pub mod settings;
pub mod shared;
pub mod tasks;

pub use calendar::{CalendarCursor, NowMarker, ViewMode};
pub use notes::NotesStore;
pub use reminders::notifier::{LogNotifier, Notifier, Permission};
pub use reminders::ReminderScheduler;
pub use settings::{AppSettings, SettingsStore};
pub use tasks::types::{List, NewTask, StatusFilter, Tag, Task, TaskPatch};
pub use tasks::{StoreError, TaskStore};
