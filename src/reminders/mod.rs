//! Reminder scheduling: one pending one-shot timer per task that has a due
//! date and reminder time, is not completed, and whose fire time is still in
//! the future.
//!
//! `sync` reconciles the pending timers against the current task set with a
//! targeted diff: timers whose fire time and notification text are unchanged
//! keep running, everything else is aborted or freshly spawned. Past-due
//! reminders are skipped silently, with no catch-up firing. Permission is
//! consulted at delivery time, so a revoked grant suppresses the
//! notification without touching the timer set.

pub mod notifier;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{Local, NaiveDateTime};
use tokio::task::JoinHandle;

use crate::dates;
use crate::tasks::types::Task;
use notifier::{Notifier, Permission};

struct ScheduledReminder {
    fire_at: NaiveDateTime,
    // Notification text captured at spawn time; edits to it invalidate the timer.
    todo: String,
    description: String,
    handle: JoinHandle<()>,
}

/// Live set of pending reminder timers, keyed by task id.
///
/// All mutation goes through `sync`/`cancel_all`; timer callbacks only read
/// task data and never touch the map, so the single `Mutex` is uncontended
/// in practice. Must be used inside a tokio runtime.
pub struct ReminderScheduler {
    notifier: Arc<dyn Notifier>,
    timers: Mutex<HashMap<u64, ScheduledReminder>>,
}

impl ReminderScheduler {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            notifier,
            timers: Mutex::new(HashMap::new()),
        }
    }

    /// The moment a task's reminder should fire, if it has one.
    fn fire_time(task: &Task) -> Option<NaiveDateTime> {
        if !task.has_active_reminder() {
            return None;
        }
        dates::combine_reminder(task.due_date.as_deref()?, task.reminder_time.as_deref()?)
    }

    /// Reconcile pending timers against the current task set, using the
    /// local wall clock. Call whenever the task set or the enabled flag
    /// changes.
    pub fn sync(&self, tasks: &[Task], enabled: bool) {
        self.sync_at(tasks, enabled, Local::now().naive_local());
    }

    /// Reconciliation against an explicit `now`, so eligibility windows are
    /// testable with fixed clocks.
    pub fn sync_at(&self, tasks: &[Task], enabled: bool, now: NaiveDateTime) {
        if !enabled {
            self.cancel_all();
            return;
        }

        let mut desired: HashMap<u64, (NaiveDateTime, Task)> = HashMap::new();
        for task in tasks {
            if let Some(at) = Self::fire_time(task) {
                if at > now {
                    desired.insert(task.id, (at, task.clone()));
                } else {
                    tracing::debug!(
                        target: "reminders",
                        id = task.id,
                        "Reminder is in the past, skipping"
                    );
                }
            }
        }

        let mut timers = self.timers.lock().unwrap();

        // Drop fired timers and abort the ones whose task disappeared,
        // completed, moved to a different fire time, or changed the text the
        // notification would carry.
        timers.retain(|id, scheduled| {
            let keep = !scheduled.handle.is_finished()
                && matches!(
                    desired.get(id),
                    Some((at, task)) if *at == scheduled.fire_at
                        && task.todo == scheduled.todo
                        && task.description == scheduled.description
                );
            if !keep {
                scheduled.handle.abort();
                tracing::debug!(target: "reminders", id, "Reminder canceled");
            }
            keep
        });

        for (id, (fire_at, task)) in desired {
            if timers.contains_key(&id) {
                continue;
            }
            let delay = (fire_at - now).to_std().unwrap_or_default();
            let todo = task.todo.clone();
            let description = task.description.clone();
            let notifier = Arc::clone(&self.notifier);
            let handle = tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                // Permission is re-checked per delivery; it may have been
                // revoked since scheduling.
                if notifier.request_permission() == Permission::Denied {
                    tracing::warn!(target: "reminders", id = task.id, "Notification permission denied");
                    return;
                }
                let title = format!("Reminder: {}", task.todo);
                let body = if task.description.is_empty() {
                    "Task reminder"
                } else {
                    task.description.as_str()
                };
                let tag = format!("task-{}", task.id);
                if !notifier.show(&title, body, &tag) {
                    tracing::warn!(target: "reminders", id = task.id, "Notification was not shown");
                }
            });
            tracing::debug!(target: "reminders", id, fire_at = %fire_at, "Reminder scheduled");
            timers.insert(
                id,
                ScheduledReminder {
                    fire_at,
                    todo,
                    description,
                    handle,
                },
            );
        }
    }

    /// Abort every pending timer.
    pub fn cancel_all(&self) {
        let mut timers = self.timers.lock().unwrap();
        for (_, scheduled) in timers.drain() {
            scheduled.handle.abort();
        }
    }

    /// Number of timers currently pending.
    pub fn pending(&self) -> usize {
        let mut timers = self.timers.lock().unwrap();
        timers.retain(|_, scheduled| !scheduled.handle.is_finished());
        timers.len()
    }
}

impl Drop for ReminderScheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use super::notifier::{Notifier, Permission};
    use super::*;
    use crate::tasks::types::Task;
    use chrono::NaiveDate;
    use std::time::Duration;

    struct RecordingNotifier {
        permission: Permission,
        shown: Mutex<Vec<(String, String, String)>>,
    }

    impl RecordingNotifier {
        fn granted() -> Self {
            Self {
                permission: Permission::Granted,
                shown: Mutex::new(Vec::new()),
            }
        }

        fn denied() -> Self {
            Self {
                permission: Permission::Denied,
                shown: Mutex::new(Vec::new()),
            }
        }
    }

    impl Notifier for RecordingNotifier {
        fn request_permission(&self) -> Permission {
            self.permission
        }

        fn show(&self, title: &str, body: &str, tag: &str) -> bool {
            self.shown
                .lock()
                .unwrap()
                .push((title.to_string(), body.to_string(), tag.to_string()));
            true
        }
    }

    fn reminder_task(id: u64, todo: &str, due: &str, at: &str) -> Task {
        Task {
            id,
            todo: todo.to_string(),
            completed: false,
            description: String::new(),
            due_date: Some(due.to_string()),
            reminder_time: Some(at.to_string()),
            list_id: None,
            tag_ids: Vec::new(),
            subtasks: Vec::new(),
        }
    }

    fn fixed_now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 15)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn future_reminder_fires_with_task_content() {
        let notifier = Arc::new(RecordingNotifier::granted());
        let scheduler = ReminderScheduler::new(notifier.clone());

        let mut task = reminder_task(1, "call dentist", "15-06-24", "08:10");
        task.description = "ask about friday".to_string();
        scheduler.sync_at(&[task], true, fixed_now());
        assert_eq!(scheduler.pending(), 1);

        // Paused clock auto-advances past the 10 minute delay.
        tokio::time::sleep(Duration::from_secs(11 * 60)).await;

        let shown = notifier.shown.lock().unwrap();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].0, "Reminder: call dentist");
        assert_eq!(shown[0].1, "ask about friday");
        assert_eq!(shown[0].2, "task-1");
    }

    #[tokio::test(start_paused = true)]
    async fn completing_the_task_before_fire_time_cancels_it() {
        let notifier = Arc::new(RecordingNotifier::granted());
        let scheduler = ReminderScheduler::new(notifier.clone());

        let mut task = reminder_task(1, "water plants", "15-06-24", "08:10");
        scheduler.sync_at(std::slice::from_ref(&task), true, fixed_now());
        assert_eq!(scheduler.pending(), 1);

        task.completed = true;
        scheduler.sync_at(&[task], true, fixed_now());
        assert_eq!(scheduler.pending(), 0);

        tokio::time::sleep(Duration::from_secs(20 * 60)).await;
        assert!(notifier.shown.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn past_due_reminders_are_skipped() {
        let notifier = Arc::new(RecordingNotifier::granted());
        let scheduler = ReminderScheduler::new(notifier.clone());

        let task = reminder_task(1, "too late", "15-06-24", "07:00");
        scheduler.sync_at(&[task], true, fixed_now());

        assert_eq!(scheduler.pending(), 0);
        tokio::time::sleep(Duration::from_secs(3600)).await;
        assert!(notifier.shown.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn disabling_notifications_cancels_everything() {
        let notifier = Arc::new(RecordingNotifier::granted());
        let scheduler = ReminderScheduler::new(notifier.clone());

        let task = reminder_task(1, "quiet", "15-06-24", "09:00");
        scheduler.sync_at(std::slice::from_ref(&task), true, fixed_now());
        assert_eq!(scheduler.pending(), 1);

        scheduler.sync_at(&[task], false, fixed_now());
        assert_eq!(scheduler.pending(), 0);

        tokio::time::sleep(Duration::from_secs(2 * 3600)).await;
        assert!(notifier.shown.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn unchanged_tasks_do_not_accumulate_timers() {
        let notifier = Arc::new(RecordingNotifier::granted());
        let scheduler = ReminderScheduler::new(notifier.clone());

        let task = reminder_task(1, "steady", "15-06-24", "09:00");
        scheduler.sync_at(std::slice::from_ref(&task), true, fixed_now());
        scheduler.sync_at(std::slice::from_ref(&task), true, fixed_now());
        scheduler.sync_at(&[task], true, fixed_now());

        assert_eq!(scheduler.pending(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn moving_the_reminder_reschedules_it() {
        let notifier = Arc::new(RecordingNotifier::granted());
        let scheduler = ReminderScheduler::new(notifier.clone());

        let task = reminder_task(1, "moved", "15-06-24", "08:05");
        scheduler.sync_at(&[task], true, fixed_now());

        let task = reminder_task(1, "moved", "15-06-24", "09:30");
        scheduler.sync_at(&[task], true, fixed_now());
        assert_eq!(scheduler.pending(), 1);

        // Old fire time passes without a notification.
        tokio::time::sleep(Duration::from_secs(10 * 60)).await;
        assert!(notifier.shown.lock().unwrap().is_empty());

        // New fire time delivers it.
        tokio::time::sleep(Duration::from_secs(85 * 60)).await;
        assert_eq!(notifier.shown.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn editing_the_task_refreshes_notification_text() {
        let notifier = Arc::new(RecordingNotifier::granted());
        let scheduler = ReminderScheduler::new(notifier.clone());

        let task = reminder_task(1, "old title", "15-06-24", "08:10");
        scheduler.sync_at(&[task], true, fixed_now());

        // Rename without moving the fire time; the timer must not keep
        // delivering the stale text.
        let mut renamed = reminder_task(1, "new title", "15-06-24", "08:10");
        renamed.description = "updated notes".to_string();
        scheduler.sync_at(&[renamed], true, fixed_now());
        assert_eq!(scheduler.pending(), 1);

        tokio::time::sleep(Duration::from_secs(11 * 60)).await;

        let shown = notifier.shown.lock().unwrap();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].0, "Reminder: new title");
        assert_eq!(shown[0].1, "updated notes");
        assert_eq!(shown[0].2, "task-1");
    }

    #[tokio::test(start_paused = true)]
    async fn denied_permission_suppresses_delivery() {
        let notifier = Arc::new(RecordingNotifier::denied());
        let scheduler = ReminderScheduler::new(notifier.clone());

        let task = reminder_task(1, "muted", "15-06-24", "08:10");
        scheduler.sync_at(&[task], true, fixed_now());
        assert_eq!(scheduler.pending(), 1);

        tokio::time::sleep(Duration::from_secs(11 * 60)).await;
        assert!(notifier.shown.lock().unwrap().is_empty());
    }
}
