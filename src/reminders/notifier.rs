//! Platform notification capability the reminder scheduler calls into.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

/// Something that can show user-facing notifications. Implementations must
/// not panic; a failed delivery is reported through the `bool` return and
/// treated as non-fatal by the scheduler.
pub trait Notifier: Send + Sync {
    /// Current (or freshly requested) permission to notify. The scheduler
    /// consults this before every delivery.
    fn request_permission(&self) -> Permission;

    /// Show a notification. Returns whether it was actually displayed.
    fn show(&self, title: &str, body: &str, tag: &str) -> bool;
}

/// Default capability: writes the notification to the log instead of the
/// screen. Useful headless and as a stand-in until a real backend is wired.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn request_permission(&self) -> Permission {
        Permission::Granted
    }

    fn show(&self, title: &str, body: &str, tag: &str) -> bool {
        tracing::info!(target: "reminders", title, body, tag, "Notification");
        true
    }
}
