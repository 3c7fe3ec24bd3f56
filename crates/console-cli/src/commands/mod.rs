pub mod chat;
pub mod config;
pub mod list;
pub mod lookups;
pub mod records;

use console_core::list::{Notification, NotificationLevel};

/// Prints view model notifications the way a toast would show them.
pub fn print_notifications(notifications: &[Notification]) {
    for notification in notifications {
        let marker = match notification.level {
            NotificationLevel::Success => "✅",
            NotificationLevel::Info => "ℹ️ ",
            NotificationLevel::Error => "❌",
        };
        eprintln!("{} {}", marker, notification.message);
    }
}
