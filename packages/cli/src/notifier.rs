//! Styled terminal output for flow notifications.

use console::style;
use water_map_app::notify::{Notification, Notifier};
use water_map_cli_utils::MultiProgress;

/// Prints notifications as styled lines, suspending any active spinner.
pub struct ConsoleNotifier {
    multi: MultiProgress,
}

impl ConsoleNotifier {
    /// Creates a notifier that prints around the spinners of `multi`.
    pub const fn new(multi: MultiProgress) -> Self {
        Self { multi }
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: &Notification) {
        log::debug!("Notification: {}", notification.as_ref());

        let line = if notification.is_error() {
            style(format!("x {notification}")).red().bold()
        } else {
            style(format!("v {notification}")).green()
        };
        self.multi.suspend(|| println!("{line}"));
    }
}
