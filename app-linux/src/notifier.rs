// app-linux/src/notifier.rs
//
// Desktop notifications over the org.freedesktop.Notifications D-Bus
// service. One outstanding notification per tray instance: a new notify
// reuses the previous server id so the daemon replaces it in place.

use std::path::Path;

use log::warn;
use notify_rust::{Notification, NotificationHandle};

use trayshell_core::platform::Notifier;

#[derive(Default)]
pub struct DbusNotifier {
    current: Option<NotificationHandle>,
}

impl DbusNotifier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Notifier for DbusNotifier {
    fn notify(&mut self, title: &str, message: &str, icon: Option<&Path>) {
        let mut notification = Notification::new();
        notification.summary(title).body(message);
        if let Some(path) = icon {
            notification.icon(&path.to_string_lossy());
        }
        if let Some(previous) = self.current.take() {
            notification.id(previous.id());
        }

        match notification.show() {
            Ok(handle) => self.current = Some(handle),
            Err(e) => warn!("could not show desktop notification: {e}"),
        }
    }

    fn hide(&mut self) {
        if let Some(handle) = self.current.take() {
            handle.close();
        }
    }
}
