//! GTK tray shell for trayshell.
//! Binds the platform-neutral tray model to the GTK3 main loop: status
//! icon, menu translation, modal dialogs, and D-Bus desktop notifications.

mod dialog;
mod mainloop;
mod menu;
mod notifier;
mod tray;

pub use mainloop::post;
pub use notifier::DbusNotifier;
pub use tray::GtkTray;

// GTK is single-threaded; tests that touch it take this lock so the test
// harness's worker threads never drive GTK concurrently.
#[cfg(test)]
pub(crate) fn gtk_test_guard() -> std::sync::MutexGuard<'static, ()> {
    static LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
    LOCK.lock().unwrap_or_else(|e| e.into_inner())
}
