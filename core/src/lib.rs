pub mod error;
pub mod icon;
pub mod lifecycle;
pub mod menu;
pub mod state;

pub use error::IconError;
pub use icon::{Icon, IconStore};
pub use lifecycle::{Lifecycle, Phase};
pub use menu::{Menu, MenuAction, MenuEntry};
pub use state::{SharedTrayState, TrayState};

/// Interfaces that platform shells implement to adapt the core model
/// without pulling in platform-specific dependencies.
pub mod platform {
    use std::path::Path;

    /// Desktop notification surface. A shell keeps at most one outstanding
    /// notification; `notify` replaces it, `hide` clears it.
    pub trait Notifier {
        fn notify(&mut self, title: &str, message: &str, icon: Option<&Path>);
        fn hide(&mut self);
    }

    /// The tray adapter contract exposed to application code.
    pub trait TrayBackend {
        /// Run the tray on the calling thread, blocking until stopped.
        fn run(&self);
        /// Run the tray on a background thread; returns once the icon is up.
        fn run_detached(&self);
        /// Request loop termination. Idempotent; a no-op before `run`.
        fn stop(&self);
        fn notify(&self, message: &str, title: Option<&str>);
        fn remove_notification(&self);
        fn message_box(
            &self,
            message: &str,
            title: &str,
            callback: Option<Box<dyn FnOnce() + Send>>,
        );
        fn error_box(
            &self,
            message: &str,
            title: &str,
            callback: Option<Box<dyn FnOnce() + Send>>,
        );
        fn confirm_box(&self, message: &str, title: &str, callback: Box<dyn FnOnce(bool) + Send>);
    }
}
