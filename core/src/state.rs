// core/src/state.rs
//
// State shared between the application-facing handle and the shell's loop
// thread. Mutators replace whole fields; shells re-read on demand and
// rebuild natively from scratch (no incremental diffing).

use std::sync::{Arc, Mutex};

use crate::icon::Icon;
use crate::menu::Menu;

/// The platform-neutral description of one tray icon.
#[derive(Debug, Default)]
pub struct TrayState {
    pub title: String,
    pub icon: Option<Icon>,
    pub menu: Menu,
}

impl TrayState {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            icon: None,
            menu: Menu::new(),
        }
    }

    pub fn with_icon(mut self, icon: impl Into<Icon>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_menu(mut self, menu: Menu) -> Self {
        self.menu = menu;
        self
    }
}

/// Handle shared across threads. The loop thread holds it while painting;
/// application threads hold it briefly while replacing fields.
pub type SharedTrayState = Arc<Mutex<TrayState>>;

pub fn shared(state: TrayState) -> SharedTrayState {
    Arc::new(Mutex::new(state))
}
