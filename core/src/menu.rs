// core/src/menu.rs
//
// Platform-neutral menu descriptor tree. Shells translate this into their
// native menu widgets; the descriptors themselves never touch a toolkit.

use std::fmt;
use std::sync::Arc;

/// Callback invoked when a menu item is activated. Runs on the shell's
/// loop thread, so it must not block.
pub type MenuAction = Arc<dyn Fn() + Send + Sync + 'static>;

/// One entry in a menu. An entry that is not `Check` is the "not checkable"
/// case; a `Submenu` carries no direct action by construction.
#[derive(Clone)]
pub enum MenuEntry {
    /// A plain actionable item.
    Standard {
        label: String,
        enabled: bool,
        /// Marks the item invoked when the tray icon itself is activated.
        default: bool,
        action: Option<MenuAction>,
    },
    /// A checkable item, drawn as a checkbox or radio button.
    Check {
        label: String,
        enabled: bool,
        checked: bool,
        radio: bool,
        action: Option<MenuAction>,
    },
    /// An item whose activation opens a nested menu.
    Submenu {
        label: String,
        enabled: bool,
        entries: Vec<MenuEntry>,
    },
    /// A visual separator line, not a text item.
    Separator,
}

impl MenuEntry {
    pub fn label(&self) -> Option<&str> {
        match self {
            MenuEntry::Standard { label, .. }
            | MenuEntry::Check { label, .. }
            | MenuEntry::Submenu { label, .. } => Some(label),
            MenuEntry::Separator => None,
        }
    }

    pub fn is_separator(&self) -> bool {
        matches!(self, MenuEntry::Separator)
    }
}

impl fmt::Debug for MenuEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuEntry::Standard {
                label,
                enabled,
                default,
                action,
            } => f
                .debug_struct("Standard")
                .field("label", label)
                .field("enabled", enabled)
                .field("default", default)
                .field("action", &action.is_some())
                .finish(),
            MenuEntry::Check {
                label,
                enabled,
                checked,
                radio,
                action,
            } => f
                .debug_struct("Check")
                .field("label", label)
                .field("enabled", enabled)
                .field("checked", checked)
                .field("radio", radio)
                .field("action", &action.is_some())
                .finish(),
            MenuEntry::Submenu {
                label,
                enabled,
                entries,
            } => f
                .debug_struct("Submenu")
                .field("label", label)
                .field("enabled", enabled)
                .field("entries", entries)
                .finish(),
            MenuEntry::Separator => write!(f, "Separator"),
        }
    }
}

/// A user-authored menu tree. An empty menu yields no native menu at all.
#[derive(Clone, Debug, Default)]
pub struct Menu {
    entries: Vec<MenuEntry>,
}

impl Menu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Add a plain item. Pass `None` for a label-only entry.
    pub fn add_item(
        &mut self,
        label: impl Into<String>,
        action: Option<MenuAction>,
    ) -> &mut Self {
        self.entries.push(MenuEntry::Standard {
            label: label.into(),
            enabled: true,
            default: false,
            action,
        });
        self
    }

    /// Add a plain item with explicit enabled/default flags.
    pub fn add_item_with(
        &mut self,
        label: impl Into<String>,
        enabled: bool,
        default: bool,
        action: Option<MenuAction>,
    ) -> &mut Self {
        self.entries.push(MenuEntry::Standard {
            label: label.into(),
            enabled,
            default,
            action,
        });
        self
    }

    /// Add a checkable item. `radio` selects the radio-button rendering.
    pub fn add_check_item(
        &mut self,
        label: impl Into<String>,
        checked: bool,
        radio: bool,
        action: Option<MenuAction>,
    ) -> &mut Self {
        self.entries.push(MenuEntry::Check {
            label: label.into(),
            enabled: true,
            checked,
            radio,
            action,
        });
        self
    }

    /// Add a nested menu. Any action on the child entries still fires;
    /// the submenu item itself has none.
    pub fn add_submenu(&mut self, label: impl Into<String>, submenu: Menu) -> &mut Self {
        self.entries.push(MenuEntry::Submenu {
            label: label.into(),
            enabled: true,
            entries: submenu.entries,
        });
        self
    }

    pub fn add_separator(&mut self) -> &mut Self {
        self.entries.push(MenuEntry::Separator);
        self
    }

    /// The action of the first entry flagged `default`, if any. Shells run
    /// it when the tray icon itself is activated (e.g. left click).
    pub fn default_action(&self) -> Option<MenuAction> {
        Self::find_default(&self.entries)
    }

    fn find_default(entries: &[MenuEntry]) -> Option<MenuAction> {
        for entry in entries {
            match entry {
                MenuEntry::Standard {
                    default: true,
                    action,
                    ..
                } => return action.clone(),
                MenuEntry::Submenu { entries, .. } => {
                    if let Some(action) = Self::find_default(entries) {
                        return Some(action);
                    }
                }
                _ => {}
            }
        }
        None
    }
}

impl From<Vec<MenuEntry>> for Menu {
    fn from(entries: Vec<MenuEntry>) -> Self {
        Self { entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn builder_preserves_order_and_kinds() {
        let mut submenu = Menu::new();
        submenu.add_item("child", None);

        let mut menu = Menu::new();
        menu.add_item("first", None)
            .add_separator()
            .add_check_item("second", true, false, None)
            .add_submenu("third", submenu);

        let entries = menu.entries();
        assert_eq!(entries.len(), 4);
        assert!(matches!(entries[0], MenuEntry::Standard { .. }));
        assert!(entries[1].is_separator());
        assert!(matches!(
            entries[2],
            MenuEntry::Check {
                checked: true,
                radio: false,
                ..
            }
        ));
        assert!(matches!(entries[3], MenuEntry::Submenu { .. }));
    }

    #[test]
    fn separator_has_no_label() {
        assert_eq!(MenuEntry::Separator.label(), None);
    }

    #[test]
    fn default_action_found_in_submenu() {
        let hits = Arc::new(AtomicUsize::new(0));
        let hits2 = hits.clone();

        let mut submenu = Menu::new();
        submenu.add_item_with(
            "open",
            true,
            true,
            Some(Arc::new(move || {
                hits2.fetch_add(1, Ordering::SeqCst);
            })),
        );

        let mut menu = Menu::new();
        menu.add_item("plain", None).add_submenu("more", submenu);

        let action = menu.default_action().expect("default entry present");
        action();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn no_default_action_on_plain_menu() {
        let mut menu = Menu::new();
        menu.add_item("plain", None).add_separator();
        assert!(menu.default_action().is_none());
    }
}
