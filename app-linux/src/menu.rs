// app-linux/src/menu.rs
//
// Recursive translation of the descriptor tree into gtk::Menu widgets.
// Rebuilt from scratch every time the menu is shown or replaced; there is
// no incremental diffing.

use gtk::prelude::*;

use trayshell_core::menu::{MenuAction, MenuEntry};

use crate::mainloop;

/// Build a native menu from descriptors. An empty slice yields no menu.
pub(crate) fn build_menu(entries: &[MenuEntry]) -> Option<gtk::Menu> {
    if entries.is_empty() {
        return None;
    }

    let menu = gtk::Menu::new();
    for entry in entries {
        menu.append(&build_entry(entry));
    }
    menu.show_all();
    Some(menu)
}

fn build_entry(entry: &MenuEntry) -> gtk::MenuItem {
    match entry {
        MenuEntry::Separator => gtk::SeparatorMenuItem::new().upcast(),

        MenuEntry::Standard {
            label,
            enabled,
            action,
            ..
        } => {
            let item = gtk::MenuItem::with_label(label);
            connect_action(&item, action);
            item.set_sensitive(*enabled);
            item
        }

        MenuEntry::Check {
            label,
            enabled,
            checked,
            radio,
            action,
        } => {
            let item = gtk::CheckMenuItem::with_label(label);
            item.set_active(*checked);
            item.set_draw_as_radio(*radio);
            connect_action(item.upcast_ref(), action);
            item.set_sensitive(*enabled);
            item.upcast()
        }

        // A submenu entry never carries a direct action.
        MenuEntry::Submenu {
            label,
            enabled,
            entries,
        } => {
            let item = gtk::MenuItem::with_label(label);
            if let Some(submenu) = build_menu(entries) {
                item.set_submenu(Some(&submenu));
            }
            item.set_sensitive(*enabled);
            item
        }
    }
}

fn connect_action(item: &gtk::MenuItem, action: &Option<MenuAction>) {
    if let Some(action) = action {
        let action = action.clone();
        item.connect_activate(move |_| mainloop::run_guarded(|| action()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_descriptor_list_yields_no_menu() {
        assert!(build_menu(&[]).is_none());
    }

    // GTK widgets need a display; one test keeps all widget assertions on a
    // single thread and skips cleanly on headless machines.
    #[test]
    fn translation_maps_each_descriptor_kind() {
        let _guard = crate::gtk_test_guard();
        if gtk::init().is_err() {
            eprintln!("skipping: no display available");
            return;
        }

        // A list of only a separator: exactly one entry, nothing actionable.
        let menu = build_menu(&[MenuEntry::Separator]).unwrap();
        let children = menu.children();
        assert_eq!(children.len(), 1);
        assert!(children[0].is::<gtk::SeparatorMenuItem>());

        // Check-state fidelity, including the radio rendering flag.
        let menu = build_menu(&[
            MenuEntry::Check {
                label: "checked".into(),
                enabled: true,
                checked: true,
                radio: false,
                action: None,
            },
            MenuEntry::Check {
                label: "radio off".into(),
                enabled: true,
                checked: false,
                radio: true,
                action: None,
            },
            MenuEntry::Standard {
                label: "plain".into(),
                enabled: false,
                default: false,
                action: None,
            },
        ])
        .unwrap();
        let children = menu.children();

        let checked = children[0].downcast_ref::<gtk::CheckMenuItem>().unwrap();
        assert!(checked.is_active());
        assert!(!checked.draws_as_radio());

        let radio = children[1].downcast_ref::<gtk::CheckMenuItem>().unwrap();
        assert!(!radio.is_active());
        assert!(radio.draws_as_radio());

        // An unset check state stays a plain item, rendered insensitive.
        assert!(!children[2].is::<gtk::CheckMenuItem>());
        assert!(!children[2].is_sensitive());

        // Submenu recursion attaches a nested menu.
        let menu = build_menu(&[MenuEntry::Submenu {
            label: "more".into(),
            enabled: true,
            entries: vec![MenuEntry::Standard {
                label: "child".into(),
                enabled: true,
                default: false,
                action: None,
            }],
        }])
        .unwrap();
        let item = menu.children()[0]
            .downcast_ref::<gtk::MenuItem>()
            .unwrap()
            .clone();
        let submenu = item
            .submenu()
            .and_then(|w| w.downcast::<gtk::Menu>().ok())
            .expect("nested menu attached");
        assert_eq!(submenu.children().len(), 1);
    }
}
