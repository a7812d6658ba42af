//! Tray demo: exercises menus, icon swapping, notifications and dialogs.

mod config;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use image::{Rgba, RgbaImage};
use log::info;

use trayshell_core::{Icon, Menu, MenuAction, TrayState};
use trayshell_linux::GtkTray;

use crate::config::DemoConfig;

fn main() {
    env_logger::init();
    info!("starting trayshell demo");

    let config = config::load();
    let icon = match &config.icon_path {
        Some(path) => Icon::Path(path.clone()),
        None => Icon::Bitmap(checkerboard(64, 64, [0, 0, 0, 255], [255, 255, 255, 255])),
    };

    let tray = GtkTray::new(TrayState::new(&config.title).with_icon(icon));
    let sounds_on = Arc::new(AtomicBool::new(true));
    tray.set_menu(full_menu(&tray, &config, &sounds_on));

    // Ctrl+C tears the loop down through the normal finalization path.
    {
        let tray = tray.clone();
        ctrlc::set_handler(move || {
            info!("received signal; stopping tray");
            tray.stop();
        })
        .expect("Error setting Ctrl-C handler");
    }

    tray.run();
    info!("demo finished");
}

fn action<F: Fn() + Send + Sync + 'static>(f: F) -> Option<MenuAction> {
    Some(Arc::new(f))
}

// The checkmark state is re-derived from `sounds_on` on every rebuild, so
// the rendered menu always reflects the current toggle.
fn full_menu(tray: &GtkTray, config: &DemoConfig, sounds_on: &Arc<AtomicBool>) -> Menu {
    let mut submenu = Menu::new();
    submenu.add_item("Hello, I'm a submenu", None);

    let mut menu = Menu::new();
    menu.add_item_with("Disabled item", false, false, None);
    menu.add_item_with(
        "Default item",
        true,
        true,
        action(|| info!("default action fired")),
    );
    menu.add_submenu("Submenu", submenu);
    menu.add_check_item(
        "Sounds",
        sounds_on.load(Ordering::SeqCst),
        false,
        action({
            let tray = tray.clone();
            let config = config.clone();
            let sounds_on = sounds_on.clone();
            move || {
                let now = !sounds_on.fetch_xor(true, Ordering::SeqCst);
                info!("sounds toggled to {now}");
                tray.set_menu(full_menu(&tray, &config, &sounds_on));
            }
        }),
    );
    menu.add_check_item("Radio style", true, true, None);
    menu.add_separator();

    menu.add_item(
        "Swap to minimal menu",
        action({
            let tray = tray.clone();
            let config = config.clone();
            let sounds_on = sounds_on.clone();
            move || tray.set_menu(minimal_menu(&tray, &config, &sounds_on))
        }),
    );
    menu.add_item(
        "Set icon from bitmap",
        action({
            let tray = tray.clone();
            move || tray.set_icon(checkerboard(64, 64, [200, 30, 30, 255], [30, 30, 200, 255]))
        }),
    );
    if let Some(path) = config.icon_path.clone() {
        menu.add_item(
            "Set icon from file",
            action({
                let tray = tray.clone();
                move || tray.set_icon(Icon::Path(path.clone()))
            }),
        );
    }
    menu.add_item(
        "Notify",
        action({
            let tray = tray.clone();
            move || tray.notify("Wooorld", Some("Hello"))
        }),
    );
    menu.add_item(
        "Clear notification",
        action({
            let tray = tray.clone();
            move || tray.remove_notification()
        }),
    );
    menu.add_separator();

    menu.add_item(
        "Message box",
        action({
            let tray = tray.clone();
            move || {
                tray.message_box(
                    "I'm a message",
                    "Demo",
                    Some(Box::new(|| info!("message box closed"))),
                )
            }
        }),
    );
    menu.add_item(
        "Error box",
        action({
            let tray = tray.clone();
            move || tray.error_box("I'm an error", "Demo", None)
        }),
    );
    menu.add_item(
        "Confirm box",
        action({
            let tray = tray.clone();
            move || {
                let tray2 = tray.clone();
                tray.confirm_box(
                    "Do you like pancakes?",
                    "Demo",
                    Box::new(move |yes| {
                        let reply = if yes { "Me too" } else { "..." };
                        tray2.message_box(reply, "Demo", None);
                    }),
                )
            }
        }),
    );
    menu.add_separator();

    menu.add_item(
        "Quit",
        action({
            let tray = tray.clone();
            move || tray.stop()
        }),
    );
    menu
}

fn minimal_menu(tray: &GtkTray, config: &DemoConfig, sounds_on: &Arc<AtomicBool>) -> Menu {
    let mut menu = Menu::new();
    menu.add_item(
        "Go back",
        action({
            let tray = tray.clone();
            let config = config.clone();
            let sounds_on = sounds_on.clone();
            move || tray.set_menu(full_menu(&tray, &config, &sounds_on))
        }),
    );
    menu
}

/// Two-color checkerboard, the classic placeholder tray bitmap.
fn checkerboard(width: u32, height: u32, a: [u8; 4], b: [u8; 4]) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        let top_right = x >= width / 2 && y < height / 2;
        let bottom_left = x < width / 2 && y >= height / 2;
        if top_right || bottom_left {
            Rgba(b)
        } else {
            Rgba(a)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use trayshell_core::MenuEntry;

    fn check_state(menu: &Menu, wanted: &str) -> Option<bool> {
        menu.entries().iter().find_map(|entry| match entry {
            MenuEntry::Check { label, checked, .. } if label == wanted => Some(*checked),
            _ => None,
        })
    }

    #[test]
    fn sounds_checkmark_tracks_the_toggle_across_rebuilds() {
        let tray = GtkTray::new(TrayState::new("test"));
        let config = DemoConfig::default();
        let sounds_on = Arc::new(AtomicBool::new(true));

        let menu = full_menu(&tray, &config, &sounds_on);
        assert_eq!(check_state(&menu, "Sounds"), Some(true));

        sounds_on.store(false, Ordering::SeqCst);
        let menu = full_menu(&tray, &config, &sounds_on);
        assert_eq!(check_state(&menu, "Sounds"), Some(false));
    }

    #[test]
    fn checkerboard_has_both_colors() {
        let img = checkerboard(4, 4, [0, 0, 0, 255], [255, 255, 255, 255]);
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0, 255]);
        assert_eq!(img.get_pixel(3, 0).0, [255, 255, 255, 255]);
    }
}
