// app-linux/src/tray.rs
//
// The tray adapter. Application threads hold a cheap-clone handle and talk
// to the GTK loop thread exclusively through posted closures; everything
// widget-shaped lives in a loop-thread registry and never crosses threads.

use std::cell::RefCell;
use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once, mpsc};
use std::thread;
use std::time::{Duration, Instant};

use gtk::prelude::*;
use log::{debug, error, info};

use trayshell_core::platform::{Notifier, TrayBackend};
use trayshell_core::{Icon, IconStore, Lifecycle, Menu, Phase, TrayState};

use crate::dialog;
use crate::mainloop;
use crate::notifier::DbusNotifier;

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

thread_local! {
    // Loop-thread-only widget state, keyed by adapter id. Only posted
    // closures and signal handlers touch this.
    static INSTANCES: RefCell<HashMap<usize, LoopState>> = RefCell::new(HashMap::new());
}

/// Resources owned by the GTK loop thread for one tray instance.
struct LoopState {
    status_icon: gtk::StatusIcon,
    icon_store: IconStore,
    notifier: DbusNotifier,
    state: trayshell_core::SharedTrayState,
}

impl LoopState {
    fn refresh_icon(&mut self) {
        let icon = { self.state.lock().unwrap().icon.clone() };
        match icon {
            Some(icon) => match self.icon_store.materialize(&icon) {
                Ok(path) => {
                    self.status_icon.set_from_file(path);
                    self.status_icon.set_visible(true);
                }
                Err(e) => error!("could not materialize tray icon: {e}"),
            },
            None => {
                self.icon_store.clear();
                self.status_icon.set_visible(false);
            }
        }
    }

    fn refresh_title(&self) {
        let title = { self.state.lock().unwrap().title.clone() };
        self.status_icon.set_title(&title);
        self.status_icon.set_tooltip_text(Some(&title));
    }
}

// Detached trays are finalized at process exit: the hook stops each loop
// and waits for its loop thread to run the normal cleanup path, so the
// temp icon file and any outstanding notification are not orphaned.
static EXIT_TRAYS: Mutex<Vec<GtkTray>> = Mutex::new(Vec::new());
static EXIT_HOOK: Once = Once::new();

extern "C" fn exit_cleanup() {
    run_exit_cleanup();
}

fn run_exit_cleanup() {
    let trays: Vec<GtkTray> = {
        let mut registry = EXIT_TRAYS.lock().unwrap_or_else(|e| e.into_inner());
        registry.drain(..).collect()
    };
    for tray in trays {
        tray.finalize_on_exit();
    }
}

fn register_exit_cleanup(tray: &GtkTray) {
    EXIT_TRAYS.lock().unwrap().push(tray.clone());
    EXIT_HOOK.call_once(|| {
        let rc = unsafe { libc::atexit(exit_cleanup) };
        if rc != 0 {
            error!("could not register process-exit cleanup hook");
        }
    });
}

fn with_instance<F: FnOnce(&mut LoopState)>(id: usize, f: F) {
    INSTANCES.with(|instances| {
        let mut map = instances.borrow_mut();
        match map.get_mut(&id) {
            Some(instance) => f(instance),
            None => debug!("tray {id} is not running; request ignored"),
        }
    });
}

struct Inner {
    id: usize,
    state: trayshell_core::SharedTrayState,
    lifecycle: Lifecycle,
    main_loop: Mutex<Option<glib::MainLoop>>,
    ready_tx: Mutex<Option<mpsc::Sender<()>>>,
}

/// A tray icon backed by `gtk::StatusIcon`.
///
/// The handle is `Clone + Send + Sync`; every UI mutation is marshaled onto
/// the GTK main loop. `run` blocks the calling thread, which becomes the
/// loop thread; `run_detached` does the same on a background thread.
#[derive(Clone)]
pub struct GtkTray {
    inner: Arc<Inner>,
}

impl GtkTray {
    pub fn new(state: TrayState) -> Self {
        Self {
            inner: Arc::new(Inner {
                id: NEXT_ID.fetch_add(1, Ordering::SeqCst),
                state: trayshell_core::state::shared(state),
                lifecycle: Lifecycle::new(),
                main_loop: Mutex::new(None),
                ready_tx: Mutex::new(None),
            }),
        }
    }

    /// Run the tray, blocking until `stop` is called. The calling thread
    /// owns all GTK state for the lifetime of the loop.
    pub fn run(&self) {
        if !self.inner.lifecycle.begin_init() {
            return;
        }
        if let Err(e) = gtk::init() {
            error!("could not initialize GTK: {e}");
            self.inner.ready_tx.lock().unwrap().take();
            self.inner.lifecycle.begin_finalize();
            self.inner.lifecycle.mark_stopped();
            return;
        }

        let main_loop = glib::MainLoop::new(None, false);
        *self.inner.main_loop.lock().unwrap() = Some(main_loop.clone());

        self.initialize();
        self.inner.lifecycle.mark_running();
        self.mark_ready();

        // A panic escaping the loop is logged; finalization still runs.
        if catch_unwind(AssertUnwindSafe(|| main_loop.run())).is_err() {
            error!("an error occurred in the main loop");
        }

        self.inner.lifecycle.begin_finalize();
        self.finalize();
        self.inner.lifecycle.mark_stopped();
        info!("tray {} stopped", self.inner.id);
    }

    /// Run the tray on a background thread; returns once the icon is up
    /// (or startup failed). An exit hook performs the same finalization as
    /// the blocking path when the process ends without `stop`.
    pub fn run_detached(&self) {
        register_exit_cleanup(self);

        let (tx, rx) = mpsc::channel();
        *self.inner.ready_tx.lock().unwrap() = Some(tx);

        let this = self.clone();
        let spawned = thread::Builder::new()
            .name("trayshell-gtk".into())
            .spawn(move || this.run());
        if let Err(e) = spawned {
            error!("could not spawn tray thread: {e}");
            return;
        }

        // Unblocks on ready, or on sender drop if startup failed.
        let _ = rx.recv();
    }

    /// Request loop termination. Idempotent; a no-op before `run`.
    pub fn stop(&self) {
        if !self.inner.lifecycle.request_stop() {
            return;
        }
        let main_loop = self.inner.main_loop.lock().unwrap().clone();
        if let Some(main_loop) = main_loop {
            // Quitting mutates loop state, so it is marshaled like any
            // other UI mutation.
            mainloop::post(move || main_loop.quit());
        }
    }

    /// Replace the icon. Takes effect on the loop thread; a previous
    /// adapter-owned temp file is removed there.
    pub fn set_icon(&self, icon: impl Into<Icon>) {
        self.inner.state.lock().unwrap().icon = Some(icon.into());
        let id = self.inner.id;
        mainloop::post(move || with_instance(id, LoopState::refresh_icon));
    }

    pub fn set_title(&self, title: impl Into<String>) {
        self.inner.state.lock().unwrap().title = title.into();
        let id = self.inner.id;
        mainloop::post(move || with_instance(id, |instance| instance.refresh_title()));
    }

    /// Replace the menu tree. The native menu is rebuilt from scratch the
    /// next time it is shown.
    pub fn set_menu(&self, menu: Menu) {
        self.inner.state.lock().unwrap().menu = menu;
    }

    pub fn notify(&self, message: &str, title: Option<&str>) {
        let id = self.inner.id;
        let fallback = self.inner.state.clone();
        let message = message.to_owned();
        let title = title.map(str::to_owned);
        mainloop::post(move || {
            with_instance(id, |instance| {
                let title =
                    title.unwrap_or_else(|| fallback.lock().unwrap().title.clone());
                let icon = instance.icon_store.path().map(Path::to_path_buf);
                instance.notifier.notify(&title, &message, icon.as_deref());
            });
        });
    }

    pub fn remove_notification(&self) {
        let id = self.inner.id;
        mainloop::post(move || with_instance(id, |instance| instance.notifier.hide()));
    }

    pub fn message_box(
        &self,
        message: &str,
        title: &str,
        callback: Option<Box<dyn FnOnce() + Send>>,
    ) {
        self.show_box(gtk::MessageType::Info, message, title, callback);
    }

    pub fn error_box(
        &self,
        message: &str,
        title: &str,
        callback: Option<Box<dyn FnOnce() + Send>>,
    ) {
        self.show_box(gtk::MessageType::Error, message, title, callback);
    }

    /// Ask a yes/no question; the callback receives true iff the user
    /// pressed the affirmative button.
    pub fn confirm_box(&self, message: &str, title: &str, callback: Box<dyn FnOnce(bool) + Send>) {
        let message = message.to_owned();
        let title = title.to_owned();
        mainloop::post(move || {
            let confirmed = dialog::confirm_dialog(&title, &message);
            callback(confirmed);
        });
    }

    fn show_box(
        &self,
        kind: gtk::MessageType,
        message: &str,
        title: &str,
        callback: Option<Box<dyn FnOnce() + Send>>,
    ) {
        let message = message.to_owned();
        let title = title.to_owned();
        mainloop::post(move || {
            dialog::message_dialog(kind, &title, &message);
            if let Some(callback) = callback {
                callback();
            }
        });
    }

    /// Create the status icon and wire its signals. Loop thread only.
    fn initialize(&self) {
        let status_icon = gtk::StatusIcon::new();
        let mut loop_state = LoopState {
            status_icon,
            icon_store: IconStore::new(),
            notifier: DbusNotifier::new(),
            state: self.inner.state.clone(),
        };
        loop_state.refresh_title();
        loop_state.refresh_icon();

        // Right click: translate the current descriptor tree and pop it up.
        let state = self.inner.state.clone();
        loop_state
            .status_icon
            .connect_popup_menu(move |_, button, activate_time| {
                let entries = { state.lock().unwrap().menu.entries().to_vec() };
                if let Some(menu) = crate::menu::build_menu(&entries) {
                    menu.popup_easy(button, activate_time);
                }
            });

        // Left click: run the menu's default action, if any.
        let state = self.inner.state.clone();
        loop_state.status_icon.connect_activate(move |_| {
            let action = { state.lock().unwrap().menu.default_action() };
            if let Some(action) = action {
                mainloop::run_guarded(|| action());
            }
        });

        let id = self.inner.id;
        INSTANCES.with(|instances| {
            instances.borrow_mut().insert(id, loop_state);
        });
        debug!("tray {id} initialized");
    }

    /// Tear down loop-thread resources: remove the temp icon file, clear
    /// any outstanding notification, hide the icon. Loop thread only.
    fn finalize(&self) {
        let id = self.inner.id;
        INSTANCES.with(|instances| {
            if let Some(mut instance) = instances.borrow_mut().remove(&id) {
                instance.notifier.hide();
                instance.icon_store.clear();
                instance.status_icon.set_visible(false);
            }
        });
        *self.inner.main_loop.lock().unwrap() = None;
    }

    fn mark_ready(&self) {
        if let Some(tx) = self.inner.ready_tx.lock().unwrap().take() {
            let _ = tx.send(());
        }
    }

    /// Stop the loop and wait briefly for the loop thread to finish its
    /// finalization. A tray that never reached Running returns at once.
    fn finalize_on_exit(&self) {
        self.stop();
        let deadline = Instant::now() + Duration::from_secs(2);
        while matches!(
            self.inner.lifecycle.phase(),
            Phase::Running | Phase::Finalizing
        ) && Instant::now() < deadline
        {
            thread::sleep(Duration::from_millis(5));
        }
    }
}

impl TrayBackend for GtkTray {
    fn run(&self) {
        GtkTray::run(self)
    }

    fn run_detached(&self) {
        GtkTray::run_detached(self)
    }

    fn stop(&self) {
        GtkTray::stop(self)
    }

    fn notify(&self, message: &str, title: Option<&str>) {
        GtkTray::notify(self, message, title)
    }

    fn remove_notification(&self) {
        GtkTray::remove_notification(self)
    }

    fn message_box(&self, message: &str, title: &str, callback: Option<Box<dyn FnOnce() + Send>>) {
        GtkTray::message_box(self, message, title, callback)
    }

    fn error_box(&self, message: &str, title: &str, callback: Option<Box<dyn FnOnce() + Send>>) {
        GtkTray::error_box(self, message, title, callback)
    }

    fn confirm_box(&self, message: &str, title: &str, callback: Box<dyn FnOnce(bool) + Send>) {
        GtkTray::confirm_box(self, message, title, callback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_before_run_is_a_noop() {
        let tray = GtkTray::new(TrayState::new("test"));
        tray.stop();
        tray.stop();
        assert_eq!(tray.inner.lifecycle.phase(), Phase::Uninitialized);
    }

    #[test]
    fn handle_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GtkTray>();
    }

    #[test]
    fn exit_cleanup_drains_registry_and_skips_trays_that_never_ran() {
        let tray = GtkTray::new(TrayState::new("exit"));
        register_exit_cleanup(&tray);
        run_exit_cleanup();
        // A tray that never reached Running must not be waited on or moved.
        assert_eq!(tray.inner.lifecycle.phase(), Phase::Uninitialized);
        assert!(EXIT_TRAYS.lock().unwrap().is_empty());
    }
}
