// app-linux/src/mainloop.rs
//
// Deferred-call marshaling onto the GTK main loop. GTK widgets may only be
// touched from the loop thread, so every UI mutation goes through `post`.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

use log::error;

/// Schedule `f` as a one-shot idle task on the default main context.
///
/// Fire-and-forget: no result travels back to the caller. Idle tasks run in
/// FIFO submission order relative to each other, interleaved with native
/// event dispatch. A panicking task is logged and does not take the loop
/// down; the task never reschedules.
pub fn post<F>(f: F)
where
    F: FnOnce() + Send + 'static,
{
    glib::idle_add_once(move || run_guarded(f));
}

/// Run `f`, logging a panic instead of letting it unwind into GTK.
pub(crate) fn run_guarded<F: FnOnce()>(f: F) {
    if let Err(panic) = catch_unwind(AssertUnwindSafe(f)) {
        error!("deferred call panicked: {}", panic_message(&panic));
    }
}

fn panic_message(panic: &Box<dyn Any + Send>) -> &str {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s
    } else {
        "unknown panic payload"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn guarded_call_swallows_panic_and_runs_to_completion() {
        let hits = Arc::new(AtomicUsize::new(0));
        let hits2 = hits.clone();
        run_guarded(move || {
            hits2.fetch_add(1, Ordering::SeqCst);
            panic!("boom");
        });
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn posted_tasks_run_in_submission_order() {
        let _guard = crate::gtk_test_guard();
        if gtk::init().is_err() {
            return; // headless environment
        }
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));
        let main_loop = glib::MainLoop::new(None, false);
        for n in 0..4 {
            let order = order.clone();
            post(move || order.lock().unwrap().push(n));
        }
        let quit = main_loop.clone();
        post(move || quit.quit());
        main_loop.run();
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3]);
    }
}
