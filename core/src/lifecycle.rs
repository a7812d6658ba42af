// core/src/lifecycle.rs
//
// Lifecycle of one tray instance. Any thread may observe or drive the
// phase; the mutex is the only synchronization the shells need.

use std::sync::Mutex;

use log::{debug, warn};

/// Phases a tray instance moves through, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Initializing,
    Running,
    Finalizing,
    Stopped,
}

/// Thread-safe phase tracker.
#[derive(Debug)]
pub struct Lifecycle {
    phase: Mutex<Phase>,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            phase: Mutex::new(Phase::Uninitialized),
        }
    }

    pub fn phase(&self) -> Phase {
        *self.phase.lock().unwrap()
    }

    /// Uninitialized -> Initializing. Returns false if already past that.
    pub fn begin_init(&self) -> bool {
        let mut phase = self.phase.lock().unwrap();
        if *phase == Phase::Uninitialized {
            *phase = Phase::Initializing;
            true
        } else {
            warn!("tray already started (phase {:?})", *phase);
            false
        }
    }

    /// Initializing -> Running.
    pub fn mark_running(&self) {
        let mut phase = self.phase.lock().unwrap();
        debug_assert_eq!(*phase, Phase::Initializing);
        *phase = Phase::Running;
    }

    /// Running -> Finalizing. Also accepts Initializing so a failed startup
    /// still funnels through finalization.
    pub fn begin_finalize(&self) {
        let mut phase = self.phase.lock().unwrap();
        *phase = Phase::Finalizing;
    }

    /// Finalizing -> Stopped.
    pub fn mark_stopped(&self) {
        let mut phase = self.phase.lock().unwrap();
        *phase = Phase::Stopped;
    }

    /// Whether a stop request should do anything. Stop before run, or a
    /// second stop, is a no-op.
    pub fn request_stop(&self) -> bool {
        let phase = self.phase.lock().unwrap();
        match *phase {
            Phase::Running => true,
            other => {
                debug!("ignoring stop request in phase {:?}", other);
                false
            }
        }
    }
}
