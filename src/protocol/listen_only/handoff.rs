//! Binary hand-off signals between the main flow and the receiver task.
//!
//! Each signal behaves like a binary semaphore: giving it twice before it is
//! taken leaves a single pending token, and taking it consumes the token.
//! Start and completion use separate signals, so the main flow can never
//! take back its own start token.
use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, signal::Signal};

/// Signals shared by the node and its receiver.
///
/// Intended to live in a `static` (or a `StaticCell`) on firmware targets:
/// `Handoff::new` is `const`.
pub struct Handoff {
    start: Signal<CriticalSectionRawMutex, ()>,
    done: Signal<CriticalSectionRawMutex, ()>,
    stop: Signal<CriticalSectionRawMutex, ()>,
}

impl Default for Handoff {
    fn default() -> Self {
        Self::new()
    }
}

impl Handoff {
    pub const fn new() -> Self {
        Self {
            start: Signal::new(),
            done: Signal::new(),
            stop: Signal::new(),
        }
    }

    /// Let the receiver start.
    pub fn give_start(&self) {
        self.start.signal(());
    }

    /// Wait until the receiver may start.
    pub async fn take_start(&self) {
        self.start.wait().await
    }

    /// Report that the receiver has finished.
    pub fn give_done(&self) {
        self.done.signal(());
    }

    /// Wait for the receiver to finish.
    pub async fn take_done(&self) {
        self.done.wait().await
    }

    /// Ask the receiver to stop after the frame it is handling.
    pub fn request_stop(&self) {
        self.stop.signal(());
    }

    /// Wait for a stop request.
    pub async fn wait_stop(&self) {
        self.stop.wait().await
    }

    /// Checks whether a stop request is pending, without consuming it.
    pub fn is_stop_requested(&self) -> bool {
        self.stop.signaled()
    }

    /// Drop every pending token.
    pub fn reset(&self) {
        self.start.reset();
        self.done.reset();
        self.stop.reset();
    }
}
