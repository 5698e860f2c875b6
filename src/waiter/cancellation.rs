use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Flag telling waiters to stop polling.
///
/// Cancelling only abandons the local wait - whatever the provider is doing
/// keeps going.
#[derive(Clone, Debug, Default)]
pub struct Cancellation {
    flag: Arc<AtomicBool>,
}

impl Cancellation {
    pub fn new() -> Self {
        Self::default()
    }

    /// The underlying flag, e.g. for `signal_hook::flag::register()`.
    pub fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}
