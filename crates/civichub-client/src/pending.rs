//! Re-entry guard shared by the session cache and the staging pipeline.

use std::sync::atomic::{AtomicBool, Ordering};

/// Holds a pending flag raised; lowers it on drop.
pub(crate) struct PendingGuard<'a>(&'a AtomicBool);

impl<'a> PendingGuard<'a> {
    /// Raise `flag`, or `None` if it was already raised.
    pub(crate) fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        if flag.swap(true, Ordering::AcqRel) {
            None
        } else {
            Some(Self(flag))
        }
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
