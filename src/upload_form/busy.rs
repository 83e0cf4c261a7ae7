// src/upload_form/busy.rs
//! Loading flag for the one in-flight submission

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Owned by the form; only the form raises or lowers it
#[derive(Debug, Default)]
pub struct BusyFlag {
    inner: Arc<AtomicBool>,
}

/// Read-only view of a [`BusyFlag`], cheap to clone into a spinner task
#[derive(Debug, Clone)]
pub struct BusyIndicator {
    inner: Arc<AtomicBool>,
}

impl BusyIndicator {
    pub fn is_busy(&self) -> bool {
        self.inner.load(Ordering::Acquire)
    }
}

impl BusyFlag {
    pub fn is_busy(&self) -> bool {
        self.inner.load(Ordering::Acquire)
    }

    pub fn indicator(&self) -> BusyIndicator {
        BusyIndicator {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Raises the flag until the returned guard is dropped, whichever way
    /// the holder exits (return, `?`, panic or the future being dropped).
    pub fn engage(&self) -> BusyGuard<'_> {
        self.inner.store(true, Ordering::Release);
        BusyGuard { flag: self }
    }
}

#[must_use = "the busy flag is lowered as soon as the guard is dropped"]
pub struct BusyGuard<'a> {
    flag: &'a BusyFlag,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.inner.store(false, Ordering::Release);
    }
}
