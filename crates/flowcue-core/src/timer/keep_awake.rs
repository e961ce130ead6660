//! Best-effort "keep the display on" capability.
//!
//! A runner asks for an [`AwakeGuard`] when it starts and drops it when the
//! session ends. Failing to acquire one is logged and otherwise ignored.

use tracing::debug;

use crate::error::CoreError;

pub trait KeepAwake: Send + Sync {
    fn acquire(&self) -> Result<AwakeGuard, CoreError>;
}

/// Releases the capability on drop.
#[must_use = "the display may sleep as soon as the guard is dropped"]
pub struct AwakeGuard {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl AwakeGuard {
    pub fn new<F>(release: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            release: Some(Box::new(release)),
        }
    }
}

impl Drop for AwakeGuard {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

/// Platform without a wake-lock API: only records the request.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopKeepAwake;

impl KeepAwake for NoopKeepAwake {
    fn acquire(&self) -> Result<AwakeGuard, CoreError> {
        debug!("keep-awake requested (no platform support)");
        Ok(AwakeGuard::new(|| debug!("keep-awake released")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[test]
    fn guard_runs_release_on_drop() {
        let released = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&released);
        let guard = AwakeGuard::new(move || flag.store(true, Ordering::SeqCst));
        assert!(!released.load(Ordering::SeqCst));
        drop(guard);
        assert!(released.load(Ordering::SeqCst));
    }

    #[test]
    fn noop_always_succeeds() {
        assert!(NoopKeepAwake.acquire().is_ok());
    }
}
