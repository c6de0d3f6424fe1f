//!
//! # Cooperative Cancellation
//!

// Std-Lib
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

// Local imports
use crate::raw::{LayoutError, LayoutResult};

/// # Cancellation Token
///
/// Shared between a long-running operation and whoever may wish to stop it, e.g. a UI thread.
/// Operations check it between per-instance steps, and return [LayoutError::Cancelled]
/// without modifying their design.
///
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);
impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }
    /// Request cancellation. Applies to all clones of this token.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
    /// Fail with [LayoutError::Cancelled] if cancellation has been requested
    pub fn check(&self) -> LayoutResult<()> {
        if self.is_cancelled() {
            return Err(LayoutError::Cancelled);
        }
        Ok(())
    }
}
