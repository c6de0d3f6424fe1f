//!
//! # Label21 Error-Helper Utilities
//!
//! ```rust
//! use label21utils::error::{ErrorHelper, Unwrapper};
//!
//! /// Example implementer of [`ErrorHelper`].
//! /// Typical implementers carry a context-stack to report upon failure.
//! struct CellWalker {
//!     cell: String,
//! }
//! impl ErrorHelper for CellWalker {
//!     type Error = String;
//!
//!     fn err(&self, msg: impl Into<String>) -> Self::Error {
//!         format!("In cell {}: {}", self.cell, msg.into())
//!     }
//! }
//! impl CellWalker {
//!     fn walk(&self) -> Result<usize, String> {
//!         let count = Some(5).unwrapper(self, "No references")?;
//!         self.assert(count > 0, "Empty cell")?;
//!         Ok(count)
//!     }
//! }
//! ```
//!

///
/// # ErrorHelper
///
/// Shared failure-reporting for tree-walkers such as design importers and exporters.
/// Implementers provide `err`, typically attaching whatever context they are tracking.
/// `fail` and `assert` are built upon it.
///
pub trait ErrorHelper {
    type Error;

    /// Create a [Self::Error] from `msg` and our context
    fn err(&self, msg: impl Into<String>) -> Self::Error;
    /// Fail with [ErrorHelper::err]
    fn fail<T>(&self, msg: impl Into<String>) -> Result<T, Self::Error> {
        Err(self.err(msg))
    }
    /// Fail with `msg` unless `cond` holds
    fn assert(&self, cond: bool, msg: impl Into<String>) -> Result<(), Self::Error> {
        if cond {
            Ok(())
        } else {
            self.fail(msg)
        }
    }
}

///
/// # Unwrapper
///
/// Post-fix application of an [`ErrorHelper`] to [`Option`]s:
/// `None` is routed to the helper's `err` instead of panicking.
///
pub trait Unwrapper {
    type Ok;
    fn unwrapper<H: ErrorHelper>(self, helper: &H, msg: impl Into<String>) -> Result<Self::Ok, H::Error>;
}
impl<T> Unwrapper for Option<T> {
    type Ok = T;
    fn unwrapper<H: ErrorHelper>(self, helper: &H, msg: impl Into<String>) -> Result<T, H::Error> {
        self.ok_or_else(|| helper.err(msg))
    }
}
