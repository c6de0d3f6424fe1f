//!
//! # Label21 Internal Utilities Crate
//!
//! Shared plumbing for the label21 crates:
//! serialization to and from files, error-construction helpers,
//! dependency ordering, and string-paired enumerations.
//!

pub mod ser;
pub use ser::*;

pub mod error;
pub use error::*;

pub mod context;
pub use context::*;

pub mod dep_order;
pub use dep_order::*;

pub mod enumstr;
pub use enumstr::*;
