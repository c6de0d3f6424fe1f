//!
//! # Raw Layout
//!
//! The hierarchical design model underlying label21.
//! Consists of polygon primitives and references to other layout cells,
//! much akin to nearly any legacy layout system.
//!
//! Designs are read and written as serialized [file::DesignFile]s,
//! via [Library::open] and [Library::save].
//!

// Internal modules & re-exports
pub use label21utils as utils;

pub mod bbox;
pub mod data;
pub mod error;
pub mod file;
pub mod geom;

pub use bbox::*;
pub use data::*;
pub use error::*;
pub use file::*;
pub use geom::*;
