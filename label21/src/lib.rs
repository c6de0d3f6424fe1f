//!
//! # Label21
//!
//! Numbering and extraction for repeated cell instances in hierarchical layout.
//!
//! * Lens arrays are numbered by row and column, or sequentially: [number_lenses]
//! * Shot arrays are numbered by grid offset from their center: [number_shots]
//! * Pads are extracted from flattened geometry in reading order: [extract_pads]
//! * Instances of selected cells are summarized: [extract_instances]
//!
//! Designs are held in [raw::Library]s, which callers load, pass to each operation, and save.
//!

// Re-exports of our dependent crates
pub use label21raw as raw;
pub use label21utils as utils;

pub mod cancel;
pub mod cluster;
pub mod extract;
pub mod label;
pub mod locate;
pub mod ops;
pub mod text;

pub use cancel::*;
pub use cluster::*;
pub use extract::*;
pub use label::*;
pub use locate::*;
pub use ops::*;
pub use text::*;

#[cfg(test)]
mod tests;
