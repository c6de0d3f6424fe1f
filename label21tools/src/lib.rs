//!
//! # Label21 Tools
//!
//! Shared plumbing for the label21 command-line programs:
//!
//! * [logging] installs the `tracing` subscriber
//! * [config] loads run-options, designs and reports, and merges command-line flags over them
//!
//! Each program lives in `src/bin`, and offloads its logic to a `_main` function for sake of testing.
//!

// Re-exports of our dependent crates
pub use label21;
pub use label21raw as raw;
pub use label21utils as utils;

pub mod config;
pub mod logging;
