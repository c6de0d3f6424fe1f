//!
//! # Instance Location
//!
//! Finds the placements of a target cell within a parent, and computes the positions
//! used to order and label each of them.
//!

// Crates.io
use serde::{Deserialize, Serialize};
use tracing::debug;

// Local imports
use crate::raw::{LayoutError, LayoutResult, Library, Point};

/// # Instance Record
///
/// One per matching [crate::raw::Reference] in the parent.
/// Created fresh by [locate] and discarded after each numbering operation.
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceRecord {
    /// Index of the reference within its parent's reference list
    pub index: usize,
    /// The reference's magnification
    pub magnification: f64,
    /// Assigned label. Empty until numbered.
    pub label: String,
    /// Position used for ordering and clustering
    pub position: Point,
    /// Position at which the label is centered
    pub anchor: Point,
}

/// # Anchor Computation Modes
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Anchor {
    /// Position and anchor are both the reference origin plus `local_center`.
    /// Rotation, reflection and magnification are ignored.
    TranslateOnly { local_center: Point },
    /// Position is `sort_local` and anchor is `text_local`,
    /// each mapped through the reference's full transform.
    FullTransform { sort_local: Point, text_local: Point },
}

/// Locate all direct references to cell `target` within cell `parent`, in reference order.
///
/// Fails with [LayoutError::NotFound] if either cell is not in `lib`, or if no references match,
/// and with [LayoutError::InvalidInput] if a matching reference has an unusable magnification.
pub fn locate(
    lib: &Library,
    parent: &str,
    target: &str,
    anchor: &Anchor,
) -> LayoutResult<Vec<InstanceRecord>> {
    let cell = lib.try_cell(parent)?;
    lib.try_cell(target)?;

    let mut records = Vec::new();
    for (index, rf) in cell.refs.iter().enumerate() {
        if rf.cell != target {
            continue;
        }
        rf.validate()?;
        let (position, anchor) = match *anchor {
            Anchor::TranslateOnly { local_center } => {
                let p = rf.origin.shift(&local_center);
                (p, p)
            }
            Anchor::FullTransform {
                sort_local,
                text_local,
            } => (rf.compose(sort_local), rf.compose(text_local)),
        };
        records.push(InstanceRecord {
            index,
            position,
            anchor,
            magnification: rf.magnification,
            label: String::new(),
        });
    }
    if records.is_empty() {
        return Err(LayoutError::not_found(format!(
            "No references to `{}` in `{}`",
            target, parent
        )));
    }
    debug!(parent, target, count = records.len(), "located instances");
    Ok(records)
}
