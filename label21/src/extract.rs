//!
//! # Primitive Extraction
//!
//! Pulls the polygons on a single layer out of flattened geometry,
//! and orders them in reading order: top row first, left to right within each row.
//!

// Crates.io
use serde::{Deserialize, Serialize};
use tracing::debug;

// Local imports
use crate::cluster::round_to;
use crate::raw::{BoundBoxTrait, Element, LayerSpec, LayoutError, LayoutResult, Point};

/// Decimal places applied to centers before ordering
pub const SORT_DIGITS: u32 = 3;

/// # Extraction Record
/// Geometric summary of one extracted polygon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionRecord {
    /// Bounding-box width
    pub width: f64,
    /// Bounding-box height
    pub height: f64,
    /// Bounding-box center
    pub center: Point,
    /// Boundary points, in their original order
    pub points: Vec<Point>,
}

/// Reading-order sort key for a center point: descending rounded Y, then ascending rounded X
pub fn reading_key(center: &Point) -> (f64, f64) {
    (
        -round_to(center.y, SORT_DIGITS),
        round_to(center.x, SORT_DIGITS),
    )
}

/// Compare two reading-order keys
pub(crate) fn cmp_keys(a: (f64, f64), b: (f64, f64)) -> std::cmp::Ordering {
    a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1))
}

/// Extract every element of `elems` on `layer`, in reading order.
///
/// `elems` should be flattened, i.e. in absolute coordinates; see [crate::raw::Library::flatten].
/// Centers are rounded to [SORT_DIGITS] decimal places before comparison.
/// Fails with [LayoutError::NotFound] if nothing matches.
pub fn extract(elems: &[Element], layer: LayerSpec) -> LayoutResult<Vec<ExtractionRecord>> {
    let mut records: Vec<ExtractionRecord> = elems
        .iter()
        .filter(|e| e.layer == layer)
        .filter_map(|e| {
            let bbox = e.bbox();
            let center = bbox.center()?;
            let (width, height) = bbox.size();
            Some(ExtractionRecord {
                center,
                width,
                height,
                points: e.inner.points.clone(),
            })
        })
        .collect();
    if records.is_empty() {
        return Err(LayoutError::not_found(format!(
            "No polygons on layer {}",
            layer
        )));
    }
    records.sort_by(|a, b| cmp_keys(reading_key(&a.center), reading_key(&b.center)));
    debug!(layer = %layer, count = records.len(), "extracted");
    Ok(records)
}
