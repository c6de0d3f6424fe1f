//!
//! # Label Assignment
//!
//! Three numbering strategies over [InstanceRecord]s:
//!
//! * [row_col]: `"{row}-{col}"` from threshold-merged Y and X clusters
//! * [sequential]: zero-padded indices in bucketed reading order
//! * [grid_offset]: `"(dx,dy)"` relative to the instance nearest the array's mean position
//!

// Crates.io
use serde::{Deserialize, Serialize};
use tracing::debug;

// Local imports
use crate::cluster::ClusterSet;
use crate::locate::InstanceRecord;
use crate::raw::{LayoutError, LayoutResult, Point};
use crate::utils::enumstr;

enumstr!(
    /// # Numbering Modes for Lens Arrays
    NumberingMode {
        RowCol: "row_col",
        Sequential: "sequential",
    }
);
impl Default for NumberingMode {
    fn default() -> Self {
        Self::RowCol
    }
}

enumstr!(
    /// # Sequential-Numbering Direction
    /// Names the axis bucketed first.
    SortDir {
        YFirst: "y_first",
        XFirst: "x_first",
    }
);
impl Default for SortDir {
    fn default() -> Self {
        Self::YFirst
    }
}

/// Decimal places used by [grid_offset] clustering
pub const GRID_DIGITS: u32 = 3;
/// Average glyph width-to-height ratio assumed by [fit_text_size]
pub const CHAR_ASPECT: f64 = 0.6;

fn ensure_some(records: &[InstanceRecord]) -> LayoutResult<()> {
    if records.is_empty() {
        return Err(LayoutError::not_found("No instances to number"));
    }
    Ok(())
}

/// Label each record `"{row}-{col}"`, both 1-based from the bottom-left.
///
/// Rows and columns are threshold-merged clusters of position Y and X values, with tolerance `tol`.
/// Labels depend only on the set of positions, not on the order of `records`.
pub fn row_col(records: &mut [InstanceRecord], tol: f64) -> LayoutResult<()> {
    ensure_some(records)?;
    let xs: Vec<f64> = records.iter().map(|r| r.position.x).collect();
    let ys: Vec<f64> = records.iter().map(|r| r.position.y).collect();
    let cols = ClusterSet::threshold(&xs, tol)?;
    let rows = ClusterSet::threshold(&ys, tol)?;
    debug!(rows = rows.len(), cols = cols.len(), "row-column grid");

    for rec in records.iter_mut() {
        // Every value is within tolerance of the cluster built from it
        let row = rows.index_of(rec.position.y).ok_or_else(|| {
            LayoutError::msg(format!("Y {} outside all row clusters", rec.position.y))
        })?;
        let col = cols.index_of(rec.position.x).ok_or_else(|| {
            LayoutError::msg(format!("X {} outside all column clusters", rec.position.x))
        })?;
        rec.label = format!("{}-{}", row + 1, col + 1);
    }
    Ok(())
}

/// Integer bucket of `v` at spacing `tol`. Ties round to even.
fn bucket(v: f64, tol: f64) -> f64 {
    (v / tol).round_ties_even() + 0.0
}

/// Sort `records` into reading order and label them `1..=N`, zero-padded to `width` digits.
///
/// The sort key is the bucket of the primary coordinate (Y for [SortDir::YFirst], X otherwise),
/// then the other coordinate, both ascending. The sort is stable.
pub fn sequential(
    records: &mut [InstanceRecord],
    tol: f64,
    dir: SortDir,
    width: usize,
) -> LayoutResult<()> {
    ensure_some(records)?;
    if !(tol.is_finite() && tol > 0.) {
        return Err(LayoutError::invalid(format!(
            "Sequential numbering tolerance must be positive, got {}",
            tol
        )));
    }
    let key = |p: &Point| match dir {
        SortDir::YFirst => (bucket(p.y, tol), p.x),
        SortDir::XFirst => (bucket(p.x, tol), p.y),
    };
    records.sort_by(|a, b| {
        let (ka, kb) = (key(&a.position), key(&b.position));
        ka.0.total_cmp(&kb.0).then(ka.1.total_cmp(&kb.1))
    });
    for (idx, rec) in records.iter_mut().enumerate() {
        rec.label = format!("{:0width$}", idx + 1, width = width);
    }
    Ok(())
}

/// Label each record `"(dx,dy)"`, its grid offset from the center instance.
///
/// The center is the record whose position is nearest the mean of all positions,
/// the first such record on ties. Grid lines are the distinct positions rounded to
/// [GRID_DIGITS] decimals. Returns the index of the center record.
pub fn grid_offset(records: &mut [InstanceRecord]) -> LayoutResult<usize> {
    ensure_some(records)?;
    let n = records.len() as f64;
    let sum = records
        .iter()
        .fold(Point::default(), |acc, r| acc.shift(&r.position));
    let mean = sum.scale(1. / n);

    let mut center = 0;
    let mut best = f64::INFINITY;
    for (idx, rec) in records.iter().enumerate() {
        let d = rec.position.dist2(&mean);
        if d < best {
            best = d;
            center = idx;
        }
    }

    let xs: Vec<f64> = records.iter().map(|r| r.position.x).collect();
    let ys: Vec<f64> = records.iter().map(|r| r.position.y).collect();
    let gx = ClusterSet::rounded(&xs, GRID_DIGITS)?;
    let gy = ClusterSet::rounded(&ys, GRID_DIGITS)?;
    let grid_index = |p: &Point| -> LayoutResult<(isize, isize)> {
        let ix = gx
            .index_of(p.x)
            .ok_or_else(|| LayoutError::msg(format!("X {} off grid", p.x)))?;
        let iy = gy
            .index_of(p.y)
            .ok_or_else(|| LayoutError::msg(format!("Y {} off grid", p.y)))?;
        Ok((ix as isize, iy as isize))
    };
    let (cx, cy) = grid_index(&records[center].position)?;
    debug!(
        center = records[center].index,
        cols = gx.len(),
        rows = gy.len(),
        "grid-offset center"
    );
    for rec in records.iter_mut() {
        let (ix, iy) = grid_index(&rec.position)?;
        rec.label = format!("({},{})", ix - cx, iy - cy);
    }
    Ok(center)
}

/// Text size fitting `label` within an `area_w` by `area_h` budget, scaled by `magnification`
pub fn fit_text_size(label: &str, area_w: f64, area_h: f64, magnification: f64) -> f64 {
    let chars = label.chars().count().max(1) as f64;
    (area_h * 0.9).min(area_w * 0.9 / (chars * CHAR_ASPECT)) * magnification
}
