//!
//! # Tolerance Clustering
//!
//! Groups real-valued coordinates into ordered equivalence classes.
//! Two distinct rules are supported:
//!
//! * [ClusterRule::Threshold]: greedy gap-merging under a tolerance,
//!   as used for row-column numbering.
//! * [ClusterRule::Rounded]: equality after rounding to a fixed number of decimals,
//!   as used for relative grid-offset numbering.
//!
//! The two can group the same inputs differently; e.g. 0.0004 and 0.0006 merge under
//! a 0.001 threshold, but round to 0.0 and 0.001 respectively.
//!

// Local imports
use crate::raw::{LayoutError, LayoutResult};

/// Round `v` to `digits` decimal places.
///
/// Rounding works from the exact binary value of `v`, so e.g. `0.0055` (stored just below
/// the half-way point) rounds down to `0.005`. Exact ties round to even.
/// Negative zero is normalized to positive zero, so results compare bit-for-bit.
pub fn round_to(v: f64, digits: u32) -> f64 {
    // Float formatting is exact, where scaling by `10^digits` would round first
    let r = format!("{:.*}", digits as usize, v).parse::<f64>().unwrap_or(v);
    r + 0.0
}

/// # Clustering Rule
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClusterRule {
    /// Merge values within tolerance of the current cluster's representative
    Threshold(f64),
    /// Merge values which round identically, at the given number of decimals
    Rounded(u32),
}

/// # Cluster Set
///
/// Strictly increasing cluster representatives, and the [ClusterRule] which built them.
///
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterSet {
    reps: Vec<f64>,
    rule: ClusterRule,
}
impl ClusterSet {
    /// Threshold-merge `values`.
    ///
    /// Values are sorted ascending. The first starts a cluster, and each subsequent value
    /// starts a new one whenever its distance from the current representative exceeds `eps`.
    /// A gap of exactly `eps` merges. Representatives are the first value of each cluster.
    pub fn threshold(values: &[f64], eps: f64) -> LayoutResult<Self> {
        if !(eps.is_finite() && eps >= 0.) {
            return Err(LayoutError::invalid(format!(
                "Clustering tolerance must be finite and non-negative, got {}",
                eps
            )));
        }
        let mut sorted = finite(values)?;
        sorted.sort_by(f64::total_cmp);
        let mut reps: Vec<f64> = Vec::new();
        for v in sorted {
            match reps.last() {
                Some(last) if v - last <= eps => (),
                _ => reps.push(v),
            }
        }
        Ok(Self {
            reps,
            rule: ClusterRule::Threshold(eps),
        })
    }
    /// Round each of `values` to `digits` decimals, and keep the distinct results, ascending.
    pub fn rounded(values: &[f64], digits: u32) -> LayoutResult<Self> {
        let mut reps: Vec<f64> = finite(values)?
            .into_iter()
            .map(|v| round_to(v, digits))
            .collect();
        reps.sort_by(f64::total_cmp);
        reps.dedup_by(|a, b| a.to_bits() == b.to_bits());
        Ok(Self {
            reps,
            rule: ClusterRule::Rounded(digits),
        })
    }
    /// Index of the cluster containing `v`, if any.
    ///
    /// For [ClusterRule::Threshold], the first representative within tolerance of `v`.
    /// For [ClusterRule::Rounded], the representative exactly equal to `v` after rounding.
    pub fn index_of(&self, v: f64) -> Option<usize> {
        match self.rule {
            ClusterRule::Threshold(eps) => self.reps.iter().position(|r| (v - r).abs() <= eps),
            ClusterRule::Rounded(digits) => {
                let r = round_to(v, digits);
                self.reps.binary_search_by(|x| x.total_cmp(&r)).ok()
            }
        }
    }
    /// Representative values, strictly increasing
    pub fn reps(&self) -> &[f64] {
        &self.reps
    }
    pub fn len(&self) -> usize {
        self.reps.len()
    }
    pub fn is_empty(&self) -> bool {
        self.reps.is_empty()
    }
}

/// Copy `values`, failing if any is NaN or infinite
fn finite(values: &[f64]) -> LayoutResult<Vec<f64>> {
    match values.iter().find(|v| !v.is_finite()) {
        Some(v) => Err(LayoutError::invalid(format!(
            "Cannot cluster non-finite coordinate {}",
            v
        ))),
        None => Ok(values.to_vec()),
    }
}
