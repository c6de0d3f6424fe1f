//!
//! # Rectangular Bounding Boxes and Associated Trait
//!

// Crates.io
use serde::{Deserialize, Serialize};

// Local imports
use crate::geom::{Point, Polygon, Rect};

/// # Rectangular Bounding Box
///
/// Points `p0` and `p1` represent opposite corners of a bounding rectangle.
/// `p0` is always closest to negative-infinity, in both x and y,
/// and `p1` is always closest to positive-infinity.
///
/// The "empty" box has `p0` at positive infinity and `p1` at negative infinity,
/// so that its union with anything is that thing.
///
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
pub struct BoundBox {
    pub p0: Point,
    pub p1: Point,
}
impl BoundBox {
    /// Create a new [BoundBox] from two [Point]s.
    /// Callers are responsible for ensuring that p0.x <= p1.x, and p0.y <= p1.y.
    fn new(p0: Point, p1: Point) -> Self {
        Self { p0, p1 }
    }
    /// Create a new [BoundBox] from a single [Point].
    /// The resultant [BoundBox] comprises solely the point, having zero area.
    pub fn from_point(pt: Point) -> Self {
        Self { p0: pt, p1: pt }
    }
    /// Create a new [BoundBox] from two points
    pub fn from_points(p0: Point, p1: Point) -> Self {
        Self {
            p0: Point::new(p0.x.min(p1.x), p0.y.min(p1.y)),
            p1: Point::new(p0.x.max(p1.x), p0.y.max(p1.y)),
        }
    }
    /// Create an empty, otherwise invalid [BoundBox]
    pub fn empty() -> Self {
        Self {
            p0: Point::new(f64::INFINITY, f64::INFINITY),
            p1: Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }
    /// Boolean indication of whether a box is empty
    pub fn is_empty(&self) -> bool {
        !(self.p0.x <= self.p1.x && self.p0.y <= self.p1.y)
    }
    /// Get the box's size as an (x,y) tuple
    pub fn size(&self) -> (f64, f64) {
        (self.p1.x - self.p0.x, self.p1.y - self.p0.y)
    }
    /// Get the box's center, or [None] if it is empty
    pub fn center(&self) -> Option<Point> {
        if self.is_empty() {
            return None;
        }
        Some(Point::new(
            (self.p0.x + self.p1.x) / 2.,
            (self.p0.y + self.p1.y) / 2.,
        ))
    }
}
impl Default for BoundBox {
    fn default() -> Self {
        Self::empty()
    }
}

///
/// # Bounding Box Trait
///
/// Methods for interacting with [BoundBox]s.
/// Implementations for [Point]s, [Polygon]s, and [BoundBox]s
/// let shapes of every kind accumulate into a single union.
///
pub trait BoundBoxTrait {
    /// Compute the union with rectangular bounding box `bbox`.
    /// Creates and returns a new [BoundBox].
    fn union(&self, bbox: &BoundBox) -> BoundBox {
        self.bbox().union(bbox)
    }
    /// Compute a rectangular bounding box around the implementing type.
    fn bbox(&self) -> BoundBox;
}

impl BoundBoxTrait for BoundBox {
    fn union(&self, bbox: &BoundBox) -> BoundBox {
        BoundBox::new(
            Point::new(self.p0.x.min(bbox.p0.x), self.p0.y.min(bbox.p0.y)),
            Point::new(self.p1.x.max(bbox.p1.x), self.p1.y.max(bbox.p1.y)),
        )
    }
    fn bbox(&self) -> BoundBox {
        *self
    }
}
impl BoundBoxTrait for Point {
    fn union(&self, bbox: &BoundBox) -> BoundBox {
        BoundBox::new(
            Point::new(self.x.min(bbox.p0.x), self.y.min(bbox.p0.y)),
            Point::new(self.x.max(bbox.p1.x), self.y.max(bbox.p1.y)),
        )
    }
    fn bbox(&self) -> BoundBox {
        BoundBox::from_point(*self)
    }
}
impl BoundBoxTrait for Rect {
    fn bbox(&self) -> BoundBox {
        BoundBox::from_points(self.p0, self.p1)
    }
}
impl BoundBoxTrait for Polygon {
    fn bbox(&self) -> BoundBox {
        self.points.bbox()
    }
}
/// Slices bound the union of their entries. Empty slices produce [BoundBox::empty].
impl<T: BoundBoxTrait> BoundBoxTrait for [T] {
    fn bbox(&self) -> BoundBox {
        let mut bbox = BoundBox::empty();
        for item in self {
            bbox = item.union(&bbox);
        }
        bbox
    }
}
