//!
//! # Geometry Module
//!
//! Defines the core geometric types including [Point], [Polygon], and [Transform],
//! and their core operations.
//!
//! All coordinates are floating-point, in the units of their owning [crate::Library].
//!

// Crates.io
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// # Point in two-dimensional layout-space
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}
impl Point {
    /// Create a new [Point] from (x,y) coordinates
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
    /// Create a new point shifted by `p.x` in the x-dimension and by `p.y` in the y-dimension
    pub fn shift(&self, p: &Point) -> Point {
        Point {
            x: self.x + p.x,
            y: self.y + p.y,
        }
    }
    /// Create a new point equal to the difference `self - p`
    pub fn sub(&self, p: &Point) -> Point {
        Point {
            x: self.x - p.x,
            y: self.y - p.y,
        }
    }
    /// Create a new point scaled by `k` in both dimensions
    pub fn scale(&self, k: f64) -> Point {
        Point {
            x: self.x * k,
            y: self.y * k,
        }
    }
    /// Squared euclidean distance to `p`
    pub fn dist2(&self, p: &Point) -> f64 {
        let (dx, dy) = (self.x - p.x, self.y - p.y);
        dx * dx + dy * dy
    }
    /// Boolean indication of whether both coordinates are finite
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
    /// Create a new [Point], transformed from our original location by `transform`
    pub fn transform(&self, trans: &Transform) -> Point {
        let [x, y] = matvec(&trans.a, &[self.x, self.y]);
        Self {
            x: x + trans.b[0],
            y: y + trans.b[1],
        }
    }
}

/// # Polygon
///
/// Closed n-sided polygon with arbitrary number of vertices.
/// Primarily consists of a series of ordered [Point]s.
///
/// Closure from the last point back to the first is implied;
/// the initial point need not be repeated at the end.
/// Point order is preserved by every operation here.
///
#[derive(Debug, Default, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Polygon {
    pub points: Vec<Point>,
}
impl Polygon {
    /// Create a new [Polygon] from a list of vertices
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }
    /// Shift coordinates by the (x,y) values specified in `pt`
    pub fn shift(&mut self, pt: &Point) {
        for p in self.points.iter_mut() {
            p.x += pt.x;
            p.y += pt.y;
        }
    }
}

/// # Rectangle
///
/// Axis-aligned rectangle, specified by two opposite corners.
///
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Rect {
    pub p0: Point,
    pub p1: Point,
}
impl Rect {
    /// Create a [Rect] from corner coordinates
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            p0: Point::new(x0, y0),
            p1: Point::new(x1, y1),
        }
    }
    /// Calculate our center-point
    pub fn center(&self) -> Point {
        Point::new((self.p0.x + self.p1.x) / 2., (self.p0.y + self.p1.y) / 2.)
    }
    /// Convert to a four-sided [Polygon], counter-clockwise from `p0`
    pub fn to_poly(&self) -> Polygon {
        Polygon {
            points: vec![
                self.p0,
                Point::new(self.p1.x, self.p0.y),
                self.p1,
                Point::new(self.p0.x, self.p1.y),
            ],
        }
    }
}

/// # Matrix-Vector Transformation
///
/// 2x2 rotation/scale/reflection matrix and two-entry translation vector,
/// used for relative movement of [Point]s and [Polygon]s.
///
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Rotation / Transformation Matrix
    /// Represented in row-major order
    pub a: [[f64; 2]; 2],
    /// X-Y Translation
    pub b: [f64; 2],
}
impl Transform {
    /// The identity transform, leaving any transformed object unmodified
    pub fn identity() -> Self {
        Self {
            a: [[1., 0.], [0., 1.]],
            b: [0., 0.],
        }
    }
    /// Translation by (x,y)
    pub fn translate(x: f64, y: f64) -> Self {
        Self {
            a: [[1., 0.], [0., 1.]],
            b: [x, y],
        }
    }
    /// A transform to rotate counter-clockwise by `angle` radians
    pub fn rotate(angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            a: [[cos, -sin], [sin, cos]],
            b: [0., 0.],
        }
    }
    /// A transform to reflect about the x-axis
    pub fn reflect_vert() -> Self {
        Self {
            a: [[1., 0.], [0., -1.]],
            b: [0., 0.],
        }
    }
    /// Uniform scaling by `k`
    pub fn scale(k: f64) -> Self {
        Self {
            a: [[k, 0.], [0., k]],
            b: [0., 0.],
        }
    }
    /// Create a transform from placement fields: location, rotation (radians),
    /// magnification, and reflection about the x-axis.
    ///
    /// Reflects, then scales, then rotates, then translates.
    pub fn from_place(loc: &Point, angle: f64, mag: f64, reflect_vert: bool) -> Self {
        let refl = if reflect_vert {
            Self::reflect_vert()
        } else {
            Self::identity()
        };
        let scaled = Self::cascade(&Self::scale(mag), &refl);
        let rotated = Self::cascade(&Self::rotate(angle), &scaled);
        Self::cascade(&Self::translate(loc.x, loc.y), &rotated)
    }
    /// Compose `parent` over `child`: the result applies `child` first, then `parent`.
    /// Used to carry a reference's placement down through each level of hierarchy. Not commutative.
    pub fn cascade(parent: &Transform, child: &Transform) -> Transform {
        let [bx, by] = matvec(&parent.a, &child.b);
        Self {
            a: matmul(&parent.a, &child.a),
            b: [bx + parent.b[0], by + parent.b[1]],
        }
    }
}
/// Multiply 2x2 matrices, returning a new 2x2 matrix
fn matmul(a: &[[f64; 2]; 2], b: &[[f64; 2]; 2]) -> [[f64; 2]; 2] {
    [
        [
            a[0][0] * b[0][0] + a[0][1] * b[1][0],
            a[0][0] * b[0][1] + a[0][1] * b[1][1],
        ],
        [
            a[1][0] * b[0][0] + a[1][1] * b[1][0],
            a[1][0] * b[0][1] + a[1][1] * b[1][1],
        ],
    ]
}
/// Multiply a 2x2 matrix by a 2-entry vector, returning a new 2-entry vector
fn matvec(a: &[[f64; 2]; 2], b: &[f64; 2]) -> [f64; 2] {
    [
        a[0][0] * b[0] + a[0][1] * b[1],
        a[1][0] * b[0] + a[1][1] * b[1],
    ]
}
pub trait TransformTrait {
    /// Apply matrix-vector [Transform] `trans`.
    /// Creates a new shape at a location equal to the transformation of our own.
    fn transform(&self, trans: &Transform) -> Self;
}
impl TransformTrait for Point {
    fn transform(&self, trans: &Transform) -> Self {
        Point::transform(self, trans)
    }
}
impl TransformTrait for Polygon {
    fn transform(&self, trans: &Transform) -> Self {
        Polygon {
            points: self.points.iter().map(|p| p.transform(trans)).collect(),
        }
    }
}
