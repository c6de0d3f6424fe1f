//!
//! # Raw Layout Data Model
//!
//! Defines the primary structures for representation of hierarchical layout,
//! including [Library], [Cell], [Reference], and [Element].
//!

// Std-Lib
use std::collections::{HashMap, HashSet};

// Crates.io
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SlotMap};

// Local Imports
use crate::{
    bbox::{BoundBox, BoundBoxTrait},
    error::{LayoutError, LayoutResult},
    geom::{Point, Polygon, Transform, TransformTrait},
    utils::{DepOrder, DepOrderer},
};

// Create key-types for each internal type stored in [SlotMap]s
new_key_type! {
    /// Keys for [Cell] entries
    pub struct CellKey;
}

/// Distance Units Enumeration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub enum Units {
    /// Micrometers, or microns for we olde folke
    Micro,
    /// Nanometers
    Nano,
    /// Angstroms
    Angstrom,
    /// Picometers
    Pico,
}
impl Default for Units {
    /// Default units are microns
    fn default() -> Units {
        Units::Micro
    }
}

/// # Layer Specification
/// The (layer number, datatype) pair tagging every [Element].
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
pub struct LayerSpec {
    pub layernum: i16,
    pub datatype: i16,
}
impl LayerSpec {
    pub fn new(layernum: i16, datatype: i16) -> Self {
        Self { layernum, datatype }
    }
}
impl std::fmt::Display for LayerSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}/{}", self.layernum, self.datatype)
    }
}
impl std::str::FromStr for LayerSpec {
    type Err = String;
    /// Parse from "layer/datatype" format, e.g. "66/0". A lone "66" implies datatype zero.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || format!("Invalid layer `{}`, expected `layer/datatype`", s);
        let mut parts = s.trim().splitn(2, '/');
        let layernum = parts
            .next()
            .and_then(|p| p.trim().parse().ok())
            .ok_or_else(bad)?;
        let datatype = match parts.next() {
            Some(p) => p.trim().parse().map_err(|_| bad())?,
            None => 0,
        };
        Ok(Self { layernum, datatype })
    }
}

/// # Primitive Geometric Element
///
/// Primary unit of [Cell] content.
/// Combines a [Polygon] with its (layer, datatype) tag.
///
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Element {
    /// Layer & Datatype
    pub layer: LayerSpec,
    /// Shape
    pub inner: Polygon,
}
impl Element {
    pub fn new(layer: LayerSpec, inner: Polygon) -> Self {
        Self { layer, inner }
    }
}
impl BoundBoxTrait for Element {
    fn bbox(&self) -> BoundBox {
        self.inner.bbox()
    }
}
impl TransformTrait for Element {
    fn transform(&self, trans: &Transform) -> Self {
        Self {
            layer: self.layer,
            inner: self.inner.transform(trans),
        }
    }
}

/// # Cell Reference
///
/// A placement of the [Cell] named `cell` inside another,
/// under the affine transform defined by its remaining fields.
/// Target identity is always a resolved cell name; see [crate::file] for resolution of index-based targets.
///
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reference {
    /// Target Cell Name
    pub cell: String,
    /// Location of `cell` origin
    pub origin: Point,
    /// Counter-clockwise rotation, in radians, applied after reflection and magnification
    pub rotation: f64,
    /// Scale factor. Must be finite and positive.
    pub magnification: f64,
    /// Reflection about the x-axis, applied first
    pub reflect_vert: bool,
}
impl Reference {
    /// Create a new [Reference] to `cell` at `origin`, with no rotation, reflection or scaling
    pub fn new(cell: impl Into<String>, origin: Point) -> Self {
        Self {
            cell: cell.into(),
            origin,
            rotation: 0.,
            magnification: 1.,
            reflect_vert: false,
        }
    }
    /// Builder-style setter for `rotation`
    pub fn rotated(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }
    /// Builder-style setter for `magnification`
    pub fn magnified(mut self, magnification: f64) -> Self {
        self.magnification = magnification;
        self
    }
    /// Builder-style setter for `reflect_vert`
    pub fn reflected(mut self, reflect_vert: bool) -> Self {
        self.reflect_vert = reflect_vert;
        self
    }
    /// Map `pt` from the referenced cell's local coordinates into the parent's.
    /// Reflects, then scales, then rotates (skipped for an angle of exactly zero), then translates.
    pub fn compose(&self, pt: Point) -> Point {
        let mut x = pt.x;
        let mut y = if self.reflect_vert { -pt.y } else { pt.y };
        x *= self.magnification;
        y *= self.magnification;
        if self.rotation != 0. {
            let (sin, cos) = self.rotation.sin_cos();
            let (rx, ry) = (x * cos - y * sin, x * sin + y * cos);
            x = rx;
            y = ry;
        }
        Point::new(x + self.origin.x, y + self.origin.y)
    }
    /// Inverse of [Reference::compose]: map `pt` from parent coordinates back into the referenced cell's.
    pub fn decompose(&self, pt: Point) -> Point {
        let mut x = pt.x - self.origin.x;
        let mut y = pt.y - self.origin.y;
        if self.rotation != 0. {
            let (sin, cos) = (-self.rotation).sin_cos();
            let (rx, ry) = (x * cos - y * sin, x * sin + y * cos);
            x = rx;
            y = ry;
        }
        x /= self.magnification;
        y /= self.magnification;
        if self.reflect_vert {
            y = -y;
        }
        Point::new(x, y)
    }
    /// Matrix-form of [Reference::compose], for cascading through hierarchy
    pub fn transform(&self) -> Transform {
        Transform::from_place(
            &self.origin,
            self.rotation,
            self.magnification,
            self.reflect_vert,
        )
    }
    /// Check our placement parameters are usable.
    /// Zero, negative, and non-finite magnifications are all rejected, never defaulted.
    pub fn validate(&self) -> LayoutResult<()> {
        if !(self.magnification.is_finite() && self.magnification > 0.) {
            return Err(LayoutError::invalid(format!(
                "Reference to `{}` at ({}, {}) has invalid magnification {}",
                self.cell, self.origin.x, self.origin.y, self.magnification
            )));
        }
        if !self.rotation.is_finite() || !self.origin.is_finite() {
            return Err(LayoutError::invalid(format!(
                "Reference to `{}` has non-finite placement",
                self.cell
            )));
        }
        Ok(())
    }
}

/// # Layout Cell
///
/// Named container of geometric [Element]s and [Reference]s to other cells.
/// Both lists retain their insertion order.
///
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cell {
    /// Cell Name
    pub name: String,
    /// Primitive/ Geometric Elements
    pub elems: Vec<Element>,
    /// References to other Cells
    pub refs: Vec<Reference>,
}
impl Cell {
    /// Create a new and empty Cell named `name`
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// # Staged Label Geometry
///
/// Elements destined for cell `cell`, accumulated during a computation
/// and applied all at once by [Library::commit].
///
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelStage {
    /// Destination Cell Name
    pub cell: String,
    /// Staged Elements
    pub elems: Vec<Element>,
}
impl LabelStage {
    pub fn new(cell: impl Into<String>) -> Self {
        Self {
            cell: cell.into(),
            elems: Vec::new(),
        }
    }
    /// Add `elems` to the stage
    pub fn extend(&mut self, elems: impl IntoIterator<Item = Element>) {
        self.elems.extend(elems)
    }
    pub fn len(&self) -> usize {
        self.elems.len()
    }
    pub fn is_empty(&self) -> bool {
        self.elems.is_empty()
    }
}

/// # Raw Layout Library
///
/// A snapshot of a hierarchical design: a collection of uniquely named [Cell]s.
/// Tracks which cells have been modified since load (or since the last [Library::clear_dirty]).
///
/// Cells are never removed, so iteration over `cells` follows insertion order.
///
#[derive(Debug, Clone, Default)]
pub struct Library {
    /// Library Name
    pub name: String,
    /// Distance Units
    pub units: Units,
    /// Cell Definitions
    cells: SlotMap<CellKey, Cell>,
    /// Name to key index
    names: HashMap<String, CellKey>,
    /// Cells modified by [Library::commit]
    dirty: HashSet<CellKey>,
}
impl Library {
    /// Create a new and empty Library
    pub fn new(name: impl Into<String>, units: Units) -> Self {
        Self {
            name: name.into(),
            units,
            ..Default::default()
        }
    }
    /// Add a [Cell]. Fails if a cell of the same name already exists.
    pub fn add_cell(&mut self, cell: Cell) -> LayoutResult<CellKey> {
        if self.names.contains_key(&cell.name) {
            return Err(LayoutError::invalid(format!(
                "Duplicate cell name `{}`",
                cell.name
            )));
        }
        let name = cell.name.clone();
        let key = self.cells.insert(cell);
        self.names.insert(name, key);
        Ok(key)
    }
    /// Get the key of the cell named `name`
    pub fn key(&self, name: &str) -> Option<CellKey> {
        self.names.get(name).copied()
    }
    /// Get the cell named `name`
    pub fn cell(&self, name: &str) -> Option<&Cell> {
        self.key(name).and_then(|k| self.cells.get(k))
    }
    /// Get the cell named `name`, or fail with [LayoutError::NotFound]
    pub fn try_cell(&self, name: &str) -> LayoutResult<&Cell> {
        self.cell(name)
            .ok_or_else(|| LayoutError::not_found(format!("Cell `{}` not in library", name)))
    }
    /// Iterate over all cells, in insertion order
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.values()
    }
    /// All cell names, in insertion order
    pub fn cell_names(&self) -> Vec<&str> {
        self.cells.values().map(|c| c.name.as_str()).collect()
    }
    pub fn len(&self) -> usize {
        self.cells.len()
    }
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
    /// Flatten the cell named `name`, resolving every nested [Reference]
    /// into absolute-coordinate [Element]s.
    pub fn flatten(&self, name: &str) -> LayoutResult<Vec<Element>> {
        let cell = self.try_cell(name)?;
        // Kick off recursive calls, with the identity-transform applied for the top-level cell
        let mut elems = Vec::new();
        let mut stack = Vec::new();
        self.flatten_helper(cell, &Transform::identity(), &mut elems, &mut stack)?;
        Ok(elems)
    }
    /// Internal helper and core logic for [Library::flatten].
    fn flatten_helper<'l>(
        &'l self,
        cell: &'l Cell,
        trans: &Transform,
        elems: &mut Vec<Element>,
        stack: &mut Vec<&'l str>,
    ) -> LayoutResult<()> {
        if stack.contains(&cell.name.as_str()) {
            return Err(LayoutError::invalid(format!(
                "Cell `{}` instantiates itself through {}",
                cell.name,
                stack.join(" -> ")
            )));
        }
        stack.push(&cell.name);
        // Transform each geometric element
        for elem in cell.elems.iter() {
            elems.push(elem.transform(trans));
        }
        // Visit all of `cell`'s references, recursively getting their elements
        for rf in cell.refs.iter() {
            rf.validate()?;
            let child = self.try_cell(&rf.cell)?;
            // Create a new [Transform], cascading the parent's and reference's
            let trans = Transform::cascade(trans, &rf.transform());
            self.flatten_helper(child, &trans, elems, stack)?;
        }
        stack.pop();
        Ok(())
    }
    /// Hierarchical bounding box of the cell named `name`.
    /// Empty if the cell (and everything it references) has no geometry.
    pub fn bbox(&self, name: &str) -> LayoutResult<BoundBox> {
        Ok(self.flatten(name)?.bbox())
    }
    /// Append all staged elements to their destination cell, and mark it dirty.
    /// Returns the number of elements added.
    pub fn commit(&mut self, stage: LabelStage) -> LayoutResult<usize> {
        let key = self
            .key(&stage.cell)
            .ok_or_else(|| LayoutError::not_found(format!("Cell `{}` not in library", stage.cell)))?;
        let cell = self
            .cells
            .get_mut(key)
            .ok_or_else(|| LayoutError::msg(format!("Stale key for cell `{}`", stage.cell)))?;
        let count = stage.elems.len();
        cell.elems.extend(stage.elems);
        if count > 0 {
            self.dirty.insert(key);
        }
        Ok(count)
    }
    /// Names of cells modified since load, in insertion order
    pub fn dirty(&self) -> Vec<&str> {
        self.cells
            .iter()
            .filter(|(k, _)| self.dirty.contains(k))
            .map(|(_, c)| c.name.as_str())
            .collect()
    }
    /// Boolean indication of whether cell `name` has been modified since load
    pub fn is_dirty(&self, name: &str) -> bool {
        self.key(name).map_or(false, |k| self.dirty.contains(&k))
    }
    /// Forget all modifications, e.g. after saving
    pub fn clear_dirty(&mut self) {
        self.dirty.clear();
    }
}

/// Dependency-ordering of [Cell]s, such that every cell follows all the cells it references.
/// Fails on unknown reference-targets and on cycles.
impl DepOrder for Library {
    type Item = CellKey;
    type Error = LayoutError;

    fn process(&self, item: &CellKey, orderer: &mut DepOrderer<Self>) -> LayoutResult<()> {
        let cell = self
            .cells
            .get(*item)
            .ok_or_else(|| LayoutError::msg("Invalid cell key"))?;
        for rf in cell.refs.iter() {
            let key = self.key(&rf.cell).ok_or_else(|| {
                LayoutError::not_found(format!("Cell `{}` not in library", rf.cell))
            })?;
            orderer.push(&key)?;
        }
        Ok(())
    }
    fn cycle(&self, item: &CellKey) -> LayoutError {
        let name = self.cells.get(*item).map_or("?", |c| c.name.as_str());
        LayoutError::invalid(format!("Cell `{}` instantiates itself", name))
    }
}
