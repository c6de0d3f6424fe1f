//!
//! # Top-Level Operations
//!
//! Each operation takes its [Library] explicitly, along with a serde-configurable options struct.
//! Numbering operations stage all label geometry, and commit it into the parent cell
//! only after every label has been computed.
//!

// Std-Lib
use std::collections::{BTreeSet, HashMap};

// Crates.io
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

// Local imports
use crate::cancel::CancelToken;
use crate::extract::{cmp_keys, extract, reading_key, ExtractionRecord};
use crate::label::{fit_text_size, grid_offset, row_col, sequential, NumberingMode, SortDir};
use crate::locate::{locate, Anchor, InstanceRecord};
use crate::raw::{LabelStage, LayerSpec, LayoutError, LayoutResult, Library, Point};
use crate::text::{place, TextShapes};
use crate::utils::SerdeFile;

/// # Lens-Array Numbering Options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LensOptions {
    /// Cell to be labeled
    pub parent: String,
    /// Cell whose instances are numbered
    pub child: String,
    /// Text height
    pub size: f64,
    /// Clustering tolerance, and sequential bucket spacing
    pub tolerance: f64,
    pub mode: NumberingMode,
    pub sort_dir: SortDir,
    /// Minimum digits in sequential labels
    pub digit_width: usize,
    /// Label layer
    pub layer: LayerSpec,
    /// Label offset from each instance's center
    pub offset: Point,
}
impl Default for LensOptions {
    fn default() -> Self {
        Self {
            parent: String::new(),
            child: String::new(),
            size: 50.,
            tolerance: 1.,
            mode: NumberingMode::RowCol,
            sort_dir: SortDir::YFirst,
            digit_width: 4,
            layer: LayerSpec::new(66, 0),
            offset: Point::default(),
        }
    }
}
impl SerdeFile for LensOptions {}

/// # Shot-Array (Relative Grid) Numbering Options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShotOptions {
    /// Cell to be labeled
    pub parent: String,
    /// Cell whose instances are numbered
    pub child: String,
    /// Label budget (width, height), in the child's local units. Defaults to 100 x 100.
    pub text_area: [f64; 2],
    /// Label layer
    pub layer: LayerSpec,
    /// Label center, in the child's local coordinates
    pub text_anchor: Point,
}
impl Default for ShotOptions {
    fn default() -> Self {
        Self {
            parent: String::new(),
            child: String::new(),
            text_area: [100., 100.],
            layer: LayerSpec::new(100, 0),
            text_anchor: Point::default(),
        }
    }
}
impl SerdeFile for ShotOptions {}

/// # Pad Extraction Options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PadOptions {
    pub cell: String,
    pub layer: LayerSpec,
}
impl Default for PadOptions {
    fn default() -> Self {
        Self {
            cell: String::new(),
            layer: LayerSpec::new(9, 0),
        }
    }
}
impl SerdeFile for PadOptions {}

/// # Cell-Info Extraction Options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CellInfoOptions {
    pub parent: String,
    /// Names of the child cells to report
    pub targets: Vec<String>,
}
impl SerdeFile for CellInfoOptions {}

/// # Numbering Results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumberingReport {
    pub parent: String,
    pub child: String,
    /// Polygons added to `parent`
    pub placed: usize,
    /// Labels which produced no geometry
    pub skipped: usize,
    /// Numbered instances, in labeling order
    pub instances: Vec<InstanceRecord>,
}
impl SerdeFile for NumberingReport {}

/// # Extraction Results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionReport {
    pub cell: String,
    pub layer: LayerSpec,
    /// Extracted polygons, in reading order
    pub records: Vec<ExtractionRecord>,
}
impl SerdeFile for ExtractionReport {}

/// # Instance Summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceInfo {
    /// Referenced cell name
    pub cell: String,
    pub rotation: f64,
    pub magnification: f64,
    pub reflect_vert: bool,
    pub origin: Point,
    /// The referenced cell's bounding-box center, in parent coordinates
    pub center: Point,
}

/// # Cell-Info Results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceReport {
    pub parent: String,
    /// Matching instances, in reading order
    pub instances: Vec<InstanceInfo>,
}
impl SerdeFile for InstanceReport {}

fn check_positive(what: &str, val: f64) -> LayoutResult<()> {
    if !(val.is_finite() && val > 0.) {
        return Err(LayoutError::invalid(format!(
            "{} must be positive, got {}",
            what, val
        )));
    }
    Ok(())
}

/// Number the instances of `opts.child` in `opts.parent`, by row-column or sequential index.
///
/// Instances are positioned at their origin plus the child's bounding-box center,
/// ignoring rotation and reflection. Each label is centered at that position plus `opts.offset`.
/// Fails with [LayoutError::InvalidInput] if the child has no geometry.
pub fn number_lenses(
    lib: &mut Library,
    opts: &LensOptions,
    font: &dyn TextShapes,
    cancel: &CancelToken,
) -> LayoutResult<NumberingReport> {
    check_positive("Text size", opts.size)?;
    lib.try_cell(&opts.parent)?;
    let bbox = lib.bbox(&opts.child)?;
    let local_center = bbox.center().ok_or_else(|| {
        LayoutError::invalid(format!(
            "Cell `{}` has an empty bounding box",
            opts.child
        ))
    })?;
    let anchor = Anchor::TranslateOnly { local_center };
    let mut records = locate(lib, &opts.parent, &opts.child, &anchor)?;
    match opts.mode {
        NumberingMode::RowCol => row_col(&mut records, opts.tolerance)?,
        NumberingMode::Sequential => sequential(
            &mut records,
            opts.tolerance,
            opts.sort_dir,
            opts.digit_width,
        )?,
    }

    let mut stage = LabelStage::new(&opts.parent);
    let mut skipped = 0;
    for rec in records.iter_mut() {
        cancel.check()?;
        rec.anchor = rec.anchor.shift(&opts.offset);
        match place(&rec.label, opts.size, rec.anchor, opts.layer, font) {
            Some(elems) => stage.extend(elems),
            None => {
                warn!(label = %rec.label, "label produced no geometry, skipping");
                skipped += 1;
            }
        }
    }
    cancel.check()?;
    let placed = lib.commit(stage)?;
    info!(
        parent = %opts.parent,
        child = %opts.child,
        mode = %opts.mode,
        instances = records.len(),
        placed,
        "numbered lenses"
    );
    Ok(NumberingReport {
        parent: opts.parent.clone(),
        child: opts.child.clone(),
        placed,
        skipped,
        instances: records,
    })
}

/// Number the instances of `opts.child` in `opts.parent` by grid offset from the array's center.
///
/// Instances are positioned at their fully-transformed local origin.
/// Each label is centered on the fully-transformed `opts.text_anchor`,
/// and sized to fit `opts.text_area`, scaled by its instance's magnification.
pub fn number_shots(
    lib: &mut Library,
    opts: &ShotOptions,
    font: &dyn TextShapes,
    cancel: &CancelToken,
) -> LayoutResult<NumberingReport> {
    let [area_w, area_h] = opts.text_area;
    check_positive("Text area width", area_w)?;
    check_positive("Text area height", area_h)?;
    let anchor = Anchor::FullTransform {
        sort_local: Point::default(),
        text_local: opts.text_anchor,
    };
    let mut records = locate(lib, &opts.parent, &opts.child, &anchor)?;
    grid_offset(&mut records)?;

    let mut stage = LabelStage::new(&opts.parent);
    let mut skipped = 0;
    for rec in records.iter() {
        cancel.check()?;
        let size = fit_text_size(&rec.label, area_w, area_h, rec.magnification);
        match place(&rec.label, size, rec.anchor, opts.layer, font) {
            Some(elems) => stage.extend(elems),
            None => {
                warn!(label = %rec.label, "label produced no geometry, skipping");
                skipped += 1;
            }
        }
    }
    cancel.check()?;
    let placed = lib.commit(stage)?;
    info!(
        parent = %opts.parent,
        child = %opts.child,
        instances = records.len(),
        placed,
        "numbered shots"
    );
    Ok(NumberingReport {
        parent: opts.parent.clone(),
        child: opts.child.clone(),
        placed,
        skipped,
        instances: records,
    })
}

/// Extract the polygons of `opts.cell` on `opts.layer`, flattening all hierarchy, in reading order.
pub fn extract_pads(lib: &Library, opts: &PadOptions) -> LayoutResult<ExtractionReport> {
    let flat = lib.flatten(&opts.cell)?;
    let records = extract(&flat, opts.layer)?;
    info!(cell = %opts.cell, layer = %opts.layer, count = records.len(), "extracted pads");
    Ok(ExtractionReport {
        cell: opts.cell.clone(),
        layer: opts.layer,
        records,
    })
}

/// Sorted, distinct names of the cells directly referenced by `parent`
pub fn child_names(lib: &Library, parent: &str) -> LayoutResult<Vec<String>> {
    let cell = lib.try_cell(parent)?;
    let names: BTreeSet<&str> = cell.refs.iter().map(|r| r.cell.as_str()).collect();
    Ok(names.into_iter().map(String::from).collect())
}

/// Summarize every direct reference in `opts.parent` to any of `opts.targets`, in reading order.
///
/// Each instance is positioned at its cell's bounding-box center, mapped through its full transform.
/// Cells without geometry are positioned at their origin.
pub fn extract_instances(lib: &Library, opts: &CellInfoOptions) -> LayoutResult<InstanceReport> {
    let parent = lib.try_cell(&opts.parent)?;
    if opts.targets.is_empty() {
        return Err(LayoutError::not_found("No target cells selected"));
    }
    // Local centers, by target name
    let mut centers: HashMap<&str, Point> = HashMap::with_capacity(opts.targets.len());
    for target in opts.targets.iter() {
        let bbox = lib.bbox(target)?;
        centers.insert(target, bbox.center().unwrap_or_default());
    }

    let mut instances = Vec::new();
    for rf in parent.refs.iter() {
        let local = match centers.get(rf.cell.as_str()) {
            Some(local) => *local,
            None => continue,
        };
        rf.validate()?;
        instances.push(InstanceInfo {
            cell: rf.cell.clone(),
            rotation: rf.rotation,
            magnification: rf.magnification,
            reflect_vert: rf.reflect_vert,
            origin: rf.origin,
            center: rf.compose(local),
        });
    }
    if instances.is_empty() {
        return Err(LayoutError::not_found(format!(
            "No references to {:?} in `{}`",
            opts.targets, opts.parent
        )));
    }
    instances.sort_by(|a, b| cmp_keys(reading_key(&a.center), reading_key(&b.center)));
    info!(parent = %opts.parent, count = instances.len(), "extracted instances");
    Ok(InstanceReport {
        parent: opts.parent.clone(),
        instances,
    })
}
