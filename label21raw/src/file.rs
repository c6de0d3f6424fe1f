//!
//! # Design-File Import & Export Module
//!
//! Designs are stored as [DesignFile]s, in any of the [SerializationFormat]s.
//! [DesignImporter] converts these into [Library]s, resolving every reference-target
//! (which may be written as either a cell name or a cell index) into a cell name.
//! [DesignExporter] performs the reverse, always writing names.
//!

// Std-Lib
use std::collections::HashSet;
use std::path::Path;

// Crates.io
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// Local Imports
use crate::{
    data::{Cell, Element, LayerSpec, Library, Reference, Units},
    error::{ErrorContext, LayoutError, LayoutResult},
    geom::{Point, Polygon},
    utils::{DepOrder, ErrorHelper, SerdeFile, SerializationFormat, Unwrapper},
};

/// # Design File
///
/// The on-disk form of a [Library].
///
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct DesignFile {
    /// Library Name
    pub name: String,
    /// Distance Units
    #[serde(default)]
    pub units: Units,
    /// Cell Definitions
    pub cells: Vec<CellDef>,
}
impl SerdeFile for DesignFile {}

/// # Cell Definition
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct CellDef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub elems: Vec<ElementDef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub refs: Vec<RefDef>,
}

/// # Polygon Element Definition
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ElementDef {
    pub layer: i16,
    #[serde(default)]
    pub datatype: i16,
    /// Vertices as `[x, y]` pairs. At least three, all finite.
    pub points: Vec<[f64; 2]>,
}

/// # Cell Reference Definition
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct RefDef {
    /// Target cell, by name or by index into [DesignFile::cells]
    pub cell: CellRef,
    #[serde(default)]
    pub origin: [f64; 2],
    /// Counter-clockwise rotation in radians. Defaults to zero.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    /// Defaults to one. An explicit zero is an error, not a default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub magnification: Option<f64>,
    /// Reflection about the x-axis
    #[serde(default)]
    pub reflect: bool,
}

/// # Reference Target
/// Either representation is accepted on import; only names are written on export.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(untagged)]
pub enum CellRef {
    Name(String),
    Index(usize),
}

impl Library {
    /// Open a [Library] from design-file `fname`, in the format indicated by its extension
    pub fn open(fname: impl AsRef<Path>) -> LayoutResult<Library> {
        let file = DesignFile::load(fname)?;
        DesignImporter::import(&file)
    }
    /// Parse a [Library] from string `s` in format `fmt`
    pub fn parse(fmt: SerializationFormat, s: &str) -> LayoutResult<Library> {
        let file: DesignFile = fmt.from_str(s)?;
        DesignImporter::import(&file)
    }
    /// Save to design-file `fname`, in the format indicated by its extension
    pub fn save(&self, fname: impl AsRef<Path>) -> LayoutResult<()> {
        let file = DesignExporter::export(self)?;
        file.save_to(fname)?;
        Ok(())
    }
}

/// # Design-File Importer
#[derive(Debug)]
pub struct DesignImporter<'f> {
    file: &'f DesignFile,
    ctx_stack: Vec<ErrorContext>,
}
impl<'f> DesignImporter<'f> {
    /// Import a [DesignFile] into a [Library]
    pub fn import(file: &'f DesignFile) -> LayoutResult<Library> {
        let mut importer = Self {
            file,
            ctx_stack: vec![ErrorContext::Design(file.name.clone())],
        };
        importer.import_lib()
    }
    /// Internal implementation method. Convert all, starting from the top-level [DesignFile].
    fn import_lib(&mut self) -> LayoutResult<Library> {
        let file = self.file;
        let mut lib = Library::new(&file.name, file.units);
        // Collect names up front, both for duplicate-detection and for checking reference targets
        let mut names = HashSet::with_capacity(file.cells.len());
        for cell in file.cells.iter() {
            if !names.insert(cell.name.as_str()) {
                return self.fail(format!("Duplicate cell name `{}`", cell.name));
            }
        }
        for celldef in file.cells.iter() {
            let cell = self.import_cell(celldef, &names)?;
            lib.add_cell(cell)?;
        }
        // Check for cells which instantiate themselves, directly or otherwise
        let keys: Vec<_> = lib.cells().filter_map(|c| lib.key(&c.name)).collect();
        if let Err(e) = lib.order(&keys) {
            return self.fail(e.to_string());
        }
        Ok(lib)
    }
    /// Import a [CellDef] into a [Cell]
    fn import_cell(&mut self, celldef: &CellDef, names: &HashSet<&str>) -> LayoutResult<Cell> {
        self.ctx_stack.push(ErrorContext::Cell(celldef.name.clone()));
        let mut cell = Cell::new(&celldef.name);
        for (idx, elemdef) in celldef.elems.iter().enumerate() {
            cell.elems.push(self.import_element(idx, elemdef)?);
        }
        for (idx, refdef) in celldef.refs.iter().enumerate() {
            cell.refs.push(self.import_reference(idx, refdef, names)?);
        }
        self.ctx_stack.pop();
        Ok(cell)
    }
    /// Import an [ElementDef] into an [Element]
    fn import_element(&mut self, idx: usize, elemdef: &ElementDef) -> LayoutResult<Element> {
        self.ctx_stack.push(ErrorContext::Element(idx));
        self.assert(
            elemdef.points.len() >= 3,
            format!("Polygon has {} points, needs at least 3", elemdef.points.len()),
        )?;
        let points: Vec<Point> = elemdef
            .points
            .iter()
            .map(|[x, y]| Point::new(*x, *y))
            .collect();
        self.assert(
            points.iter().all(Point::is_finite),
            "Polygon has non-finite coordinates",
        )?;
        let layer = LayerSpec::new(elemdef.layer, elemdef.datatype);
        self.ctx_stack.pop();
        Ok(Element::new(layer, Polygon::new(points)))
    }
    /// Import a [RefDef] into a [Reference], resolving its target to a name
    fn import_reference(
        &mut self,
        idx: usize,
        refdef: &RefDef,
        names: &HashSet<&str>,
    ) -> LayoutResult<Reference> {
        let target = self.resolve(&refdef.cell, names)?;
        self.ctx_stack.push(ErrorContext::Reference(idx, target.clone()));
        let [x, y] = refdef.origin;
        let rf = Reference {
            cell: target,
            origin: Point::new(x, y),
            rotation: refdef.rotation.unwrap_or(0.),
            magnification: refdef.magnification.unwrap_or(1.),
            reflect_vert: refdef.reflect,
        };
        // Invalid magnifications are reported as such, rather than as general import failures
        rf.validate()?;
        self.ctx_stack.pop();
        Ok(rf)
    }
    /// Resolve a [CellRef] to the name of an existing cell
    fn resolve(&self, cellref: &CellRef, names: &HashSet<&str>) -> LayoutResult<String> {
        match cellref {
            CellRef::Name(name) => {
                self.assert(
                    names.contains(name.as_str()),
                    format!("Reference to undefined cell `{}`", name),
                )?;
                Ok(name.clone())
            }
            CellRef::Index(idx) => {
                let cell = self.file.cells.get(*idx).unwrapper(
                    self,
                    format!("Reference to cell index {} of {}", idx, self.file.cells.len()),
                )?;
                Ok(cell.name.clone())
            }
        }
    }
}
impl ErrorHelper for DesignImporter<'_> {
    type Error = LayoutError;
    fn err(&self, msg: impl Into<String>) -> LayoutError {
        LayoutError::Import {
            message: msg.into(),
            stack: self.ctx_stack.clone(),
        }
    }
}

/// # Design-File Exporter
#[derive(Debug)]
pub struct DesignExporter<'l> {
    lib: &'l Library,
    ctx_stack: Vec<ErrorContext>,
}
impl<'l> DesignExporter<'l> {
    /// Export a [Library] to a [DesignFile]
    pub fn export(lib: &'l Library) -> LayoutResult<DesignFile> {
        let mut exporter = Self {
            lib,
            ctx_stack: vec![ErrorContext::Design(lib.name.clone())],
        };
        exporter.export_lib()
    }
    fn export_lib(&mut self) -> LayoutResult<DesignFile> {
        let lib = self.lib;
        let cells = lib
            .cells()
            .map(|c| self.export_cell(c))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(DesignFile {
            name: lib.name.clone(),
            units: lib.units,
            cells,
        })
    }
    fn export_cell(&mut self, cell: &Cell) -> LayoutResult<CellDef> {
        self.ctx_stack.push(ErrorContext::Cell(cell.name.clone()));
        let elems = cell
            .elems
            .iter()
            .map(|e| ElementDef {
                layer: e.layer.layernum,
                datatype: e.layer.datatype,
                points: e.inner.points.iter().map(|p| [p.x, p.y]).collect(),
            })
            .collect();
        let mut refs = Vec::with_capacity(cell.refs.len());
        for (idx, rf) in cell.refs.iter().enumerate() {
            self.ctx_stack.push(ErrorContext::Reference(idx, rf.cell.clone()));
            self.assert(
                self.lib.cell(&rf.cell).is_some(),
                format!("Reference to undefined cell `{}`", rf.cell),
            )?;
            refs.push(RefDef {
                cell: CellRef::Name(rf.cell.clone()),
                origin: [rf.origin.x, rf.origin.y],
                rotation: (rf.rotation != 0.).then_some(rf.rotation),
                magnification: (rf.magnification != 1.).then_some(rf.magnification),
                reflect: rf.reflect_vert,
            });
            self.ctx_stack.pop();
        }
        self.ctx_stack.pop();
        Ok(CellDef {
            name: cell.name.clone(),
            elems,
            refs,
        })
    }
}
impl ErrorHelper for DesignExporter<'_> {
    type Error = LayoutError;
    fn err(&self, msg: impl Into<String>) -> LayoutError {
        LayoutError::Export {
            message: msg.into(),
            stack: self.ctx_stack.clone(),
        }
    }
}
