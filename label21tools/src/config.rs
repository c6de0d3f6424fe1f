//!
//! # Run Configuration
//!
//! Programs start from a run-options struct, either its defaults or a `--config` file
//! in any [SerializationFormat], and then overlay any explicitly-provided command-line flags.
//!

// Std-Lib
use std::path::Path;

// Crates.io
use tracing::{debug, info};

// Local imports
use crate::raw::{LayoutResult, Library};
use crate::utils::{SerdeFile, SerializationFormat};

/// Load run-options from `path` if provided, else start from their defaults
pub fn load_options<T: SerdeFile + Default>(path: Option<&Path>) -> LayoutResult<T> {
    match path {
        Some(p) => {
            debug!(path = %p.display(), "loading run options");
            Ok(T::load(p)?)
        }
        None => Ok(T::default()),
    }
}

/// Overwrite `field` with `flag`, if the flag was provided
pub fn overlay<T: Clone>(field: &mut T, flag: &Option<T>) {
    if let Some(val) = flag {
        *field = val.clone();
    }
}

/// Open the design file at `path`
pub fn load_design(path: &Path) -> LayoutResult<Library> {
    let lib = Library::open(path)?;
    info!(path = %path.display(), cells = lib.len(), "loaded design");
    Ok(lib)
}

/// Save `lib` to `path` if provided, and mark it clean.
/// Without a `path`, modifications are discarded.
pub fn save_design(lib: &mut Library, path: Option<&Path>) -> LayoutResult<()> {
    let path = match path {
        Some(p) => p,
        None => {
            debug!(dirty = ?lib.dirty(), "no output design, discarding changes");
            return Ok(());
        }
    };
    lib.save(path)?;
    info!(path = %path.display(), modified = ?lib.dirty(), "saved design");
    lib.clear_dirty();
    Ok(())
}

/// Write `report` to `path` in the format indicated by its extension, or to stdout as YAML
pub fn emit_report<T: SerdeFile>(report: &T, path: Option<&Path>) -> LayoutResult<()> {
    match path {
        Some(p) => {
            report.save_to(p)?;
            info!(path = %p.display(), "wrote report");
        }
        None => print!("{}", SerializationFormat::Yaml.to_string(report)?),
    }
    Ok(())
}
