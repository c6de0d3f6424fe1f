//!
//! # Serialization & Deserialization Utilities
//! (and file IO for those serialized objects)
//!
//! Designs, run-configurations and reports are all stored as one of the
//! [SerializationFormat]s, typically selected by file extension.
//!

// Std-Lib
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

// Crates.io
use serde::de::DeserializeOwned;
use serde::Serialize;
use textwrap::dedent;

/// # Enumerated First-Class-Supported Serialization Formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerializationFormat {
    Json,
    Yaml,
    Toml,
}
impl SerializationFormat {
    /// Infer the format from a file extension, e.g. "json", "yml", or "toml".
    /// Matching is case-insensitive.
    pub fn from_ext(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }
    /// Infer the format from the extension of file-path `fname`
    pub fn from_path(fname: impl AsRef<Path>) -> Result<Self, Error> {
        let path = fname.as_ref();
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        Self::from_ext(ext).ok_or_else(|| {
            Error::msg(format!(
                "Cannot infer serialization format for `{}`; expected .json, .yaml, .yml, or .toml",
                path.display()
            ))
        })
    }
    /// Convert any [serde::Serialize] data to a serialized string
    pub fn to_string(&self, data: &impl Serialize) -> Result<String, Error> {
        match *self {
            Self::Json => Ok(serde_json::to_string_pretty(data)?),
            Self::Yaml => Ok(serde_yaml::to_string(data)?),
            Self::Toml => Ok(toml::to_string(data)?),
        }
    }
    /// Parse string `s`.
    /// Leading indentation common to all lines is removed first,
    /// so that inline (e.g. test-embedded) strings parse as written.
    pub fn from_str<T: DeserializeOwned>(&self, s: &str) -> Result<T, Error> {
        let s = dedent(s);
        match *self {
            Self::Json => Ok(serde_json::from_str(&s)?),
            Self::Yaml => Ok(serde_yaml::from_str(&s)?),
            Self::Toml => Ok(toml::from_str(&s)?),
        }
    }
    /// Save `data` to file `fname`
    pub fn save(&self, data: &impl Serialize, fname: impl AsRef<Path>) -> Result<(), Error> {
        let s = self.to_string(data)?;
        let mut file = BufWriter::new(std::fs::File::create(fname)?);
        file.write_all(s.as_bytes())?;
        file.flush()?;
        Ok(())
    }
    /// Load from file at path `fname`
    pub fn open<T: DeserializeOwned>(&self, fname: impl AsRef<Path>) -> Result<T, Error> {
        let file = std::fs::File::open(&fname)?;
        let mut file = BufReader::new(file);
        let rv: T = match *self {
            Self::Json => serde_json::from_reader(file)?,
            Self::Yaml => serde_yaml::from_reader(file)?,
            Self::Toml => {
                // No reader-based API for TOML; read it all first
                let mut s = String::new();
                file.read_to_string(&mut s)?;
                toml::from_str(&s)?
            }
        };
        Ok(rv)
    }
}

/// Serialization to & from file trait
///
/// Includes:
/// * `save` / `open` for an explicit [SerializationFormat]
/// * `save_to` / `load` for a format inferred from the file extension
///
/// Fully default-implemented, allowing empty implementations
/// for types that implement [serde] serialization and deserialization.
///
pub trait SerdeFile: Serialize + DeserializeOwned {
    /// Save in `fmt`-format to file `fname`
    fn save(&self, fmt: SerializationFormat, fname: impl AsRef<Path>) -> Result<(), Error> {
        fmt.save(self, fname)
    }
    /// Open from `fmt`-format file `fname`
    fn open(fname: impl AsRef<Path>, fmt: SerializationFormat) -> Result<Self, Error> {
        fmt.open(fname)
    }
    /// Save to file `fname`, in the format indicated by its extension
    fn save_to(&self, fname: impl AsRef<Path>) -> Result<(), Error> {
        let fmt = SerializationFormat::from_path(&fname)?;
        fmt.save(self, fname)
    }
    /// Load from file `fname`, in the format indicated by its extension
    fn load(fname: impl AsRef<Path>) -> Result<Self, Error> {
        let fmt = SerializationFormat::from_path(&fname)?;
        fmt.open(fname)
    }
}

/// Wrapper over the underlying format and IO errors
#[derive(Debug)]
pub struct Error(Box<dyn std::error::Error + Send + Sync>);
impl Error {
    /// Create an [Error] from a string message
    pub fn msg(s: impl Into<String>) -> Self {
        Self(s.into().into())
    }
    /// Get a reference to the underlying [std::io::Error], if this is one.
    /// Used to surface file-system failures unchanged.
    pub fn io(&self) -> Option<&std::io::Error> {
        self.0.downcast_ref::<std::io::Error>()
    }
    /// Convert into the underlying [std::io::Error] if this is one, or return `self` otherwise
    pub fn into_io(self) -> Result<std::io::Error, Self> {
        match self.0.downcast::<std::io::Error>() {
            Ok(io) => Ok(*io),
            Err(other) => Err(Self(other)),
        }
    }
}
impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&*self.0)
    }
}
impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self(Box::new(e))
    }
}
impl From<serde_yaml::Error> for Error {
    fn from(e: serde_yaml::Error) -> Self {
        Self(Box::new(e))
    }
}
impl From<toml::ser::Error> for Error {
    fn from(e: toml::ser::Error) -> Self {
        Self(Box::new(e))
    }
}
impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Self(Box::new(e))
    }
}
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self(Box::new(e))
    }
}
