//!
//! # Layout Result and Error Types
//!

// Local Imports
pub use crate::utils::{self, ErrorContext};

/// # [LayoutError] Result Type
pub type LayoutResult<T> = Result<T, LayoutError>;

///
/// # Layout Error Enumeration
///
pub enum LayoutError {
    /// Unknown cell name, or nothing matching a requested filter
    NotFound(String),
    /// Well-formed but unusable input, e.g. zero magnification or an empty template cell
    InvalidInput(String),
    /// File-system errors, surfaced unchanged
    Io(std::io::Error),
    /// Error Importing from the design-file format
    Import {
        message: String,
        stack: Vec<ErrorContext>,
    },
    /// Error Exporting to the design-file format
    Export {
        message: String,
        stack: Vec<ErrorContext>,
    },
    /// Boxed External Errors
    Boxed(Box<dyn std::error::Error + Send + Sync>),
    /// Uncategorized Error, with String Message
    Str(String),
    /// Cancelled by the caller, between per-instance steps
    Cancelled,
}
impl LayoutError {
    /// Create a [LayoutError::Str] from anything String-convertible
    pub fn msg(s: impl Into<String>) -> Self {
        Self::Str(s.into())
    }
    /// Create an error-variant [Result] of our [LayoutError::Str] variant
    pub fn fail<T>(s: impl Into<String>) -> Result<T, Self> {
        Err(Self::msg(s))
    }
    /// Create a [LayoutError::NotFound]
    pub fn not_found(s: impl Into<String>) -> Self {
        Self::NotFound(s.into())
    }
    /// Create a [LayoutError::InvalidInput]
    pub fn invalid(s: impl Into<String>) -> Self {
        Self::InvalidInput(s.into())
    }
    /// Boolean indication of the [LayoutError::NotFound] variant
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
    /// Boolean indication of the [LayoutError::InvalidInput] variant
    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}
impl std::fmt::Debug for LayoutError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            LayoutError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            LayoutError::InvalidInput(msg) => write!(f, "Invalid Input: {}", msg),
            LayoutError::Io(err) => write!(f, "IO Error: {}", err),
            LayoutError::Import { message, stack } => {
                write!(f, "Import Error: \n - {} \n - {:?}", message, stack)
            }
            LayoutError::Export { message, stack } => {
                write!(f, "Export Error: \n - {} \n - {:?}", message, stack)
            }
            LayoutError::Boxed(err) => write!(f, "{}", err),
            LayoutError::Str(err) => write!(f, "{}", err),
            LayoutError::Cancelled => write!(f, "Cancelled"),
        }
    }
}
impl std::fmt::Display for LayoutError {
    /// Delegates to the [Debug] implementation
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}
impl std::error::Error for LayoutError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Boxed(e) => Some(&**e),
            _ => None,
        }
    }
}

impl From<String> for LayoutError {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}
impl From<&str> for LayoutError {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}
impl From<std::io::Error> for LayoutError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
impl From<utils::ser::Error> for LayoutError {
    /// IO failures pass through as [LayoutError::Io]; format errors are boxed.
    fn from(e: utils::ser::Error) -> Self {
        match e.into_io() {
            Ok(io) => Self::Io(io),
            Err(e) => Self::Boxed(Box::new(e)),
        }
    }
}
