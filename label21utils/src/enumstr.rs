//!
//! # Enum-String Mapping Module
//!
//! Defines the [enumstr] macro and paired [EnumStr] trait,
//! for enumerations which arrive as one of a fixed set of strings:
//! command-line flags, run-configuration files, and the like.
//!
//! Example:
//!
//! ```rs
//! use label21utils::enumstr;
//!
//! enumstr!(
//! /// # Reading Direction
//! ReadDir {
//!     Rows: "rows",
//!     Cols: "cols",
//!  }
//! );
//! ```
//!

///
/// # String-Enumeration Trait
///
/// * `to_str(&self) -> &'static str` converts the enum to its string value.
/// * `from_str(&str) -> Option<Self>` does the opposite.
/// * `values()` lists every accepted string, e.g. for help and error text.
///
pub trait EnumStr: std::marker::Sized {
    fn to_str(&self) -> &'static str;
    fn from_str(txt: &str) -> Option<Self>;
    fn values() -> &'static [&'static str];
}

///
/// # Enum-String Pairing Macro
///
/// Creates an `enum` which:
/// * (a) Has paired string-values
/// * (b) Implements [EnumStr]
/// * (c) Implements [std::fmt::Display], writing the string-values
/// * (d) Implements [std::str::FromStr], so it can be parsed from command-line arguments
/// * (e) Serializes and deserializes *as* its string-values
///
/// Invocation sites must have `serde::{Deserialize, Serialize}` in scope.
///
#[macro_export]
macro_rules! enumstr {
    (   $(#[$meta: meta])*
        $enum_name: ident {
        $( $variant: ident : $strval: literal ),* $(,)?
    }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, Hash)]
        pub enum $enum_name {
            $( #[doc=$strval]
               #[serde(rename=$strval)]
                $variant ),*
        }
        impl $crate::EnumStr for $enum_name {
            fn to_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => $strval),*,
                }
            }
            /// Note `from_str` is case *sensitive*.
            fn from_str(txt: &str) -> Option<Self> {
                match txt {
                    $( $strval => Some(Self::$variant)),*,
                    _ => None,
                }
            }
            fn values() -> &'static [&'static str] {
                &[$( $strval ),*]
            }
        }
        impl ::std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
                write!(f, "{}", <Self as $crate::EnumStr>::to_str(self))
            }
        }
        impl ::std::str::FromStr for $enum_name {
            type Err = String;
            fn from_str(txt: &str) -> Result<Self, Self::Err> {
                <Self as $crate::EnumStr>::from_str(txt).ok_or_else(|| {
                    format!(
                        "Invalid {} `{}`, expected one of: {}",
                        stringify!($enum_name),
                        txt,
                        <Self as $crate::EnumStr>::values().join(", ")
                    )
                })
            }
        }
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    enumstr!(
        /// # Reading Direction
        ReadDir {
            Rows: "rows",
            Cols: "cols",
        }
    );

    #[test]
    fn test_enumstr() {
        assert_eq!(ReadDir::Rows.to_str(), "rows");
        assert_eq!(ReadDir::Cols.to_string(), "cols");
        assert_eq!(<ReadDir as EnumStr>::from_str("rows"), Some(ReadDir::Rows));
        assert_eq!(<ReadDir as EnumStr>::from_str("ROWS"), None);
        assert_eq!(ReadDir::values(), &["rows", "cols"]);

        let parsed: Result<ReadDir, _> = "cols".parse();
        assert_eq!(parsed, Ok(ReadDir::Cols));
        let bad: Result<ReadDir, _> = "diag".parse();
        assert_eq!(
            bad,
            Err("Invalid ReadDir `diag`, expected one of: rows, cols".to_string())
        );
    }
    #[test]
    fn test_enumstr_serde() {
        let s = serde_json::to_string(&ReadDir::Cols).unwrap();
        assert_eq!(s, "\"cols\"");
        let d: ReadDir = serde_json::from_str("\"rows\"").unwrap();
        assert_eq!(d, ReadDir::Rows);
    }
}
