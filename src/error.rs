//! Error types for parsing and value access.
//!
//! Two failure classes exist: malformed source text (a path expression or a
//! JSON/TOML document) and typed access against a node holding an
//! incompatible variant. Parse errors carry the line/column where the
//! grammar violation was detected; the parser does not resynchronize, so the
//! partial state of the target tree after a failed parse is unspecified.
//!
//! ```rust
//! use confval::{from_toml_inline_str, Error};
//!
//! let err = from_toml_inline_str("{ a = 12 b = 13 }").unwrap_err();
//! assert!(matches!(err, Error::Parse { .. }));
//! ```

use std::fmt;
use thiserror::Error;

/// All errors surfaced by this crate.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// IO error while reading a configuration file.
    #[error("IO error: {0}")]
    Io(String),

    /// Malformed path expression or document text.
    #[error("parse error at line {line}, column {col}: {msg}")]
    Parse {
        line: usize,
        col: usize,
        msg: String,
    },

    /// A typed accessor was invoked against an incompatible variant.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// A mutable negative array index resolved before the start of the
    /// array. Read-only access treats the same index as a miss.
    #[error("array index {index} out of range for length {len}")]
    IndexOutOfRange { index: i64, len: usize },
}

impl Error {
    /// Creates a parse error with source position information.
    pub fn parse<T: fmt::Display>(line: usize, col: usize, msg: T) -> Self {
        Error::Parse {
            line,
            col,
            msg: msg.to_string(),
        }
    }

    /// Creates a type mismatch error from the expected and actual variant names.
    pub fn type_mismatch(expected: &'static str, found: &'static str) -> Self {
        Error::TypeMismatch { expected, found }
    }

    /// Creates an I/O error for file reading failures.
    pub fn io<T: fmt::Display>(msg: T) -> Self {
        Error::Io(msg.to_string())
    }

    /// Creates an out-of-range error for a negative array index.
    pub fn index_out_of_range(index: i64, len: usize) -> Self {
        Error::IndexOutOfRange { index, len }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
