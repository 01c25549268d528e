//! # confval
//!
//! A hierarchical, dynamically-typed value tree with path-based access,
//! built for layered program configuration.
//!
//! ## What is a value tree?
//!
//! A [`Value`] holds one of seven variants: nil, bool, integer, float,
//! string, array, or insertion-ordered object. Trees are addressed with
//! dotted path expressions (`server.hosts[-1]`, `a["dotted.key"]`) that
//! auto-create intermediate nodes on mutable access and resolve misses to a
//! shared nil sentinel on read-only access, so lookups never fail and
//! assignments never need scaffolding.
//!
//! ## Key Features
//!
//! - **Path Queries**: quote- and bracket-aware path expressions with
//!   negative array indices and nested quoting
//! - **Safe Defaulting**: every node knows whether it was explicitly
//!   assigned, so defaults fill gaps without clobbering data
//!   ([`Value::or_set`], [`Value::merge_default`])
//! - **Two Formats**: a TOML-style document reader/writer and a strict JSON
//!   reader/writer over the same tree
//! - **Lexical Toolbox**: the parsers' cursor, quoting, splitting, and
//!   escape/expansion primitives are exported in [`lex`]
//! - **No Unsafe Code**: written entirely in safe Rust
//!
//! ## Quick Start
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! confval = "0.1"
//! ```
//!
//! ### Building and querying a tree
//!
//! ```rust
//! use confval::{value, Value, NIL};
//!
//! let mut c = Value::new();
//! c["server.port"] = Value::from(8080);
//! c["server.hosts"] = value!(["alpha", "beta"]);
//!
//! assert_eq!(c["server.port"], 8080);
//! assert_eq!(c["server.hosts[-1]"], "beta");
//! assert_eq!(c["server.tls.cert"], NIL); // read misses are nil, not panics
//! ```
//!
//! ### Reading configuration text
//!
//! ```rust
//! use confval::from_toml_str;
//!
//! let c = from_toml_str(r#"
//!     ## deployment target
//!     name = "edge-1"
//!
//!     [server]
//!     port = 8080
//!     hosts = ["alpha", "beta"]
//!
//!     [[server.routes]]
//!     path = "/api"
//! "#).unwrap();
//!
//! assert_eq!(c["server.routes[0].path"], "/api");
//! ```
//!
//! ### Defaults that never clobber
//!
//! ```rust
//! use confval::{value, Value};
//!
//! let mut c = Value::new();
//! c.read_string("retries = 7").unwrap();
//! c.merge_default(&value!({"retries": 3, "timeout": 30}));
//!
//! assert_eq!(c["retries"], 7);  // kept
//! assert_eq!(c["timeout"], 30); // filled
//! ```
//!
//! ## Performance Characteristics
//!
//! - **Parsing**: O(n) single-pass with no backtracking
//! - **Path lookup**: O(s) in the number of segments, each an ordered-map
//!   probe or array index
//! - **Writing**: O(n) into a pre-allocated buffer

pub mod de;
pub mod error;
pub mod lex;
pub mod macros;
pub mod map;
pub mod path;
pub mod ser;
pub mod value;

pub use de::Parser;
pub use error::{Error, Result};
pub use map::Map;
pub use value::{Kind, Value, NIL};

use log::debug;
use std::path::Path as FsPath;

/// Parses a string of JSON text into a value tree.
///
/// The whole input must be consumed; trailing non-whitespace content is an
/// error. A JSON `null` parses to an explicitly-set nil node.
///
/// # Examples
///
/// ```rust
/// use confval::from_json_str;
///
/// let v = from_json_str(r#"{"name": "Alice", "scores": [8, 15.5]}"#).unwrap();
/// assert_eq!(v["scores[1]"], 15.5);
/// ```
///
/// # Errors
///
/// Returns [`Error::Parse`] with line/column information when the input is
/// not valid JSON.
pub fn from_json_str(input: &str) -> Result<Value> {
    let mut parser = Parser::new(input);
    let value = parser.parse_json()?;
    parser.expect_end(false)?;
    Ok(value)
}

/// Parses a TOML document into a fresh value tree.
///
/// Recognizes `#` comments, dotted and quoted keys, `[table]` and
/// `[[array-of-tables]]` headers, and the full inline value grammar. To
/// merge a document into an existing tree instead, use
/// [`Value::read_string`].
///
/// # Errors
///
/// Returns [`Error::Parse`] with line/column information when the input is
/// not a valid document.
pub fn from_toml_str(input: &str) -> Result<Value> {
    let mut root = Value::new();
    root.read_string(input)?;
    Ok(root)
}

/// Parses a single inline TOML value: a scalar, a bracketed array, or an
/// `{key = value}` table.
///
/// The whole input must be consumed; trailing non-whitespace content is an
/// error.
///
/// # Examples
///
/// ```rust
/// use confval::from_toml_inline_str;
///
/// let v = from_toml_inline_str("{port = 8080, hosts = ['a', 'b']}").unwrap();
/// assert_eq!(v["hosts[1]"], "b");
/// ```
///
/// # Errors
///
/// Returns [`Error::Parse`] when the input is not a single valid inline
/// value.
pub fn from_toml_inline_str(input: &str) -> Result<Value> {
    let mut parser = Parser::new(input);
    let value = parser.parse_toml_inline()?;
    parser.expect_end(false)?;
    Ok(value)
}

/// Reads a configuration file, picking the format by extension: `.json`
/// parses as JSON, anything else as a TOML document.
///
/// # Errors
///
/// Returns [`Error::Io`] when the file cannot be read, or [`Error::Parse`]
/// when its contents are malformed.
pub fn from_file<P: AsRef<FsPath>>(path: P) -> Result<Value> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .map_err(|e| Error::io(format!("{}: {e}", path.display())))?;
    let json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    debug!(
        "reading {} as {}",
        path.display(),
        if json { "json" } else { "toml" }
    );
    if json {
        from_json_str(&text)
    } else {
        from_toml_str(&text)
    }
}

/// Renders a value tree as compact JSON.
#[must_use]
pub fn to_json_string(value: &Value) -> String {
    ser::to_json_inline(value)
}

/// Renders a value tree in the TOML inline form.
#[must_use]
pub fn to_toml_string(value: &Value) -> String {
    ser::to_toml_inline(value)
}
