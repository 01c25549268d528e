//! Compact writers.
//!
//! Two single-line renderings of a value tree: [`to_json_inline`] emits
//! strict compact JSON, [`to_toml_inline`] emits the TOML inline form
//! (`{key = value, ...}` tables and bracketed arrays). Both are loss-free
//! for finite data and feed back through the matching parser.
//!
//! Floats are written with the shortest digit string that round-trips; a
//! float without a fractional part gains a trailing `.0` so the type
//! survives a round trip. Non-finite floats are written as `inf`, `-inf`,
//! and `nan`, which only the TOML reader accepts back.
//!
//! The TOML form writes absent data by omission: a table entry holding nil
//! or a table with no renderable entries is skipped entirely. Array
//! elements keep their position, so a nil element renders as `{}`.

use crate::lex::string_escape;
use crate::value::Kind;
use crate::Value;

/// Renders the tree as compact JSON. Nil renders as `null`.
pub fn to_json_inline(value: &Value) -> String {
    let mut out = String::new();
    write_json(value, &mut out);
    out
}

/// Renders the tree in the TOML inline form. Nil renders as `{}`.
pub fn to_toml_inline(value: &Value) -> String {
    let mut out = String::new();
    write_toml(value, &mut out);
    out
}

fn write_json(value: &Value, out: &mut String) {
    match value.kind() {
        Kind::Nil => out.push_str("null"),
        Kind::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Kind::Int(i) => out.push_str(&i.to_string()),
        Kind::Float(f) => write_float(*f, out),
        Kind::Str(s) => write_string(s, out),
        Kind::Arr(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_json(item, out);
            }
            out.push(']');
        }
        Kind::Obj(map) => {
            out.push('{');
            for (i, (key, item)) in map.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_string(key, out);
                out.push(':');
                write_json(item, out);
            }
            out.push('}');
        }
    }
}

fn write_toml(value: &Value, out: &mut String) {
    match value.kind() {
        Kind::Nil => out.push_str("{}"),
        Kind::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Kind::Int(i) => out.push_str(&i.to_string()),
        Kind::Float(f) => write_float(*f, out),
        Kind::Str(s) => write_string(s, out),
        Kind::Arr(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_toml(item, out);
            }
            out.push(']');
        }
        Kind::Obj(map) => {
            out.push('{');
            let mut first = true;
            for (key, item) in map.iter() {
                if skip_toml_entry(item) {
                    continue;
                }
                if !first {
                    out.push_str(", ");
                }
                first = false;
                write_toml_key(key, out);
                out.push_str(" = ");
                write_toml(item, out);
            }
            out.push('}');
        }
    }
}

/// A table entry is skipped when it holds nothing renderable: nil, or a
/// table whose entries are all themselves skipped.
fn skip_toml_entry(value: &Value) -> bool {
    match value.kind() {
        Kind::Nil => true,
        Kind::Obj(map) => map.values().all(skip_toml_entry),
        _ => false,
    }
}

fn write_toml_key(key: &str, out: &mut String) {
    let bare = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if bare {
        out.push_str(key);
    } else {
        write_string(key, out);
    }
}

fn write_string(s: &str, out: &mut String) {
    out.push('"');
    out.push_str(&string_escape(s));
    out.push('"');
}

fn write_float(f: f64, out: &mut String) {
    if f.is_nan() {
        out.push_str("nan");
        return;
    }
    if f.is_infinite() {
        out.push_str(if f < 0.0 { "-inf" } else { "inf" });
        return;
    }
    let text = f.to_string();
    out.push_str(&text);
    if !text.contains(['.', 'e', 'E']) {
        out.push_str(".0");
    }
}
