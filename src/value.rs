//! Dynamic value tree.
//!
//! This module provides [`Value`], a hierarchical, dynamically-typed tree
//! over the closed variant set nil/bool/int/float/string/array/object.
//! Objects preserve insertion order; arrays are index-addressable with
//! negative indices counted from the end.
//!
//! Every node additionally carries a materialization state separate from its
//! variant: never touched, auto-created by path navigation, or explicitly
//! assigned. The state feeds the safe-defaulting operators
//! ([`Value::or_get`], [`Value::or_set`]) and the [`Value::is_set`] /
//! [`Value::is_deep_set`] queries.
//!
//! ## Usage
//!
//! ```rust
//! use confval::{value, Value, NIL};
//!
//! let mut c = Value::new();
//! c["server.port"] = Value::from(8080);
//! c["server.hosts"] = value!(["a", "b"]);
//!
//! assert_eq!(c["server.port"], 8080);
//! assert_eq!(c["server.hosts[-1]"], "b");
//! assert_eq!(c["server.missing"], NIL);
//! ```

use std::fmt;
use std::ops::{Index, IndexMut};

use crate::map::Map;
use crate::path::{self, Segment};
use crate::{ser, Error, Result};

/// The variant actually held by a [`Value`].
#[derive(Debug, Clone, Default)]
pub enum Kind {
    #[default]
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Arr(Vec<Value>),
    Obj(Map),
}

/// How a node came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum State {
    /// Pristine, never touched. Semantically equal to nil.
    #[default]
    Unset,
    /// Created as a side effect of navigating through it.
    Touched,
    /// Explicitly assigned.
    Valued,
}

/// A node of the value tree.
///
/// Children are exclusively owned by their parent container; the tree is a
/// strict hierarchy with no sharing. A default-constructed `Value` is the
/// untouched nil node.
#[derive(Debug, Clone, Default)]
pub struct Value {
    kind: Kind,
    state: State,
}

/// The canonical "absent" value. Read-only path misses resolve to it, and
/// unset or explicit-null nodes compare equal to it.
pub static NIL: Value = Value {
    kind: Kind::Nil,
    state: State::Unset,
};

impl Value {
    /// Creates an untouched nil value.
    #[must_use]
    pub fn new() -> Self {
        Value::default()
    }

    /// The active variant.
    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    /// True for any node that was navigated through or assigned to.
    pub fn is_set(&self) -> bool {
        self.state != State::Unset
    }

    /// True only when every reachable leaf was explicitly assigned.
    pub fn is_deep_set(&self) -> bool {
        match &self.kind {
            Kind::Arr(items) => self.is_set() && items.iter().all(Value::is_deep_set),
            Kind::Obj(map) => self.is_set() && map.values().all(Value::is_deep_set),
            _ => self.state == State::Valued,
        }
    }

    /// Resets the node to the untouched nil state, discarding any structure.
    pub fn unset(&mut self) {
        *self = Value::default();
    }

    pub fn is_nil(&self) -> bool {
        matches!(self.kind, Kind::Nil)
    }

    pub fn is_bool(&self) -> bool {
        matches!(self.kind, Kind::Bool(_))
    }

    pub fn is_int(&self) -> bool {
        matches!(self.kind, Kind::Int(_))
    }

    pub fn is_float(&self) -> bool {
        matches!(self.kind, Kind::Float(_))
    }

    pub fn is_str(&self) -> bool {
        matches!(self.kind, Kind::Str(_))
    }

    pub fn is_arr(&self) -> bool {
        matches!(self.kind, Kind::Arr(_))
    }

    pub fn is_obj(&self) -> bool {
        matches!(self.kind, Kind::Obj(_))
    }

    /// Name of the active variant, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self.kind {
            Kind::Nil => "nil",
            Kind::Bool(_) => "bool",
            Kind::Int(_) => "integer",
            Kind::Float(_) => "float",
            Kind::Str(_) => "string",
            Kind::Arr(_) => "array",
            Kind::Obj(_) => "object",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.kind {
            Kind::Bool(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self.kind {
            Kind::Int(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self.kind {
            Kind::Float(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.kind {
            Kind::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_arr(&self) -> Option<&[Value]> {
        match &self.kind {
            Kind::Arr(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_obj(&self) -> Option<&Map> {
        match &self.kind {
            Kind::Obj(m) => Some(m),
            _ => None,
        }
    }

    /// Typed accessor, failing with [`Error::TypeMismatch`] when the active
    /// variant differs.
    pub fn get_bool(&self) -> Result<bool> {
        self.as_bool()
            .ok_or_else(|| Error::type_mismatch("bool", self.type_name()))
    }

    pub fn get_int(&self) -> Result<i64> {
        self.as_i64()
            .ok_or_else(|| Error::type_mismatch("integer", self.type_name()))
    }

    pub fn get_float(&self) -> Result<f64> {
        self.as_f64()
            .ok_or_else(|| Error::type_mismatch("float", self.type_name()))
    }

    pub fn get_str(&self) -> Result<&str> {
        self.as_str()
            .ok_or_else(|| Error::type_mismatch("string", self.type_name()))
    }

    pub fn get_arr(&self) -> Result<&[Value]> {
        self.as_arr()
            .ok_or_else(|| Error::type_mismatch("array", self.type_name()))
    }

    pub fn get_obj(&self) -> Result<&Map> {
        self.as_obj()
            .ok_or_else(|| Error::type_mismatch("object", self.type_name()))
    }

    /// Numeric view across the integer and float variants; `0.0` otherwise.
    pub fn num(&self) -> f64 {
        self.num_or(0.0)
    }

    /// Numeric view, returning `default` without mutating when the node is
    /// not numeric.
    pub fn num_or(&self, default: f64) -> f64 {
        match self.kind {
            Kind::Int(i) => i as f64,
            Kind::Float(f) => f,
            _ => default,
        }
    }

    /// String view, empty when the node is not a string.
    pub fn str(&self) -> &str {
        self.as_str().unwrap_or("")
    }

    /// Mutable array view, coercing the node to an empty array first when it
    /// holds anything else.
    pub fn arr(&mut self) -> &mut Vec<Value> {
        if !self.is_arr() {
            self.kind = Kind::Arr(Vec::new());
            self.state = State::Touched;
        }
        match &mut self.kind {
            Kind::Arr(a) => a,
            _ => unreachable!(),
        }
    }

    /// Mutable object view, coercing the node to an empty object first when
    /// it holds anything else.
    pub fn obj(&mut self) -> &mut Map {
        if !self.is_obj() {
            self.kind = Kind::Obj(Map::new());
            self.state = State::Touched;
        }
        match &mut self.kind {
            Kind::Obj(m) => m,
            _ => unreachable!(),
        }
    }

    /// Container length; `0` for scalars.
    pub fn len(&self) -> usize {
        match &self.kind {
            Kind::Arr(a) => a.len(),
            Kind::Obj(m) => m.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replaces the node wholesale, discarding prior structure and state.
    pub fn set<T: Into<Value>>(&mut self, value: T) -> &mut Value {
        *self = value.into();
        self
    }

    /// Returns a clone of the current value if set, else `default`. Never
    /// mutates.
    pub fn or_get<T: Into<Value>>(&self, default: T) -> Value {
        if self.is_set() {
            self.clone()
        } else {
            default.into()
        }
    }

    /// Adopts `default` where the node (or, recursively, a part of a
    /// container default) is not yet set; already-set parts are preserved.
    /// Returns the node for chaining or inspection.
    pub fn or_set<T: Into<Value>>(&mut self, default: T) -> &mut Value {
        self.merge(default.into());
        self
    }

    /// Recursively fills unset parts of the tree from `default`; see
    /// [`Value::or_set`].
    pub fn merge_default(&mut self, default: &Value) {
        self.merge(default.clone());
    }

    /// Ensures the node is an array of at least `count` elements, applying
    /// `default` to each of the first `count` slots with the merge-default
    /// rule. An existing longer array is never shrunk.
    pub fn or_set_n<T: Into<Value>>(&mut self, count: usize, default: T) -> &mut Value {
        let default: Value = default.into();
        if self.is_set() && !self.is_arr() {
            return self;
        }
        if !self.is_arr() {
            self.kind = Kind::Arr(Vec::new());
            self.state = State::Valued;
        }
        if let Kind::Arr(arr) = &mut self.kind {
            if arr.len() < count {
                arr.resize_with(count, Value::default);
            }
            for slot in arr.iter_mut().take(count) {
                slot.merge(default.clone());
            }
        }
        self
    }

    fn merge(&mut self, default: Value) {
        if default.state == State::Unset {
            return;
        }
        match default.kind {
            Kind::Obj(dmap) => {
                if self.is_set() && !self.is_obj() {
                    return;
                }
                if !self.is_obj() {
                    self.kind = Kind::Obj(Map::new());
                    self.state = State::Valued;
                }
                if let Kind::Obj(map) = &mut self.kind {
                    for (key, dval) in dmap {
                        map.entry_or_nil(&key).merge(dval);
                    }
                }
            }
            Kind::Arr(darr) => {
                if self.is_set() && !self.is_arr() {
                    return;
                }
                if !self.is_arr() {
                    self.kind = Kind::Arr(Vec::new());
                    self.state = State::Valued;
                }
                if let Kind::Arr(arr) = &mut self.kind {
                    for (i, dval) in darr.into_iter().enumerate() {
                        if i >= arr.len() {
                            arr.push(Value::default());
                        }
                        arr[i].merge(dval);
                    }
                }
            }
            kind => {
                if !self.is_set() {
                    self.kind = kind;
                    self.state = State::Valued;
                }
            }
        }
    }

    /// Read-only path lookup; a missing segment yields [`NIL`] without
    /// touching the tree.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Parse`] on a malformed path expression.
    pub fn try_find(&self, path: &str) -> Result<&Value> {
        let segments = path::parse(path)?;
        let mut node = self;
        for segment in &segments {
            match node.seg_ref(segment) {
                Some(child) => node = child,
                None => return Ok(&NIL),
            }
        }
        Ok(node)
    }

    /// Read-only path lookup.
    ///
    /// # Panics
    ///
    /// Panics on a malformed path expression; use [`Value::try_find`] to
    /// handle path syntax errors.
    pub fn find(&self, path: &str) -> &Value {
        match self.try_find(path) {
            Ok(node) => node,
            Err(e) => panic!("invalid path {path:?}: {e}"),
        }
    }

    /// Mutable path lookup, creating missing structure along the way
    /// (auto-vivification). Created intermediates are marked as touched, not
    /// valued.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Parse`] on a malformed path expression, or with
    /// [`Error::IndexOutOfRange`] when a negative index reaches before the
    /// start of an array.
    pub fn try_at(&mut self, path: &str) -> Result<&mut Value> {
        let segments = path::parse(path)?;
        let mut node = self;
        for segment in &segments {
            node = node.seg_mut(segment)?;
        }
        Ok(node)
    }

    /// Mutable path lookup with auto-vivification.
    ///
    /// # Panics
    ///
    /// Panics on a malformed path expression or an underflowing negative
    /// index; use [`Value::try_at`] to handle those as errors.
    pub fn at(&mut self, path: &str) -> &mut Value {
        match self.try_at(path) {
            Ok(node) => node,
            Err(e) => panic!("invalid path {path:?}: {e}"),
        }
    }

    /// Renders the tree as compact JSON.
    pub fn to_json_inline(&self) -> String {
        ser::to_json_inline(self)
    }

    /// Renders the tree in the TOML inline form.
    pub fn to_toml_inline(&self) -> String {
        ser::to_toml_inline(self)
    }

    /// An explicitly-assigned null, as produced by parsing a JSON `null`.
    /// Equal to the nil sentinel, but set, so defaulting will not refill it.
    pub(crate) fn valued_nil() -> Value {
        Value {
            kind: Kind::Nil,
            state: State::Valued,
        }
    }

    pub(crate) fn seg_ref(&self, segment: &Segment) -> Option<&Value> {
        match (segment, &self.kind) {
            (Segment::Key(key), Kind::Obj(map)) => map.get(key),
            (Segment::Index(i), Kind::Arr(arr)) => {
                let idx = if *i < 0 { arr.len() as i64 + i } else { *i };
                if idx < 0 {
                    None
                } else {
                    arr.get(idx as usize)
                }
            }
            _ => None,
        }
    }

    pub(crate) fn seg_mut(&mut self, segment: &Segment) -> Result<&mut Value> {
        match segment {
            Segment::Key(key) => {
                if !self.is_obj() {
                    self.kind = Kind::Obj(Map::new());
                    self.state = State::Touched;
                } else if self.state == State::Unset {
                    self.state = State::Touched;
                }
                match &mut self.kind {
                    Kind::Obj(map) => Ok(map.entry_or_nil(key)),
                    _ => unreachable!(),
                }
            }
            Segment::Index(i) => {
                if !self.is_arr() {
                    self.kind = Kind::Arr(Vec::new());
                    self.state = State::Touched;
                } else if self.state == State::Unset {
                    self.state = State::Touched;
                }
                match &mut self.kind {
                    Kind::Arr(arr) => {
                        let idx = if *i < 0 { arr.len() as i64 + i } else { *i };
                        if idx < 0 {
                            return Err(Error::index_out_of_range(*i, arr.len()));
                        }
                        let idx = idx as usize;
                        if idx >= arr.len() {
                            arr.resize_with(idx + 1, Value::default);
                        }
                        Ok(&mut arr[idx])
                    }
                    _ => unreachable!(),
                }
            }
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (&self.kind, &other.kind) {
            (Kind::Nil, Kind::Nil) => true,
            (Kind::Bool(a), Kind::Bool(b)) => a == b,
            (Kind::Int(a), Kind::Int(b)) => a == b,
            (Kind::Float(a), Kind::Float(b)) => a == b,
            (Kind::Int(a), Kind::Float(b)) | (Kind::Float(b), Kind::Int(a)) => *a as f64 == *b,
            (Kind::Str(a), Kind::Str(b)) => a == b,
            (Kind::Arr(a), Kind::Arr(b)) => a == b,
            (Kind::Obj(a), Kind::Obj(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&ser::to_json_inline(self))
    }
}

impl Index<&str> for Value {
    type Output = Value;

    fn index(&self, path: &str) -> &Value {
        self.find(path)
    }
}

impl IndexMut<&str> for Value {
    fn index_mut(&mut self, path: &str) -> &mut Value {
        self.at(path)
    }
}

impl Index<i64> for Value {
    type Output = Value;

    fn index(&self, index: i64) -> &Value {
        self.seg_ref(&Segment::Index(index)).unwrap_or(&NIL)
    }
}

impl IndexMut<i64> for Value {
    /// # Panics
    ///
    /// Panics when a negative index reaches before the start of the array.
    fn index_mut(&mut self, index: i64) -> &mut Value {
        match self.seg_mut(&Segment::Index(index)) {
            Ok(node) => node,
            Err(e) => panic!("{e}"),
        }
    }
}

// Scalar comparison sugar with the numeric cross-equality rules: integers
// and floats compare by value across the two kinds, strings never compare
// equal to numbers.

impl PartialEq<bool> for Value {
    fn eq(&self, other: &bool) -> bool {
        self.as_bool() == Some(*other)
    }
}

impl PartialEq<i64> for Value {
    fn eq(&self, other: &i64) -> bool {
        match self.kind {
            Kind::Int(i) => i == *other,
            Kind::Float(f) => f == *other as f64,
            _ => false,
        }
    }
}

impl PartialEq<i32> for Value {
    fn eq(&self, other: &i32) -> bool {
        *self == i64::from(*other)
    }
}

impl PartialEq<f64> for Value {
    fn eq(&self, other: &f64) -> bool {
        match self.kind {
            Kind::Int(i) => i as f64 == *other,
            Kind::Float(f) => f == *other,
            _ => false,
        }
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

impl PartialEq<String> for Value {
    fn eq(&self, other: &String) -> bool {
        self.as_str() == Some(other.as_str())
    }
}

macro_rules! from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value { kind: Kind::Int(v as i64), state: State::Valued }
                }
            }
        )*
    };
}

from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<()> for Value {
    /// An explicit null, distinct from the untouched default.
    fn from((): ()) -> Self {
        Value::valued_nil()
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value {
            kind: Kind::Bool(v),
            state: State::Valued,
        }
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::from(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value {
            kind: Kind::Float(v),
            state: State::Valued,
        }
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value {
            kind: Kind::Str(v),
            state: State::Valued,
        }
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::from(v.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value {
            kind: Kind::Arr(v),
            state: State::Valued,
        }
    }
}

impl From<Map> for Value {
    fn from(v: Map) -> Self {
        Value {
            kind: Kind::Obj(v),
            state: State::Valued,
        }
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<T: IntoIterator<Item = Value>>(iter: T) -> Self {
        Value::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl FromIterator<(String, Value)> for Value {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Value::from(iter.into_iter().collect::<Map>())
    }
}

// Typed extraction in the TryFrom idiom. Scalars are strict; numeric vectors
// coerce element-wise through `num`, truncating toward zero for integers.

impl TryFrom<&Value> for i64 {
    type Error = Error;

    fn try_from(v: &Value) -> Result<i64> {
        v.get_int()
    }
}

impl TryFrom<&Value> for f64 {
    type Error = Error;

    fn try_from(v: &Value) -> Result<f64> {
        match v.kind {
            Kind::Int(i) => Ok(i as f64),
            Kind::Float(f) => Ok(f),
            _ => Err(Error::type_mismatch("number", v.type_name())),
        }
    }
}

impl TryFrom<&Value> for bool {
    type Error = Error;

    fn try_from(v: &Value) -> Result<bool> {
        v.get_bool()
    }
}

impl TryFrom<&Value> for String {
    type Error = Error;

    fn try_from(v: &Value) -> Result<String> {
        v.get_str().map(str::to_string)
    }
}

fn numeric_elements(v: &Value) -> Result<Vec<f64>> {
    match &v.kind {
        Kind::Nil => Ok(Vec::new()),
        Kind::Arr(items) => items
            .iter()
            .map(|e| match e.kind {
                Kind::Int(i) => Ok(i as f64),
                Kind::Float(f) => Ok(f),
                _ => Err(Error::type_mismatch("number", e.type_name())),
            })
            .collect(),
        _ => Err(Error::type_mismatch("array", v.type_name())),
    }
}

impl TryFrom<&Value> for Vec<f64> {
    type Error = Error;

    fn try_from(v: &Value) -> Result<Vec<f64>> {
        numeric_elements(v)
    }
}

impl TryFrom<&Value> for Vec<i64> {
    type Error = Error;

    fn try_from(v: &Value) -> Result<Vec<i64>> {
        Ok(numeric_elements(v)?.into_iter().map(|f| f as i64).collect())
    }
}

impl TryFrom<&Value> for Vec<String> {
    type Error = Error;

    fn try_from(v: &Value) -> Result<Vec<String>> {
        match &v.kind {
            Kind::Nil => Ok(Vec::new()),
            Kind::Arr(items) => items
                .iter()
                .map(|e| e.get_str().map(str::to_string))
                .collect(),
            _ => Err(Error::type_mismatch("array", v.type_name())),
        }
    }
}
