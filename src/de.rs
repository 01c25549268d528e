//! JSON and TOML parsing.
//!
//! Both parsers are single-pass recursive descent over a [`Cursor`] and
//! share one string grammar (basic/literal, single- and triple-quoted) and
//! one number grammar (decimal, `0x`/`0o`/`0b` radices, `_` grouping,
//! `inf`/`nan` spellings, 64-bit boundary handling with fallback to float).
//!
//! On success a parser leaves the cursor exactly past the parsed value, so a
//! value embedded inside surrounding content can be picked out and the
//! remainder read by the caller through [`Parser::rest`]. On failure the
//! parse is abandoned without resynchronization and the partial state of any
//! target tree is unspecified.
//!
//! ## Usage
//!
//! ```rust
//! use confval::de::Parser;
//!
//! let mut parser = Parser::new("0xDEADBEEF tail");
//! let value = parser.parse_toml_inline().unwrap();
//! assert_eq!(value, 3735928559i64);
//! assert_eq!(parser.rest(), " tail");
//! ```

use log::trace;

use crate::lex::{stream_trim, unescape_escapes, Cursor};
use crate::path;
use crate::{Error, Map, Result, Value};

/// Recursive-descent parser over a borrowed input.
pub struct Parser<'de> {
    cur: Cursor<'de>,
}

impl<'de> Parser<'de> {
    pub fn new(input: &'de str) -> Self {
        Parser {
            cur: Cursor::new(input),
        }
    }

    /// The unconsumed remainder of the input.
    pub fn rest(&self) -> &'de str {
        self.cur.rest()
    }

    /// Parses a single JSON value, leaving the cursor just past it.
    pub fn parse_json(&mut self) -> Result<Value> {
        self.cur.skip_ws();
        match self.cur.peek() {
            None => Err(self.cur.error("unexpected end of input")),
            Some('{') => self.json_object(),
            Some('[') => self.json_array(),
            Some('"') | Some('\'') => Ok(Value::from(self.parse_string()?)),
            Some(_) => self.scalar(true),
        }
    }

    /// Parses a single inline TOML value, leaving the cursor just past it.
    pub fn parse_toml_inline(&mut self) -> Result<Value> {
        self.cur.skip_ws();
        match self.cur.peek() {
            None => Err(self.cur.error("unexpected end of input")),
            Some('{') => self.toml_inline_table(),
            Some('[') => self.toml_inline_array(),
            Some('"') | Some('\'') => Ok(Value::from(self.parse_string()?)),
            Some(_) => self.scalar(false),
        }
    }

    /// Parses a full TOML document into `root`, merging with whatever the
    /// tree already holds; assignments replace existing nodes wholesale.
    ///
    /// The document form recognizes `#` comments, `key = value` lines with
    /// dotted and quoted keys, `[table]` headers, and `[[array-of-tables]]`
    /// headers. A header or value followed by trailing non-whitespace
    /// content on the same line is a syntax error.
    pub fn parse_toml_document(&mut self, root: &mut Value) -> Result<()> {
        // Path of the table that subsequent assignments land in.
        let mut table: Vec<path::Segment> = Vec::new();
        loop {
            stream_trim(&mut self.cur, "#");
            if self.cur.at_end() {
                return Ok(());
            }
            if self.cur.eat('[') {
                let array_of_tables = self.cur.eat('[');
                let name = self.raw_segment(&[']', '\n'])?;
                if !self.cur.eat(']') || (array_of_tables && !self.cur.eat(']')) {
                    return Err(self.cur.error("malformed table header"));
                }
                self.end_of_line()?;
                let segments = path::parse(&name)?;
                if segments.is_empty() {
                    return Err(self.cur.error("empty table header"));
                }
                trace!(
                    "toml header {:?} (array_of_tables: {array_of_tables})",
                    name
                );
                let mut node = &mut *root;
                for segment in &segments {
                    node = node.seg_mut(segment)?;
                }
                table = segments;
                if array_of_tables {
                    let arr = node.arr();
                    arr.push(Value::default());
                    let last = arr.len() - 1;
                    arr[last].obj();
                    table.push(path::Segment::Index(last as i64));
                } else {
                    node.obj();
                }
            } else {
                let raw = self.raw_segment(&['=', '\n'])?;
                let key = raw.trim();
                if key.is_empty() {
                    return Err(self.cur.error("expected key"));
                }
                if !self.cur.eat('=') {
                    return Err(self.cur.error(format!("expected '=' after key {key:?}")));
                }
                self.cur.skip_spaces();
                let value = self.parse_toml_inline()?;
                self.end_of_line()?;
                let mut node = &mut *root;
                for segment in &table {
                    node = node.seg_mut(segment)?;
                }
                *node.try_at(key)? = value;
            }
        }
    }

    /// Captures raw key or header text up to (not including) an unquoted
    /// stop character at bracket depth zero. Quoting is preserved so the
    /// path tokenizer still sees it, keeping dots inside quoted keys
    /// protected.
    fn raw_segment(&mut self, stops: &[char]) -> Result<String> {
        let mut out = String::new();
        let mut quote: Option<char> = None;
        let mut prev_backslash = false;
        let mut depth = 0usize;
        while let Some(c) = self.cur.peek() {
            match quote {
                Some(q) => {
                    if c == q && !prev_backslash {
                        quote = None;
                    }
                    prev_backslash = c == '\\' && !prev_backslash;
                }
                None => match c {
                    c if depth == 0 && stops.contains(&c) => return Ok(out),
                    '"' | '\'' => quote = Some(c),
                    '[' => depth += 1,
                    ']' => depth = depth.saturating_sub(1),
                    _ => {}
                },
            }
            self.cur.next();
            out.push(c);
        }
        if quote.is_some() {
            return Err(self.cur.error("unterminated quote in key"));
        }
        Ok(out)
    }

    /// Requires the rest of the current line to be whitespace or a comment,
    /// consuming through the line terminator.
    fn end_of_line(&mut self) -> Result<()> {
        self.cur.skip_spaces();
        if self.cur.starts_with("#") {
            self.cur.skip_while(|c| c != '\n');
        }
        match self.cur.peek() {
            None => Ok(()),
            Some('\n') => {
                self.cur.next();
                Ok(())
            }
            Some('\r') if self.cur.starts_with("\r\n") => {
                self.cur.next();
                self.cur.next();
                Ok(())
            }
            Some(c) => Err(self.cur.error(format!("unexpected {c:?} after value"))),
        }
    }

    /// Requires only insignificant content (whitespace, and comments when
    /// `comments` is set) up to the end of the input.
    pub(crate) fn expect_end(&mut self, comments: bool) -> Result<()> {
        stream_trim(&mut self.cur, if comments { "#" } else { "" });
        match self.cur.peek() {
            None => Ok(()),
            Some(c) => Err(self.cur.error(format!("trailing {c:?} after value"))),
        }
    }

    fn json_object(&mut self) -> Result<Value> {
        self.cur.next();
        let mut map = Map::new();
        self.cur.skip_ws();
        if self.cur.eat('}') {
            return Ok(Value::from(map));
        }
        loop {
            self.cur.skip_ws();
            if !matches!(self.cur.peek(), Some('"') | Some('\'')) {
                return Err(self.cur.error("expected string key"));
            }
            let key = self.parse_string()?;
            self.cur.skip_ws();
            if !self.cur.eat(':') {
                return Err(self.cur.error("expected ':' after key"));
            }
            let value = self.parse_json()?;
            map.insert(key, value);
            self.cur.skip_ws();
            if self.cur.eat(',') {
                continue;
            }
            if self.cur.eat('}') {
                return Ok(Value::from(map));
            }
            return Err(self.cur.error("expected ',' or '}' in object"));
        }
    }

    fn json_array(&mut self) -> Result<Value> {
        self.cur.next();
        let mut items = Vec::new();
        self.cur.skip_ws();
        if self.cur.eat(']') {
            return Ok(Value::from(items));
        }
        loop {
            items.push(self.parse_json()?);
            self.cur.skip_ws();
            if self.cur.eat(',') {
                continue;
            }
            if self.cur.eat(']') {
                return Ok(Value::from(items));
            }
            return Err(self.cur.error("expected ',' or ']' in array"));
        }
    }

    /// Inline tables are single-line and require comma-separated pairs.
    fn toml_inline_table(&mut self) -> Result<Value> {
        self.cur.next();
        let mut table = Value::from(Map::new());
        self.cur.skip_spaces();
        if self.cur.eat('}') {
            return Ok(table);
        }
        loop {
            self.cur.skip_spaces();
            if matches!(self.cur.peek(), Some('\n') | Some('\r')) {
                return Err(self.cur.error("newline in inline table"));
            }
            let raw = self.raw_segment(&['=', ',', '}', '\n'])?;
            let key = raw.trim();
            if key.is_empty() {
                return Err(self.cur.error("expected key in inline table"));
            }
            if !self.cur.eat('=') {
                return Err(self.cur.error(format!("expected '=' after key {key:?}")));
            }
            self.cur.skip_spaces();
            let value = self.parse_toml_inline()?;
            *table.try_at(key)? = value;
            self.cur.skip_spaces();
            if self.cur.eat(',') {
                continue;
            }
            if self.cur.eat('}') {
                return Ok(table);
            }
            return Err(self.cur.error("expected ',' or '}' in inline table"));
        }
    }

    /// Inline arrays are single-line; elements may be separated by commas or
    /// by whitespace alone.
    fn toml_inline_array(&mut self) -> Result<Value> {
        self.cur.next();
        let mut items = Vec::new();
        loop {
            self.cur.skip_spaces();
            match self.cur.peek() {
                None => return Err(self.cur.error("unterminated array")),
                Some('\n') | Some('\r') => {
                    return Err(self.cur.error("newline in inline array"))
                }
                Some(']') => {
                    self.cur.next();
                    return Ok(Value::from(items));
                }
                Some(',') => {
                    self.cur.next();
                }
                Some(_) => items.push(self.parse_toml_inline()?),
            }
        }
    }

    /// Shared string grammar. Basic (double-quoted) strings interpret
    /// backslash escapes; literal (single-quoted) strings do not.
    /// Triple-quoted variants allow embedded newlines, strip a newline
    /// immediately after the opening delimiter, and (for basic strings
    /// only) fold a backslash at end-of-line together with the following
    /// leading whitespace.
    fn parse_string(&mut self) -> Result<String> {
        let quote = match self.cur.peek() {
            Some(q @ ('"' | '\'')) => q,
            _ => return Err(self.cur.error("expected string")),
        };
        let basic = quote == '"';
        let triple = if basic { "\"\"\"" } else { "'''" };
        if self.cur.eat_str(triple) {
            return self.triple_quoted(quote, basic);
        }
        self.cur.next();
        let mut raw = String::new();
        let mut prev_backslash = false;
        loop {
            match self.cur.next() {
                None => return Err(self.cur.error("unterminated string")),
                Some('\n') => return Err(self.cur.error("unterminated string")),
                Some(c) if c == quote && !(basic && prev_backslash) => break,
                Some(c) => {
                    // toggles so "\\" does not hide the closing quote
                    prev_backslash = c == '\\' && !prev_backslash;
                    raw.push(c);
                }
            }
        }
        Ok(if basic { unescape_escapes(&raw) } else { raw })
    }

    fn triple_quoted(&mut self, quote: char, basic: bool) -> Result<String> {
        if !self.cur.eat_str("\r\n") {
            self.cur.eat('\n');
        }
        let mut raw = String::new();
        loop {
            match self.cur.peek() {
                None => return Err(self.cur.error("unterminated triple-quoted string")),
                Some('\\') if basic => {
                    self.cur.next();
                    match self.cur.peek() {
                        Some('\n') => {
                            self.cur.next();
                            self.cur.skip_ws();
                        }
                        Some('\r') if self.cur.starts_with("\r\n") => {
                            self.cur.next();
                            self.cur.next();
                            self.cur.skip_ws();
                        }
                        Some(c) => {
                            self.cur.next();
                            raw.push('\\');
                            raw.push(c);
                        }
                        None => {
                            return Err(self.cur.error("unterminated triple-quoted string"))
                        }
                    }
                }
                Some(c) if c == quote => {
                    let mut run = 0usize;
                    while self.cur.eat(quote) {
                        run += 1;
                    }
                    if run >= 3 {
                        for _ in 0..run - 3 {
                            raw.push(quote);
                        }
                        break;
                    }
                    for _ in 0..run {
                        raw.push(quote);
                    }
                }
                Some(c) => {
                    self.cur.next();
                    raw.push(c);
                }
            }
        }
        Ok(if basic { unescape_escapes(&raw) } else { raw })
    }

    /// Reads and classifies a bare scalar token: booleans, `null` (JSON
    /// only), or a number.
    fn scalar(&mut self, allow_null: bool) -> Result<Value> {
        let mut token = String::new();
        while let Some(c) = self.cur.peek() {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '+' | '-' | '.') {
                self.cur.next();
                token.push(c);
            } else {
                break;
            }
        }
        if token.is_empty() {
            return Err(self.cur.error("expected a value"));
        }
        match token.as_str() {
            "true" => Ok(Value::from(true)),
            "false" => Ok(Value::from(false)),
            "null" if allow_null => Ok(Value::valued_nil()),
            _ => self.number(&token),
        }
    }

    fn number(&mut self, token: &str) -> Result<Value> {
        let (negative, body) = match token.strip_prefix('-') {
            Some(body) => (true, body),
            None => (false, token.strip_prefix('+').unwrap_or(token)),
        };
        match body {
            "inf" => {
                let v = if negative {
                    f64::NEG_INFINITY
                } else {
                    f64::INFINITY
                };
                return Ok(Value::from(v));
            }
            "nan" => {
                let v = if negative { -f64::NAN } else { f64::NAN };
                return Ok(Value::from(v));
            }
            _ => {}
        }
        for (prefix, radix) in [("0x", 16), ("0o", 8), ("0b", 2)] {
            if let Some(digits) = body.strip_prefix(prefix) {
                return self.radix_int(token, digits, radix, negative);
            }
        }
        self.decimal(token)
    }

    fn radix_int(&mut self, token: &str, digits: &str, radix: u32, negative: bool) -> Result<Value> {
        if digits.is_empty() || !underscores_grouped(digits, |c| c.is_digit(radix)) {
            return Err(self.cur.error(format!("invalid integer literal {token:?}")));
        }
        let clean = digits.replace('_', "");
        let magnitude = u64::from_str_radix(&clean, radix)
            .map_err(|_| self.cur.error(format!("integer literal {token:?} out of range")))?;
        let value = if negative {
            if magnitude > 1u64 << 63 {
                return Err(self.cur.error(format!("integer literal {token:?} out of range")));
            }
            magnitude.wrapping_neg() as i64
        } else {
            i64::try_from(magnitude)
                .map_err(|_| self.cur.error(format!("integer literal {token:?} out of range")))?
        };
        Ok(Value::from(value))
    }

    fn decimal(&mut self, token: &str) -> Result<Value> {
        if !underscores_grouped(token, |c| c.is_ascii_digit()) {
            return Err(self.cur.error(format!("invalid number literal {token:?}")));
        }
        let clean = token.replace('_', "");
        let is_float_form = clean.contains(['.', 'e', 'E']);
        if !is_float_form {
            match clean.parse::<i64>() {
                Ok(i) => return Ok(Value::from(i)),
                // Wider than 64 bits: IEEE-754 round-to-nearest double.
                Err(_) if clean.chars().all(|c| c.is_ascii_digit() || c == '+' || c == '-') => {
                    return clean
                        .parse::<f64>()
                        .map(Value::from)
                        .map_err(|_| self.cur.error(format!("invalid number literal {token:?}")));
                }
                Err(_) => {
                    return Err(self.cur.error(format!("invalid number literal {token:?}")))
                }
            }
        }
        if !clean
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
        {
            return Err(self.cur.error(format!("invalid number literal {token:?}")));
        }
        clean
            .parse::<f64>()
            .map(Value::from)
            .map_err(|_| self.cur.error(format!("invalid number literal {token:?}")))
    }
}

/// Checks that every `_` in a numeric token sits between two digits.
fn underscores_grouped<F: Fn(char) -> bool>(token: &str, is_digit: F) -> bool {
    let chars: Vec<char> = token.chars().collect();
    chars.iter().enumerate().all(|(i, &c)| {
        c != '_'
            || (i > 0
                && is_digit(chars[i - 1])
                && chars.get(i + 1).is_some_and(|&n| is_digit(n)))
    })
}

impl Value {
    /// Parses TOML document text into the tree, merging with the current
    /// contents; assignments replace existing nodes wholesale.
    ///
    /// ```rust
    /// use confval::Value;
    ///
    /// let mut c = Value::new();
    /// c["a"] = Value::from(13);
    /// c.read_string("a = 15").unwrap();
    /// c.read_string("b = 'B'").unwrap();
    /// assert_eq!(c["a"], 15);
    /// assert_eq!(c["b"].str(), "B");
    /// ```
    pub fn read_string(&mut self, input: &str) -> Result<()> {
        let mut parser = Parser::new(input);
        parser.parse_toml_document(self)
    }
}
