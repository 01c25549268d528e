//! Lexical primitives shared by the path engine and the format parsers.
//!
//! Everything here operates on a [`Cursor`], a single-pass view over a string
//! with one-character peek. The primitives are deliberately small: quoted
//! token reading, word assembly, whitespace/comment skipping, splitting, and
//! escape/unescape with `$(name)`/`${NAME}` variable expansion.
//!
//! ## Examples
//!
//! ```rust
//! use confval::lex::{string_split, string_unescape};
//!
//! assert_eq!(string_split("ab cd  ef\tgh"), vec!["ab", "cd", "ef", "gh"]);
//! assert_eq!(string_unescape("a\\tb"), "a\tb");
//! ```

use std::collections::HashMap;

use crate::{Error, Result};

/// A single-pass reading position over a string slice.
///
/// Parsing is O(input length) with no lookahead beyond [`Cursor::peek`] and
/// the fixed-width [`Cursor::starts_with`]. Line/column information is
/// computed on demand for diagnostics only.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(input: &'a str) -> Self {
        Cursor { input, pos: 0 }
    }

    /// Returns the next character without consuming it.
    pub fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    /// Consumes and returns the next character.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    /// Consumes the next character if it equals `ch`.
    pub fn eat(&mut self, ch: char) -> bool {
        if self.peek() == Some(ch) {
            self.pos += ch.len_utf8();
            true
        } else {
            false
        }
    }

    /// Consumes `prefix` if the remaining input starts with it.
    pub fn eat_str(&mut self, prefix: &str) -> bool {
        if self.starts_with(prefix) {
            self.pos += prefix.len();
            true
        } else {
            false
        }
    }

    /// Checks whether the remaining input starts with `prefix`.
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.input[self.pos..].starts_with(prefix)
    }

    /// Returns the unconsumed remainder of the input.
    pub fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    /// Byte offset of the reading position.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Whether the whole input has been consumed.
    pub fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Skips characters while `pred` holds.
    pub fn skip_while<F: Fn(char) -> bool>(&mut self, pred: F) {
        while let Some(ch) = self.peek() {
            if !pred(ch) {
                break;
            }
            self.pos += ch.len_utf8();
        }
    }

    /// Skips spaces and tabs, staying on the current line.
    pub fn skip_spaces(&mut self) {
        self.skip_while(|c| c == ' ' || c == '\t');
    }

    /// Skips any whitespace, including newlines.
    pub fn skip_ws(&mut self) {
        self.skip_while(char::is_whitespace);
    }

    /// 1-based line and column of the reading position.
    pub fn location(&self) -> (usize, usize) {
        let consumed = &self.input[..self.pos];
        let line = consumed.matches('\n').count() + 1;
        let start = consumed.rfind('\n').map_or(0, |i| i + 1);
        let col = consumed[start..].chars().count() + 1;
        (line, col)
    }

    /// A parse error anchored at the current position.
    pub fn error<T: std::fmt::Display>(&self, msg: T) -> Error {
        let (line, col) = self.location();
        Error::parse(line, col, msg)
    }
}

/// Skips whitespace and `comment_prefix`-to-end-of-line runs until a
/// significant character is found or the input is exhausted.
///
/// The cursor is left on the first significant character, or at the end of
/// the input when nothing but whitespace and comments remain.
pub fn stream_trim(cur: &mut Cursor<'_>, comment_prefix: &str) {
    loop {
        cur.skip_ws();
        if !comment_prefix.is_empty() && cur.starts_with(comment_prefix) {
            cur.skip_while(|c| c != '\n');
            cur.eat('\n');
            continue;
        }
        break;
    }
}

/// Reads up to the next unescaped occurrence of `quote`, assuming the cursor
/// sits just past the opening quote.
///
/// A backslash immediately preceding the quote keeps it as literal content
/// (the backslash itself is kept verbatim too); no other backslash sequence
/// is interpreted. The closing quote is consumed and not returned.
pub fn read_quoted(cur: &mut Cursor<'_>, quote: char) -> Result<String> {
    let mut out = String::new();
    let mut prev_backslash = false;
    while let Some(ch) = cur.next() {
        if ch == quote && !prev_backslash {
            return Ok(out);
        }
        prev_backslash = ch == '\\';
        out.push(ch);
    }
    Err(cur.error(format!("unterminated {quote} quote")))
}

/// Reads a token assembled from unquoted runs and quoted runs, stopping at
/// an unquoted stop character or unquoted whitespace (left unconsumed).
///
/// Double-quoted runs strip the delimiters and reduce `\"` to `"`;
/// single-quoted runs strip the delimiters and keep their content verbatim,
/// with no escape processing.
pub fn read_word(cur: &mut Cursor<'_>, stops: &[char]) -> Result<String> {
    let mut out = String::new();
    while let Some(ch) = cur.peek() {
        if stops.contains(&ch) || ch.is_whitespace() {
            break;
        }
        cur.next();
        match ch {
            '"' => {
                let quoted = read_quoted(cur, '"')?;
                out.push_str(&quoted.replace("\\\"", "\""));
            }
            '\'' => loop {
                match cur.next() {
                    Some('\'') => break,
                    Some(c) => out.push(c),
                    None => return Err(cur.error("unterminated ' quote")),
                }
            },
            _ => out.push(ch),
        }
    }
    Ok(out)
}

/// Splits on runs of whitespace, suppressing empty fields.
///
/// Equivalent to `string_split_with(input, "", true)`.
pub fn string_split(input: &str) -> Vec<&str> {
    string_split_with(input, "", true)
}

/// Splits `input` into fields.
///
/// An empty `sep` splits on every single whitespace character; a non-empty
/// `sep` splits on exact, non-overlapping occurrences. With `collapse_empty`
/// set, empty fields (including leading and trailing ones) are suppressed;
/// otherwise every delimited field is preserved.
pub fn string_split_with<'a>(input: &'a str, sep: &str, collapse_empty: bool) -> Vec<&'a str> {
    let fields: Vec<&str> = if sep.is_empty() {
        input.split(char::is_whitespace).collect()
    } else {
        input.split(sep).collect()
    };
    if collapse_empty {
        fields.into_iter().filter(|f| !f.is_empty()).collect()
    } else {
        fields
    }
}

/// Trims whitespace from one or both ends of `input`.
///
/// A negative `side` trims the end, a positive one the start, zero both.
pub fn string_trim(input: &str, side: i32) -> &str {
    match side.cmp(&0) {
        std::cmp::Ordering::Less => input.trim_end(),
        std::cmp::Ordering::Greater => input.trim_start(),
        std::cmp::Ordering::Equal => input.trim(),
    }
}

/// Escapes `input` for embedding in a double-quoted string.
///
/// Backslash and the quote character become backslash-prefixed, the standard
/// control characters map to their two-character mnemonics, and any other
/// non-printable ASCII byte becomes a `\xHH` escape.
pub fn string_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\u{07}' => out.push_str("\\a"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0C}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0B}' => out.push_str("\\v"),
            c if (c as u32) < 0x20 || c as u32 == 0x7F => {
                out.push_str(&format!("\\x{:02x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out
}

/// Reverses [`string_escape`] and expands variables using the process
/// environment for `${NAME}` references.
///
/// Unrecognized backslash sequences are kept verbatim. `$(name)` references
/// are kept verbatim too, since no substitution mapping is supplied here.
pub fn string_unescape(input: &str) -> String {
    string_unescape_with(input, &HashMap::new(), |name| std::env::var(name).ok())
}

/// Reverses [`string_escape`] and expands variable references.
///
/// `$(name)` is replaced from `vars`; `${NAME}` is replaced through the
/// injected `env` lookup, substituting an empty string when the lookup
/// yields nothing. A backslash immediately before `$` suppresses expansion
/// and emits a literal `$`. Substituted values are inserted verbatim, not
/// rescanned.
pub fn string_unescape_with<E>(input: &str, vars: &HashMap<String, String>, env: E) -> String
where
    E: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(input.len());
    let mut cur = Cursor::new(input);
    while let Some(ch) = cur.next() {
        match ch {
            '\\' => match cur.peek() {
                Some('$') => {
                    cur.next();
                    out.push('$');
                }
                Some(c) => {
                    if let Some(decoded) = decode_escape(&mut cur, c) {
                        out.push(decoded);
                    } else {
                        out.push('\\');
                    }
                }
                None => out.push('\\'),
            },
            '$' => match cur.peek() {
                Some('(') => match expand_ref(&mut cur, '(', ')') {
                    Some(name) => match vars.get(&name) {
                        Some(val) => out.push_str(val),
                        None => {
                            out.push_str("$(");
                            out.push_str(&name);
                            out.push(')');
                        }
                    },
                    None => out.push('$'),
                },
                Some('{') => match expand_ref(&mut cur, '{', '}') {
                    Some(name) => out.push_str(&env(&name).unwrap_or_default()),
                    None => out.push('$'),
                },
                _ => out.push('$'),
            },
            c => out.push(c),
        }
    }
    out
}

/// Reverses backslash escapes without any variable expansion. Used by the
/// format parsers for basic strings.
pub(crate) fn unescape_escapes(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut cur = Cursor::new(input);
    while let Some(ch) = cur.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match cur.peek() {
            Some(c) => {
                if let Some(decoded) = decode_escape(&mut cur, c) {
                    out.push(decoded);
                } else {
                    out.push('\\');
                }
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Decodes the character following a backslash, consuming it (and the hex
/// digits of a `\xHH` escape) on success. Returns `None` for sequences that
/// must stay verbatim; nothing is consumed in that case.
fn decode_escape(cur: &mut Cursor<'_>, c: char) -> Option<char> {
    let decoded = match c {
        'a' => '\u{07}',
        'b' => '\u{08}',
        'f' => '\u{0C}',
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        'v' => '\u{0B}',
        '\\' => '\\',
        '"' => '"',
        'x' => {
            let rest = cur.rest();
            let hex = rest.get(1..3)?;
            let byte = u32::from_str_radix(hex, 16).ok()?;
            cur.next();
            cur.next();
            cur.next();
            return char::from_u32(byte);
        }
        _ => return None,
    };
    cur.next();
    Some(decoded)
}

/// Reads a `$`-reference name between `open` and `close`, assuming the
/// cursor sits on `open`. Returns `None` (consuming nothing) when the
/// reference is unterminated.
fn expand_ref(cur: &mut Cursor<'_>, open: char, close: char) -> Option<String> {
    let mut probe = cur.clone();
    probe.eat(open);
    let mut name = String::new();
    loop {
        match probe.next() {
            Some(c) if c == close => break,
            Some(c) => name.push(c),
            None => return None,
        }
    }
    *cur = probe;
    Some(name)
}
