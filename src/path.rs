//! Path expressions.
//!
//! A path is a string of segments separated by `.` or by bracketed forms:
//! `[3]` (array index, negative counted from the end), `['key']` / `["key"]`
//! (quoted key). The tokenizer tracks quote and bracket depth, so quoting
//! may nest arbitrarily: the content of a quoted bracket key is itself
//! re-parsed as a path, which makes `a["b.c"]` address the same node as
//! `a.b.c`, and lets keys carry bracket syntax of their own, as in
//! `a b['c d["e f[-1]"]']`.
//!
//! Leading, trailing, and repeated `.` separators are insignificant, and a
//! path of only dots stays at the current node. Unquoted whitespace around
//! a segment is trimmed; quoted whitespace is preserved.

use crate::lex::{read_quoted, Cursor};
use crate::Result;

/// One navigation step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Object key.
    Key(String),
    /// Array index; negative values count from the end.
    Index(i64),
}

/// Tokenizes a path expression into navigation segments.
///
/// # Errors
///
/// Fails with [`crate::Error::Parse`] on unbalanced brackets, unterminated
/// quotes, or a non-integer bracket index.
pub fn parse(path: &str) -> Result<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut cur = Cursor::new(path);
    parse_into(&mut cur, &mut segments)?;
    Ok(segments)
}

fn parse_into(cur: &mut Cursor<'_>, out: &mut Vec<Segment>) -> Result<()> {
    loop {
        cur.skip_while(|c| c == '.' || c.is_whitespace());
        if cur.at_end() {
            return Ok(());
        }
        if cur.peek() == Some('[') {
            bracket(cur, out)?;
            continue;
        }
        let word = segment_word(cur)?;
        if !word.is_empty() {
            out.push(Segment::Key(word));
        }
    }
}

/// Reads a bare segment up to an unquoted `.` or `[`. Quoted runs keep
/// their content verbatim (delimiters stripped, `\<quote>` reduced); inner
/// unquoted whitespace is preserved, edge whitespace trimmed.
fn segment_word(cur: &mut Cursor<'_>) -> Result<String> {
    let mut out = String::new();
    let mut pending_ws = String::new();
    while let Some(ch) = cur.peek() {
        match ch {
            '.' | '[' => break,
            ']' => return Err(cur.error("unexpected ']' in path")),
            '"' | '\'' => {
                cur.next();
                let quoted = read_quoted(cur, ch)?;
                if !out.is_empty() {
                    out.push_str(&pending_ws);
                }
                pending_ws.clear();
                out.push_str(&unescape_quote(&quoted, ch));
            }
            c if c.is_whitespace() => {
                cur.next();
                pending_ws.push(c);
            }
            c => {
                cur.next();
                if !out.is_empty() {
                    out.push_str(&pending_ws);
                }
                pending_ws.clear();
                out.push(c);
            }
        }
    }
    Ok(out)
}

fn bracket(cur: &mut Cursor<'_>, out: &mut Vec<Segment>) -> Result<()> {
    cur.next();
    cur.skip_ws();
    match cur.peek() {
        Some(q @ ('"' | '\'')) => {
            cur.next();
            let content = read_quoted(cur, q)?;
            cur.skip_ws();
            if !cur.eat(']') {
                return Err(cur.error("expected ']' after quoted key"));
            }
            // The quoted key is itself a path.
            let content = unescape_quote(&content, q);
            parse_into(&mut Cursor::new(&content), out)
        }
        Some(_) => {
            let mut index = String::new();
            while let Some(c) = cur.peek() {
                if c == ']' {
                    break;
                }
                cur.next();
                index.push(c);
            }
            if !cur.eat(']') {
                return Err(cur.error("unbalanced '[' in path"));
            }
            let index = index.trim();
            let index: i64 = index
                .parse()
                .map_err(|_| cur.error(format!("invalid array index {index:?}")))?;
            out.push(Segment::Index(index));
            Ok(())
        }
        None => Err(cur.error("unbalanced '[' in path")),
    }
}

fn unescape_quote(content: &str, quote: char) -> String {
    content.replace(&format!("\\{quote}"), &quote.to_string())
}
