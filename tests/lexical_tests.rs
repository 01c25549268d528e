use std::collections::HashMap;

use confval::lex::{
    read_quoted, read_word, stream_trim, string_escape, string_split, string_split_with,
    string_trim, string_unescape, string_unescape_with, Cursor,
};

#[test]
fn test_string_escape() {
    assert_eq!(string_escape("abc"), "abc");
    assert_eq!(string_escape("abc\\"), "abc\\\\");
    assert_eq!(string_escape("\u{07}bc\\"), "\\abc\\\\");
    assert_eq!(string_escape("\"abc\\"), "\\\"abc\\\\");
    assert_eq!(string_escape("\tabc\\"), "\\tabc\\\\");
    assert_eq!(string_escape("a\\bc\\"), "a\\\\bc\\\\");
    assert_eq!(string_escape("a\\\u{08}c\\"), "a\\\\\\bc\\\\");
    assert_eq!(string_escape("a\"b\"c"), "a\\\"b\\\"c");

    assert_eq!(string_escape("[\\]"), "[\\\\]");
    assert_eq!(string_escape("[\"]"), "[\\\"]");
    assert_eq!(string_escape("[\u{07}]"), "[\\a]");
    assert_eq!(string_escape("[\u{08}]"), "[\\b]");
    assert_eq!(string_escape("[\u{0C}]"), "[\\f]");
    assert_eq!(string_escape("[\n]"), "[\\n]");
    assert_eq!(string_escape("[\r]"), "[\\r]");
    assert_eq!(string_escape("[\t]"), "[\\t]");
    assert_eq!(string_escape("[\u{0B}]"), "[\\v]");

    assert_eq!(string_escape("[\u{03}]"), "[\\x03]");
}

#[test]
fn test_string_unescape() {
    assert_eq!(string_unescape("abc"), "abc");
    assert_eq!(string_unescape("abc\\"), "abc\\");
    assert_eq!(string_unescape("\\abc\\"), "\u{07}bc\\");
    assert_eq!(string_unescape("\\\"abc\\"), "\"abc\\");
    assert_eq!(string_unescape("\\tabc\\"), "\tabc\\");
    assert_eq!(string_unescape("a\\\\bc\\"), "a\\bc\\");
    assert_eq!(string_unescape("a\\\\\\bc\\"), "a\\\u{08}c\\");
    assert_eq!(string_unescape("a\\\"b\\\"c"), "a\"b\"c");
    assert_eq!(string_unescape("ab\\c"), "ab\\c");

    assert_eq!(string_unescape("[\\\\]"), "[\\]");
    assert_eq!(string_unescape("[\\\"]"), "[\"]");
    assert_eq!(string_unescape("[\\a]"), "[\u{07}]");
    assert_eq!(string_unescape("[\\b]"), "[\u{08}]");
    assert_eq!(string_unescape("[\\f]"), "[\u{0C}]");
    assert_eq!(string_unescape("[\\n]"), "[\n]");
    assert_eq!(string_unescape("[\\r]"), "[\r]");
    assert_eq!(string_unescape("[\\t]"), "[\t]");
    assert_eq!(string_unescape("[\\v]"), "[\u{0B}]");
    assert_eq!(string_unescape("[\\y]"), "[\\y]");
    assert_eq!(string_unescape("[\\z]"), "[\\z]");
    assert_eq!(string_unescape("[\\x03]"), "[\u{03}]");
}

#[test]
fn test_string_unescape_expand() {
    let vars: HashMap<String, String> = [
        ("key1", "val1"),
        ("key2", "val2"),
        ("keyn", "val\\n"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    let env = |name: &str| match name {
        "HOME" => Some("/home/alice".to_string()),
        _ => None,
    };

    let expand = |input: &str| string_unescape_with(input, &vars, env);

    assert_eq!(expand("abc"), "abc");
    assert_eq!(expand("$(key1)"), "val1");
    assert_eq!(expand("abc\\$(key1)"), "abc$(key1)");
    assert_eq!(expand("$(key1)$(key2)"), "val1val2");
    // substituted text is not rescanned
    assert_eq!(expand("($(key1)$(key2)$(keyn))"), "(val1val2val\\n)");
    // absent mapping keys stay verbatim
    assert_eq!(expand("$(nokey)"), "$(nokey)");

    assert_eq!(expand("${HOME}"), "/home/alice");
    assert_eq!(expand("[${NO_SUCH_ENV}]"), "[]");
    // unterminated references are literal text
    assert_eq!(expand("$(key1"), "$(key1");
    assert_eq!(expand("${HOME"), "${HOME");
}

#[test]
fn test_read_quoted() {
    fn check(input: &str, expected: &str, next: Option<char>) {
        let mut cur = Cursor::new(input);
        assert_eq!(read_quoted(&mut cur, '"').unwrap(), expected);
        assert_eq!(cur.peek(), next);
    }

    check("\"@", "", Some('@'));
    check("abcdef\"@", "abcdef", Some('@'));
    check("abc\"@def", "abc", Some('@'));
    check("abc\\\"def\"@", "abc\\\"def", Some('@'));

    let mut cur = Cursor::new("never closed");
    assert!(read_quoted(&mut cur, '"').is_err());
}

#[test]
fn test_read_word() {
    fn check(input: &str, stops: &[char], expected: &str, next: Option<char>) {
        let mut cur = Cursor::new(input);
        assert_eq!(read_word(&mut cur, stops).unwrap(), expected);
        assert_eq!(cur.peek(), next);
    }

    check("", &[], "", None);
    check("abc ", &[], "abc", Some(' '));
    check("abc. ", &[], "abc.", Some(' '));
    check("abc. ", &['.'], "abc", Some('.'));
    check("a\"b \\\"c.d\"e.f", &[], "ab \"c.de.f", None);
    check("a\"b \\\"c.d\"e.f", &['.'], "ab \"c.de", Some('.'));
    check("a'b \\\"c\\'d e\"f", &[], "ab \\\"c\\d", Some(' '));
    check("a\"b \\\"c\\\"d e\"f ", &[], "ab \"c\"d ef", Some(' '));
}

#[test]
fn test_string_split() {
    assert_eq!(string_split(""), Vec::<&str>::new());
    assert_eq!(string_split("  "), Vec::<&str>::new());
    assert_eq!(string_split_with("  ", "", false), vec!["", "", ""]);

    assert_eq!(string_split("abcdefgh"), vec!["abcdefgh"]);
    assert_eq!(string_split(" abcdefgh"), vec!["abcdefgh"]);
    assert_eq!(string_split_with(" abcdefgh", "", false), vec!["", "abcdefgh"]);

    assert_eq!(string_split("ab cd  ef\tgh"), vec!["ab", "cd", "ef", "gh"]);
    assert_eq!(
        string_split_with("ab cd  ef\tgh ", "", false),
        vec!["ab", "cd", "", "ef", "gh", ""]
    );

    assert_eq!(string_split_with("sep", "sep", true), Vec::<&str>::new());
    assert_eq!(string_split_with("sep", "sep", false), vec!["", ""]);

    assert_eq!(
        string_split_with("ab:::cd::::ef::gh::", "::", true),
        vec!["ab", ":cd", "ef", "gh"]
    );
    assert_eq!(
        string_split_with("ab:::cd::::ef::gh::", "::", false),
        vec!["ab", ":cd", "", "ef", "gh", ""]
    );
    assert_eq!(
        string_split_with("ab:::cd::::ef::gh:", "::", true),
        vec!["ab", ":cd", "ef", "gh:"]
    );
}

#[test]
fn test_stream_trim() {
    let mut cur = Cursor::new("@abc");
    stream_trim(&mut cur, "#");
    assert_eq!(cur.peek(), Some('@'));
    assert_eq!(cur.pos(), 0);

    let mut cur = Cursor::new("#@abc");
    stream_trim(&mut cur, "#");
    assert!(cur.at_end());

    let mut cur = Cursor::new("\t \n\t@abc");
    stream_trim(&mut cur, "#");
    assert_eq!(cur.peek(), Some('@'));
    assert_eq!(cur.pos(), 4);

    let mut cur = Cursor::new("\t #def \n    #ghi\n\t@abc");
    stream_trim(&mut cur, "#");
    assert_eq!(cur.peek(), Some('@'));
    assert_eq!(cur.pos(), 18);

    let mut cur = Cursor::new("  // abc\n\t\n  /");
    stream_trim(&mut cur, "//");
    assert_eq!(cur.peek(), Some('/'));
    assert_eq!(cur.pos(), 13);
}

#[test]
fn test_string_trim() {
    for side in [-1, 0, 1] {
        assert_eq!(string_trim("", side), "");
        assert_eq!(string_trim(" \t \n ", side), "");
        assert_eq!(string_trim("ab\tc", side), "ab\tc");
    }

    assert_eq!(string_trim(" \t \n ab\tc", -1), " \t \n ab\tc");
    assert_eq!(string_trim(" \t \n ab\tc", 0), "ab\tc");
    assert_eq!(string_trim(" \t \n ab\tc", 1), "ab\tc");

    assert_eq!(string_trim("a\nbc \t \n ", -1), "a\nbc");
    assert_eq!(string_trim("a\nbc \t \n ", 0), "a\nbc");
    assert_eq!(string_trim("a\nbc \t \n ", 1), "a\nbc \t \n ");

    assert_eq!(string_trim("\nab\tc \t \n ", -1), "\nab\tc");
    assert_eq!(string_trim("\nab\tc \t \n ", 0), "ab\tc");
    assert_eq!(string_trim("\nab\tc \t \n ", 1), "ab\tc \t \n ");
}
