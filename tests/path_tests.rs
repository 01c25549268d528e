use confval::{value, Error, Value, NIL};

fn sample() -> Value {
    value!({
        "bol": true,
        "num": 42,
        "str": "word",
        "obj": {"a": 3, "b": 4},
        "arr": [10, 11, 12]
    })
}

#[test]
fn test_path_simple() {
    let c = sample();
    assert_eq!(c["bol"], true);
    assert_eq!(c["num"], 42);
    assert_eq!(c["str"], "word");
    assert_eq!(c["nil"], NIL);
}

#[test]
fn test_path_obj() {
    let c = sample();
    assert_eq!(c["obj.a"], 3);
    assert_eq!(c["obj['b']"], 4);
    assert_eq!(c["obj.c"], NIL);
}

#[test]
fn test_path_arr() {
    let c = sample();
    assert_eq!(c["arr[0]"], 10);
    assert_eq!(c["arr[1]"], 11);
    assert_eq!(c["arr[-1]"], 12);
    assert_eq!(c["arr[-3]"], 10);
    assert_eq!(c["arr[3]"], NIL);
    assert_eq!(c["arr[-4]"], NIL);
}

#[test]
fn test_path_maniac() {
    let mut c = Value::new();
    *c.at("a b").at("c d").at("e f") = value!([1, 2, 3]);
    assert_eq!(c["a b['c d[\"e f[-1]\"]']"], 3);
}

#[test]
fn test_dots_collapse() {
    let mut c = Value::new();
    c["abc.def.ghi.jkl..."] = Value::from(2.7);

    assert_eq!(c["abc.def.ghi.jkl"].num_or(3.1), 2.7);
    assert_eq!(c[".abc.def"]["."]["ghi"]["jkl"].num_or(3.1), 2.7);
    assert_eq!(c[".abc.def"]["Z"]["ghi"]["jkl"].num_or(3.1), 3.1);
}

#[test]
fn test_quoting_controls_trimming() {
    let mut c = Value::new();
    c["abc.def.ghi.jkl"] = Value::from(1);

    assert_eq!(c["  abc. 'def'.ghi.jkl"], 1);
    assert_eq!(c["  abc.' def'.ghi.jkl"], NIL);
    assert_eq!(c["abc.def.ghi.jkL"], NIL);
}

#[test]
fn test_read_misses_do_not_vivify() {
    let c = sample();
    assert_eq!(c["obj.missing.deeper"], NIL);
    assert_eq!(c["obj"].len(), 2);
    assert!(!c["obj.missing"].is_set());
}

#[test]
fn test_mutable_access_vivifies() {
    let mut c = Value::new();
    assert!(!c.is_set());

    c.at("abc.def.ghi.jkl");
    assert!(c.is_set());
    assert!(!c.is_deep_set());
    assert!(c["abc.def"].is_obj());
}

#[test]
fn test_index_mut_by_integer() {
    let mut c = Value::new();
    c[2] = Value::from("z");
    assert_eq!(c.len(), 3);
    assert_eq!(c[-1], "z");
    assert_eq!(c[0], NIL);

    c[-1] = Value::from("y");
    assert_eq!(c[2], "y");
    assert_eq!(c.len(), 3);
}

#[test]
fn test_mutable_negative_underflow_is_an_error() {
    let mut c = Value::new();
    c.at("arr").arr();
    assert!(matches!(
        c.try_at("arr[-1]"),
        Err(Error::IndexOutOfRange { index: -1, len: 0 })
    ));
    assert_eq!(c["arr"].len(), 0);

    c.at("arr[0]").set(10);
    assert_eq!(*c.try_at("arr[-1]").unwrap(), 10);
}

#[test]
fn test_bad_paths_are_errors() {
    let c = sample();
    assert!(c.try_find("arr[one]").is_err());
    assert!(c.try_find("arr[0").is_err());
    assert!(c.try_find("arr]0[").is_err());

    let mut m = sample();
    assert!(m.try_at("arr[one]").is_err());
}
