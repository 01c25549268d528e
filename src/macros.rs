/// Builds a [`Value`](crate::Value) from a JSON-like literal.
///
/// ```rust
/// use confval::value;
///
/// let v = value!({
///     "name": "Alice",
///     "scores": [8, 15.5, null],
///     "active": true,
/// });
/// assert_eq!(v["scores"][1], 15.5);
/// ```
#[macro_export]
macro_rules! value {
    // Handle null
    (null) => {
        $crate::Value::from(())
    };

    // Handle true
    (true) => {
        $crate::Value::from(true)
    };

    // Handle false
    (false) => {
        $crate::Value::from(false)
    };

    // Handle empty array
    ([]) => {
        $crate::Value::from(::std::vec::Vec::<$crate::Value>::new())
    };

    // Handle non-empty array
    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::from(vec![$($crate::value!($elem)),*])
    };

    // Handle empty object
    ({}) => {
        $crate::Value::from($crate::Map::new())
    };

    // Handle non-empty object
    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut object = $crate::Map::new();
        $(
            object.insert($key.to_string(), $crate::value!($value));
        )*
        $crate::Value::from(object)
    }};

    // Fallback for any expression convertible into a value
    ($v:expr) => {
        $crate::Value::from($v)
    };
}

#[cfg(test)]
mod tests {
    use crate::NIL;

    #[test]
    fn primitives() {
        assert_eq!(value!(null), NIL);
        assert!(value!(null).is_set());
        assert_eq!(value!(true), true);
        assert_eq!(value!(42), 42);
        assert_eq!(value!(3.5), 3.5);
        assert_eq!(value!("hello"), "hello");
    }

    #[test]
    fn arrays() {
        assert_eq!(value!([]).get_arr().unwrap().len(), 0);

        let arr = value!([1, [2, 3], "x"]);
        assert_eq!(arr["[1][-1]"], 3);
        assert_eq!(arr["[-1]"], "x");
    }

    #[test]
    fn objects() {
        assert!(value!({}).is_obj());

        let obj = value!({
            "name": "Alice",
            "age": 30
        });
        assert_eq!(obj["name"], "Alice");
        assert_eq!(obj["age"], 30);
        assert_eq!(obj.get_obj().unwrap().len(), 2);
    }

    #[test]
    fn expressions_fall_through() {
        let port = 8080;
        assert_eq!(value!(port + 1), 8081);
        assert_eq!(value!(format!("id-{port}")), "id-8080");
    }

    #[test]
    fn null_is_explicit() {
        let v = value!({"a": null});
        assert!(v["a"].is_set());
        assert!(v.is_deep_set());
        assert_eq!(v.to_toml_inline(), "{}");
    }
}
