/// Builds a [`LuaValue`](crate::LuaValue) from a JSON-like literal.
///
/// `[...]` builds an array and `{ key: value, ... }` a table. Keys may be
/// string, integer or boolean literals. Tables are reduced the same way
/// parsed tables are, so `lua!({})` is the empty array and a table keyed
/// `1..=n` is an array.
///
/// ```rust
/// use serde_luatable::{lua, parse};
///
/// let value = lua!({ "name": "Alice", 1: true, "tags": ["a", nil] });
/// assert_eq!(value, parse("{name='Alice', [1]=true, tags={'a', nil}}").unwrap());
/// assert_eq!(lua!({ 1: "x", 2: "y" }), lua!(["x", "y"]));
/// ```
#[macro_export]
macro_rules! lua {
    (nil) => {
        $crate::LuaValue::Nil
    };

    (true) => {
        $crate::LuaValue::Bool(true)
    };

    (false) => {
        $crate::LuaValue::Bool(false)
    };

    ([]) => {
        $crate::LuaValue::Array(vec![])
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::LuaValue::Array(vec![$($crate::lua!($elem)),*])
    };

    ({}) => {
        $crate::LuaValue::Array(vec![])
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut table = $crate::LuaTable::new();
        $(
            table.insert($crate::LuaKey::from($key), $crate::lua!($value));
        )*
        table.into_value()
    }};

    // Any other expression goes through the serde bridge.
    ($s:expr) => {{
        $crate::to_value(&$s).unwrap_or($crate::LuaValue::Nil)
    }};
}

#[cfg(test)]
mod tests {
    use crate::{LuaKey, LuaValue, Number};

    #[test]
    fn test_lua_macro_primitives() {
        assert_eq!(lua!(nil), LuaValue::Nil);
        assert_eq!(lua!(true), LuaValue::Bool(true));
        assert_eq!(lua!(42), LuaValue::Number(Number::Integer(42)));
        assert_eq!(lua!(3.5), LuaValue::Number(Number::Float(3.5)));
        assert_eq!(lua!("hello"), LuaValue::String("hello".to_string()));
    }

    #[test]
    fn test_lua_macro_tables() {
        let value = lua!({ "name": "Alice", true: 1, "gone": nil });
        let table = value.as_table().unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get_str("name"), Some(&LuaValue::from("Alice")));
        assert_eq!(table.get(&LuaKey::Bool(true)), Some(&LuaValue::from(1)));
    }

    #[test]
    fn test_lua_macro_nested() {
        let value = lua!([[1, 2], { "k": [] }]);
        assert_eq!(value.get(1).and_then(|v| v.get(2)), Some(&LuaValue::from(2)));
        assert_eq!(
            value.get(2).and_then(|v| v.get("k")),
            Some(&LuaValue::Array(vec![]))
        );
    }
}
