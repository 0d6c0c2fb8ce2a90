use serde_luatable::{lua, parse, LuaKey, LuaValue, Number};

#[test]
fn test_lua_macro_nil() {
    let value = lua!(nil);
    assert_eq!(value, LuaValue::Nil);
}

#[test]
fn test_lua_macro_booleans() {
    let true_val = lua!(true);
    assert_eq!(true_val, LuaValue::Bool(true));

    let false_val = lua!(false);
    assert_eq!(false_val, LuaValue::Bool(false));
}

#[test]
fn test_lua_macro_numbers() {
    let int_val = lua!(42);
    assert_eq!(int_val, LuaValue::Number(Number::Integer(42)));

    let float_val = lua!(3.5);
    assert_eq!(float_val, LuaValue::Number(Number::Float(3.5)));

    let negative_val = lua!(-123);
    assert_eq!(negative_val, LuaValue::Number(Number::Integer(-123)));
}

#[test]
fn test_lua_macro_strings() {
    let string_val = lua!("hello world");
    assert_eq!(string_val, LuaValue::String("hello world".to_string()));

    let empty_string = lua!("");
    assert_eq!(empty_string, LuaValue::String(String::new()));
}

#[test]
fn test_lua_macro_arrays() {
    let empty_array = lua!([]);
    assert_eq!(empty_array, LuaValue::Array(vec![]));

    let mixed_array = lua!([1, "hello", true, nil]);
    assert_eq!(
        mixed_array,
        LuaValue::Array(vec![
            LuaValue::Number(Number::Integer(1)),
            LuaValue::String("hello".to_string()),
            LuaValue::Bool(true),
            LuaValue::Nil,
        ])
    );
}

#[test]
fn test_lua_macro_tables() {
    let empty_table = lua!({});
    assert_eq!(empty_table, LuaValue::Array(vec![]));
    assert_eq!(empty_table, parse("{}").unwrap());

    let simple_table = lua!({
        "name": "Alice",
        "age": 30
    });

    match simple_table {
        LuaValue::Table(ref table) => {
            assert_eq!(table.len(), 2);
            assert_eq!(
                table.get_str("name"),
                Some(&LuaValue::String("Alice".to_string()))
            );
            assert_eq!(
                table.get_str("age"),
                Some(&LuaValue::Number(Number::Integer(30)))
            );
        }
        _ => panic!("Expected table"),
    }
}

#[test]
fn test_lua_macro_reduces_like_the_parser() {
    assert_eq!(lua!({ 1: "a", 2: "b" }), parse("{[2]='b', [1]='a'}").unwrap());
    assert_eq!(lua!({ 1: "a", 2: nil }), lua!(["a"]));

    let sparse = lua!({ 1: "a", 3: "c" });
    assert!(sparse.is_table());
    assert_eq!(sparse.get(3), Some(&LuaValue::from("c")));
}

#[test]
fn test_lua_macro_nested() {
    let nested = lua!({
        "user": {
            "id": 123,
            "name": "Bob",
            "active": true
        },
        "tags": ["admin", "developer"],
        "count": 42
    });

    assert_eq!(
        nested,
        parse(
            "{ user = { id = 123, name = 'Bob', active = true },
               tags = { 'admin', 'developer' },
               count = 42 }"
        )
        .unwrap()
    );

    match nested {
        LuaValue::Table(ref table) => {
            assert_eq!(table.len(), 3);

            if let Some(LuaValue::Table(user)) = table.get_str("user") {
                assert_eq!(
                    user.get_str("id"),
                    Some(&LuaValue::Number(Number::Integer(123)))
                );
                assert_eq!(user.get(&LuaKey::from("active")), Some(&LuaValue::Bool(true)));
            } else {
                panic!("Expected user to be a table");
            }

            if let Some(LuaValue::Array(tags)) = table.get_str("tags") {
                assert_eq!(tags.len(), 2);
                assert_eq!(tags[1], LuaValue::String("developer".to_string()));
            } else {
                panic!("Expected tags to be an array");
            }
        }
        _ => panic!("Expected table"),
    }
}

#[test]
fn test_lua_value_methods() {
    let nil_val = lua!(nil);
    assert!(nil_val.is_nil());
    assert!(!nil_val.is_bool());
    assert!(!nil_val.is_number());
    assert!(!nil_val.is_string());
    assert!(!nil_val.is_array());
    assert!(!nil_val.is_table());

    let bool_val = lua!(true);
    assert!(bool_val.is_bool());
    assert_eq!(bool_val.as_bool(), Some(true));

    let str_val = lua!("hello");
    assert!(str_val.is_string());
    assert_eq!(str_val.as_str(), Some("hello"));

    let array_val = lua!([1, 2, 3]);
    assert!(array_val.is_array());
    assert_eq!(array_val.as_array().map(Vec::len), Some(3));

    let table_val = lua!({"key": "value"});
    assert!(table_val.is_table());
    assert_eq!(table_val.as_table().map(|t| t.len()), Some(1));
}

#[test]
fn test_lua_macro_expressions() {
    let items = vec![1u8, 2, 3];
    assert_eq!(lua!(items), lua!([1, 2, 3]));

    let missing: Option<i32> = None;
    assert_eq!(lua!(missing), LuaValue::Nil);
}
