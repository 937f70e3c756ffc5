//! Value coercions
//!
//! String conversion as the platform applies it to attribute values, and
//! the canonical JSON text used for object-valued attributes.

use fos_dom::number_to_dom_string;
use serde_json::{Map, Number};

use crate::value::Value;

/// String coercion of a value
pub fn to_js_string(value: &Value) -> String {
    match value {
        Value::Undefined => "undefined".to_string(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_to_dom_string(*n),
        Value::BigInt(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Symbol(s) => format!("Symbol({})", s.description().unwrap_or("")),
        // Array.prototype.join: nullish items become empty strings
        Value::Array(items) => items
            .iter()
            .map(|item| if item.is_nullish() { String::new() } else { to_js_string(item) })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) | Value::Handler(_) => "[object Object]".to_string(),
        Value::Function(_) => "function () { [native code] }".to_string(),
    }
}

/// Canonical JSON text of a value
///
/// Follows `JSON.stringify`: non-finite numbers become `null`, members
/// holding `undefined`, functions or symbols are left out of objects and
/// become `null` inside arrays. BigInts are written as decimal strings.
pub fn to_json_text(value: &Value) -> String {
    match to_json(value) {
        Some(json) => json.to_string(),
        None => "undefined".to_string(),
    }
}

fn to_json(value: &Value) -> Option<serde_json::Value> {
    let json = match value {
        Value::Undefined | Value::Symbol(_) | Value::Function(_) => return None,
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Number(n) => number_to_json(*n),
        Value::BigInt(n) => serde_json::Value::String(n.to_string()),
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Array(items) => serde_json::Value::Array(
            items
                .iter()
                .map(|item| to_json(item).unwrap_or(serde_json::Value::Null))
                .collect(),
        ),
        Value::Object(object) => {
            let mut map = Map::new();
            for (key, member) in object.iter() {
                if let Some(json) = to_json(member) {
                    map.insert(key.to_string(), json);
                }
            }
            serde_json::Value::Object(map)
        }
        Value::Handler(_) => serde_json::Value::Object(Map::new()),
    };
    Some(json)
}

/// Finite numbers keep their script spelling; the rest become `null`
fn number_to_json(n: f64) -> serde_json::Value {
    if !n.is_finite() {
        return serde_json::Value::Null;
    }
    number_to_dom_string(n)
        .parse::<Number>()
        .map_or(serde_json::Value::Null, serde_json::Value::Number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Object, Symbol};

    #[test]
    fn test_string_coercion() {
        assert_eq!(to_js_string(&Value::Number(3.0)), "3");
        assert_eq!(to_js_string(&Value::Number(0.5)), "0.5");
        assert_eq!(to_js_string(&Value::BigInt(12345678901234567890)), "12345678901234567890");
        assert_eq!(to_js_string(&Value::Symbol(Symbol::new(Some("tag")))), "Symbol(tag)");
        assert_eq!(to_js_string(&Value::Symbol(Symbol::new(None))), "Symbol()");
        assert_eq!(
            to_js_string(&Value::Array(vec![1.into(), Value::Null, "x".into()])),
            "1,,x"
        );
        assert_eq!(to_js_string(&Value::Object(Object::new())), "[object Object]");
    }

    #[test]
    fn test_json_objects_keep_order() {
        let object = Object::new()
            .with("b", 1)
            .with("a", Value::Array(vec![true.into(), Value::Undefined]))
            .with("skip", Value::function(|_| {}));
        assert_eq!(to_json_text(&object.into()), r#"{"b":1,"a":[true,null]}"#);
    }

    #[test]
    fn test_json_numbers() {
        let items = Value::Array(vec![
            Value::Number(1.0),
            Value::Number(-0.0),
            Value::Number(2.5),
            Value::Number(f64::NAN),
            Value::Number(f64::INFINITY),
            Value::BigInt(7),
        ]);
        assert_eq!(to_json_text(&items), r#"[1,0,2.5,null,null,"7"]"#);
    }

    #[test]
    fn test_json_large_numbers() {
        let object = Object::new()
            .with("n", 1e20)
            .with("m", 1e21)
            .with("big", 9_007_199_254_740_993.0)
            .with("tiny", 1e-7);
        assert_eq!(
            to_json_text(&object.into()),
            r#"{"n":100000000000000000000,"m":1e+21,"big":9007199254740992,"tiny":1e-7}"#
        );
    }

    #[test]
    fn test_json_string_escaping() {
        let object = Object::new().with("q", "say \"hi\"\n");
        assert_eq!(to_json_text(&object.into()), r#"{"q":"say \"hi\"\n"}"#);
    }
}
