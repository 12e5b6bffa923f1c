//! `Inspect` for `serde_json::Value`.
//!
//! `null` is an absent value of kind any; every other variant reports its
//! concrete kind. Objects are mappings, not records: rules are only read from
//! declared fields.

use serde_json::Value;

use super::{Describe, Inspect, Kind, Shape};

impl Inspect for Value {
    fn kind(&self) -> Kind {
        match self {
            Value::Null => Kind::Any,
            Value::Bool(_) | Value::Number(_) => Kind::Primitive,
            Value::String(_) => Kind::Text,
            Value::Array(_) => Kind::Sequence,
            Value::Object(_) => Kind::Mapping,
        }
    }

    fn is_absent(&self) -> bool {
        self.is_null()
    }

    fn is_zero(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Bool(b) => !b,
            Value::Number(n) => n.as_f64() == Some(0.0),
            Value::String(s) => s.is_empty(),
            Value::Array(items) => items.is_empty(),
            Value::Object(map) => map.is_empty(),
        }
    }

    fn len(&self) -> Option<usize> {
        match self {
            Value::String(s) => Some(s.chars().count()),
            Value::Array(items) => Some(items.len()),
            Value::Object(map) => Some(map.len()),
            _ => None,
        }
    }

    fn as_text(&self) -> Option<&str> {
        self.as_str()
    }

    fn shape(&self) -> Shape {
        <Self as Describe>::shape()
    }
}

impl Describe for Value {
    fn shape() -> Shape {
        Shape::leaf::<Self>(Kind::Any)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_is_absent() {
        let value = Value::Null;
        assert_eq!(value.kind(), Kind::Any);
        assert!(value.is_absent());
        assert!((&value as &dyn Inspect).resolve().is_none());
    }

    #[test]
    fn test_concrete_kinds() {
        assert_eq!(json!(1).kind(), Kind::Primitive);
        assert_eq!(json!("x").kind(), Kind::Text);
        assert_eq!(json!([1, 2]).kind(), Kind::Sequence);
        assert_eq!(json!({"a": 1}).kind(), Kind::Mapping);
    }

    #[test]
    fn test_zero_and_length() {
        assert!(json!(0).is_zero());
        assert!(json!(0.0).is_zero());
        assert!(!json!(-1).is_zero());
        assert!(json!("").is_zero());
        assert!(!json!(true).is_zero());

        let text = json!("ünï");
        assert_eq!((&text as &dyn Inspect).length(), Ok(3));
        assert_eq!(text.as_text(), Some("ünï"));
    }

    #[test]
    fn test_optional_json_resolves_to_concrete_kind() {
        let value = Some(json!("test@test.com"));
        let resolved = (&value as &dyn Inspect).resolve().unwrap();
        assert_eq!(resolved.kind(), Kind::Text);
    }
}
