//! JSON <-> Value conversion utilities

use crate::Value;

/// How JSON objects are represented once converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ObjectModel {
    /// Attribute records, for the attribute strategies
    #[default]
    Record,
    /// Keyed containers, for the key strategy
    Map,
}

/// Convert serde_json::Value to Value
pub fn json_to_value(v: serde_json::Value, model: ObjectModel) -> Value {
    match v {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Boolean(b),
        serde_json::Value::Number(n) => match (n.as_i64(), n.as_u64()) {
            (Some(i), _) => Value::from(i),
            (None, Some(u)) => Value::from(u),
            (None, None) => n.as_f64().map_or(Value::Null, Value::Float),
        },
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(arr) => Value::Array(
            arr.into_iter()
                .map(|item| json_to_value(item, model))
                .collect(),
        ),
        serde_json::Value::Object(obj) => {
            let fields = obj
                .into_iter()
                .map(|(k, v)| (k, json_to_value(v, model)))
                .collect();
            match model {
                ObjectModel::Record => Value::Object(fields),
                ObjectModel::Map => Value::Map(fields),
            }
        }
    }
}

/// Convert Value to serde_json::Value
///
/// Bytes become an array of numbers.
pub fn value_to_json(v: &Value) -> serde_json::Value {
    match v {
        Value::Null => serde_json::Value::Null,
        Value::Boolean(b) => serde_json::Value::Bool(*b),
        Value::Integer(i) => match (i64::try_from(*i), u64::try_from(*i)) {
            (Ok(n), _) => serde_json::Value::from(n),
            (Err(_), Ok(n)) => serde_json::Value::from(n),
            _ => serde_json::Number::from_f64(*i as f64)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
        },
        Value::Float(f) => serde_json::Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Bytes(bytes) => {
            serde_json::Value::Array(bytes.iter().map(|b| serde_json::Value::from(*b)).collect())
        }
        Value::Array(arr) => serde_json::Value::Array(arr.iter().map(value_to_json).collect()),
        Value::Map(fields) | Value::Object(fields) => serde_json::Value::Object(
            fields
                .iter()
                .map(|(k, v)| (k.clone(), value_to_json(v)))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn objects_follow_the_model() {
        let doc = json!({"name": "x", "tags": {"a": 1}});
        assert!(matches!(json_to_value(doc.clone(), ObjectModel::Record), Value::Object(_)));
        let Value::Map(fields) = json_to_value(doc, ObjectModel::Map) else {
            panic!("expected map");
        };
        assert!(matches!(fields.get("tags"), Some(Value::Map(_))));
    }

    #[test]
    fn numbers_keep_their_kind() {
        assert_eq!(json_to_value(json!(3), ObjectModel::Record), Value::Integer(3));
        assert_eq!(json_to_value(json!(2.5), ObjectModel::Record), Value::Float(2.5));
        assert_eq!(json_to_value(json!(u64::MAX), ObjectModel::Record), Value::from(u64::MAX));
        assert_eq!(value_to_json(&Value::from(u64::MAX)), json!(u64::MAX));
    }

    #[test]
    fn round_trips_through_json() {
        let doc = json!({"name": "x", "sizes": [1, 2.5, null, true]});
        let value = json_to_value(doc.clone(), ObjectModel::Record);
        assert_eq!(value_to_json(&value), doc);
        assert_eq!(value_to_json(&Value::Bytes(vec![1, 2])), json!([1, 2]));
    }
}
