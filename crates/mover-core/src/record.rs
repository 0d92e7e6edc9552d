//! Record and batch representations.

pub use serde_json::Value;

/// One logical unit to persist: field name to arbitrary JSON-shaped value.
///
/// Field order carries no meaning.
pub type Record = serde_json::Map<String, Value>;

/// An ordered sequence of records handed to a destination in one call.
pub type Batch = Vec<Record>;

/// Unwrap a JSON value into a record if it is an object.
pub fn record_from_value(value: Value) -> Option<Record> {
    match value {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_from_object() {
        let record = record_from_value(json!({"a": 1, "b": {"c": [true]}})).unwrap();
        assert_eq!(record.len(), 2);
        assert_eq!(record["a"], json!(1));
    }

    #[test]
    fn test_record_from_non_object() {
        assert!(record_from_value(json!([1, 2])).is_none());
        assert!(record_from_value(json!("text")).is_none());
        assert!(record_from_value(Value::Null).is_none());
    }
}
