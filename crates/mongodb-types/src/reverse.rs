//! Reverse conversion: BSON document → Record.
//!
//! JSON-shaped BSON (the output of [`crate::forward`]) maps back exactly.
//! Types with no JSON counterpart (ObjectId, dates, binary, ...) use their
//! relaxed Extended JSON form.

use crate::ID_FIELD;
use bson::{Bson, Document};
use mover_core::{Record, Value};

/// Convert a BSON document into a record.
pub fn document_to_record(doc: &Document) -> Record {
    doc.iter()
        .map(|(key, value)| (key.clone(), bson_to_json(value)))
        .collect()
}

/// Convert a stored document into a record, dropping the store-assigned
/// identity field.
pub fn document_to_record_without_id(doc: &Document) -> Record {
    let mut record = document_to_record(doc);
    record.remove(ID_FIELD);
    record
}

/// Convert a single BSON value into JSON.
pub fn bson_to_json(value: &Bson) -> Value {
    match value {
        Bson::Null => Value::Null,
        Bson::Boolean(b) => Value::Bool(*b),
        Bson::Int32(i) => Value::from(*i),
        Bson::Int64(i) => Value::from(*i),
        Bson::Double(f) => match serde_json::Number::from_f64(*f) {
            Some(n) => Value::Number(n),
            None => value.clone().into_relaxed_extjson(),
        },
        Bson::String(s) => Value::String(s.clone()),
        Bson::Array(items) => Value::Array(items.iter().map(bson_to_json).collect()),
        Bson::Document(doc) => Value::Object(document_to_record(doc)),
        other => other.clone().into_relaxed_extjson(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forward::record_to_document;
    use bson::{doc, oid::ObjectId};
    use serde_json::json;

    #[test]
    fn test_record_survives_store_representation() {
        let record = mover_core::record_from_value(json!({
            "name": "Grace",
            "age": 85,
            "big": -9_000_000_000i64,
            "score": 9.5,
            "flags": [true, null, "x"],
            "nested": {"inner": {"list": [1, 2.5]}},
        }))
        .unwrap();

        let doc = record_to_document(&record).unwrap();
        assert_eq!(document_to_record(&doc), record);
    }

    #[test]
    fn test_identity_field_dropped() {
        let oid = ObjectId::new();
        let doc = doc! {"_id": oid, "a": 1};

        let with_id = document_to_record(&doc);
        assert_eq!(with_id["_id"], json!({"$oid": oid.to_hex()}));

        let without_id = document_to_record_without_id(&doc);
        assert_eq!(Value::Object(without_id), json!({"a": 1}));
    }

    #[test]
    fn test_non_finite_double() {
        let value = bson_to_json(&Bson::Double(f64::INFINITY));
        assert_eq!(value, json!({"$numberDouble": "Infinity"}));
    }
}
