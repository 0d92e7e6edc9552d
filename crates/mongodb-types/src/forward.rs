//! Forward conversion: Record → BSON document.

use crate::error::ConversionError;
use bson::{doc, Bson, Document};
use mover_core::{Record, Value};

/// Convert a record into a BSON document.
///
/// Integers that fit in 32 bits become `Int32`, other integers `Int64`,
/// and every other number `Double`.
pub fn record_to_document(record: &Record) -> Result<Document, ConversionError> {
    object_to_document(record, None)
}

/// Build an equality filter on `fields`, in the given order, with the
/// record's values for them.
///
/// Each value is wrapped in `$eq`, so a record value that looks like a
/// query operator is still matched literally. A field absent from the
/// record is an error rather than a filter on a missing value.
pub fn select_fields(record: &Record, fields: &[String]) -> Result<Document, ConversionError> {
    let mut filter = Document::new();
    for field in fields {
        let value = record
            .get(field)
            .ok_or_else(|| ConversionError::MissingField(field.clone()))?;
        check_key(field, field)?;
        filter.insert(field.clone(), doc! { "$eq": value_to_bson(value, field)? });
    }
    Ok(filter)
}

/// Build a `$set` update writing every field of the record.
///
/// Top-level names containing `.` or starting with `$` are refused: an
/// update reads them as paths or operators, not as the literal field an
/// insert would store.
pub fn set_document(record: &Record) -> Result<Document, ConversionError> {
    if let Some(key) = record
        .keys()
        .find(|key| key.contains('.') || key.starts_with('$'))
    {
        return Err(ConversionError::ReservedFieldName(key.clone()));
    }
    Ok(doc! { "$set": record_to_document(record)? })
}

fn value_to_bson(value: &Value, path: &str) -> Result<Bson, ConversionError> {
    Ok(match value {
        Value::Null => Bson::Null,
        Value::Bool(b) => Bson::Boolean(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                match i32::try_from(i) {
                    Ok(small) => Bson::Int32(small),
                    Err(_) => Bson::Int64(i),
                }
            } else if n.is_u64() {
                return Err(ConversionError::IntegerOverflow {
                    path: path.to_string(),
                    value: n.to_string(),
                });
            } else {
                // Without arbitrary precision every remaining number is an f64.
                Bson::Double(n.as_f64().unwrap_or_default())
            }
        }
        Value::String(s) => Bson::String(s.clone()),
        Value::Array(items) => {
            let mut arr = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                arr.push(value_to_bson(item, &join_path(Some(path), &i.to_string()))?);
            }
            Bson::Array(arr)
        }
        Value::Object(map) => Bson::Document(object_to_document(map, Some(path))?),
    })
}

fn object_to_document(
    map: &serde_json::Map<String, Value>,
    parent: Option<&str>,
) -> Result<Document, ConversionError> {
    let mut doc = Document::new();
    for (key, value) in map {
        let path = join_path(parent, key);
        check_key(key, &path)?;
        doc.insert(key.clone(), value_to_bson(value, &path)?);
    }
    Ok(doc)
}

fn check_key(key: &str, path: &str) -> Result<(), ConversionError> {
    if key.contains('\0') {
        return Err(ConversionError::InvalidFieldName {
            path: path.to_string(),
        });
    }
    Ok(())
}

fn join_path(parent: Option<&str>, segment: &str) -> String {
    match parent {
        Some(p) if !p.is_empty() => format!("{p}.{segment}"),
        _ => segment.to_string(),
    }
}
