// SPDX-License-Identifier: MIT
//! Shape-tagged record model for decoded JSONL lines

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Address of a field within a record.
///
/// Array records are addressed by position, object and mapping records by
/// name. Keys are typed: `Index(0)` and `Name("0")` are distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldKey {
    /// Positional column of an array record
    Index(usize),

    /// Named field of an object or mapping record
    Name(String),
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKey::Index(index) => write!(f, "{index}"),
            FieldKey::Name(name) => f.write_str(name),
        }
    }
}

impl From<usize> for FieldKey {
    fn from(index: usize) -> Self {
        FieldKey::Index(index)
    }
}

impl From<&str> for FieldKey {
    fn from(name: &str) -> Self {
        FieldKey::Name(name.to_string())
    }
}

impl From<String> for FieldKey {
    fn from(name: String) -> Self {
        FieldKey::Name(name)
    }
}

/// One decoded line, tagged by shape.
///
/// JSON arrays decode to `Mapping` with positional `Index` keys, JSON objects
/// to `Mapping` with `Name` keys or to `Object` depending on the decode
/// options. Scalars and `null` carry no fields and are left untouched by
/// projection.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    /// Generic ordered mapping of field keys to values
    Mapping(IndexMap<FieldKey, Value>),

    /// Structured object with named fields
    Object(Map<String, Value>),

    /// A bare scalar line (string, number or boolean)
    Scalar(Value),

    /// A literal `null` line
    Null,
}

impl Record {
    /// True when the record is a generic mapping
    pub fn is_mapping(&self) -> bool {
        matches!(self, Record::Mapping(_))
    }

    /// True when the record is a structured object
    pub fn is_object(&self) -> bool {
        matches!(self, Record::Object(_))
    }

    /// True when the record carries no fields (scalar or null)
    pub fn is_fieldless(&self) -> bool {
        matches!(self, Record::Scalar(_) | Record::Null)
    }

    /// Number of fields, zero for fieldless records
    pub fn len(&self) -> usize {
        match self {
            Record::Mapping(fields) => fields.len(),
            Record::Object(fields) => fields.len(),
            Record::Scalar(_) | Record::Null => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up a field value.
    ///
    /// Object records are addressed by the key's display form, so
    /// `Index(3)` finds a field named `"3"`.
    pub fn get(&self, key: &FieldKey) -> Option<&Value> {
        match self {
            Record::Mapping(fields) => fields.get(key),
            Record::Object(fields) => fields.get(&key.to_string()),
            Record::Scalar(_) | Record::Null => None,
        }
    }

    /// Main-array normalization: convert a structured object into a generic
    /// mapping of its own field names. All other shapes pass through, so one
    /// projection table works regardless of the decode mode.
    pub fn into_mapping(self) -> Record {
        match self {
            Record::Object(fields) => Record::Mapping(
                fields
                    .into_iter()
                    .map(|(name, value)| (FieldKey::Name(name), value))
                    .collect(),
            ),
            other => other,
        }
    }

    /// Convert back into a plain JSON value.
    ///
    /// A mapping whose keys are exactly the positions `0..len` rebuilds an
    /// array; any other mapping becomes an object keyed by the display form
    /// of its keys.
    pub fn into_value(self) -> Value {
        match self {
            Record::Mapping(fields) => {
                let sequential = fields
                    .keys()
                    .enumerate()
                    .all(|(position, key)| matches!(key, FieldKey::Index(index) if *index == position));
                if sequential {
                    Value::Array(fields.into_iter().map(|(_, value)| value).collect())
                } else {
                    Value::Object(
                        fields
                            .into_iter()
                            .map(|(key, value)| (key.to_string(), value))
                            .collect(),
                    )
                }
            }
            Record::Object(fields) => Value::Object(fields),
            Record::Scalar(value) => value,
            Record::Null => Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn name_mapping(pairs: &[(&str, Value)]) -> Record {
        Record::Mapping(
            pairs
                .iter()
                .map(|(k, v)| (FieldKey::from(*k), v.clone()))
                .collect(),
        )
    }

    #[test]
    fn test_field_key_display() {
        assert_eq!(FieldKey::Index(3).to_string(), "3");
        assert_eq!(FieldKey::from("name").to_string(), "name");
    }

    #[test]
    fn test_field_keys_are_typed() {
        let record = name_mapping(&[("0", json!("zero"))]);
        assert_eq!(record.get(&FieldKey::from("0")), Some(&json!("zero")));
        assert_eq!(record.get(&FieldKey::Index(0)), None);
    }

    #[test]
    fn test_into_mapping_normalizes_objects() {
        let mut fields = Map::new();
        fields.insert("a".to_string(), json!(1));
        fields.insert("b".to_string(), json!(2));
        let record = Record::Object(fields).into_mapping();

        assert!(record.is_mapping());
        assert_eq!(record.get(&FieldKey::from("a")), Some(&json!(1)));
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn test_into_mapping_passes_through_other_shapes() {
        assert_eq!(Record::Null.into_mapping(), Record::Null);
        let scalar = Record::Scalar(json!(42));
        assert_eq!(scalar.clone().into_mapping(), scalar);
    }

    #[test]
    fn test_into_value_rebuilds_sequential_arrays() {
        let record = Record::Mapping(
            [(FieldKey::Index(0), json!("a")), (FieldKey::Index(1), json!("b"))]
                .into_iter()
                .collect(),
        );
        assert_eq!(record.into_value(), json!(["a", "b"]));
    }

    #[test]
    fn test_into_value_gapped_indices_become_object() {
        let record = Record::Mapping(
            [(FieldKey::Index(0), json!("a")), (FieldKey::Index(2), json!("c"))]
                .into_iter()
                .collect(),
        );
        assert_eq!(record.into_value(), json!({"0": "a", "2": "c"}));
    }

    #[test]
    fn test_into_value_name_keys_become_object() {
        let record = name_mapping(&[("x", json!(1))]);
        assert_eq!(record.into_value(), json!({"x": 1}));
    }

    #[test]
    fn test_fieldless_records() {
        assert!(Record::Null.is_fieldless());
        assert!(Record::Scalar(json!("s")).is_fieldless());
        assert_eq!(Record::Null.len(), 0);
        assert!(Record::Scalar(json!(1)).get(&FieldKey::Index(0)).is_none());
    }
}
