// SPDX-License-Identifier: MIT
//! Alias projection: ordered rename/filter transform over decoded records

use indexmap::IndexMap;
use serde_json::Map;

use crate::record::{FieldKey, Record};

/// Ordered table of original field key to output field key.
///
/// Fields not listed in the table are dropped from projected records. A
/// present field whose value is `null` is also dropped; this mirrors the
/// presence check the transform is built on and can be reverted per table
/// with [`Projection::keep_nulls`].
///
/// An empty table is a valid table: it projects every record to an empty one.
/// "No projection at all" is expressed by not setting a table on the reader.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Projection {
    entries: IndexMap<FieldKey, FieldKey>,
    keep_nulls: bool,
}

impl Projection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rename `original` to `output` in projected records.
    ///
    /// Re-mapping the same original key replaces the earlier entry.
    pub fn map(mut self, original: impl Into<FieldKey>, output: impl Into<FieldKey>) -> Self {
        self.entries.insert(original.into(), output.into());
        self
    }

    /// Keep `original` in projected records under its own key
    pub fn keep(mut self, original: impl Into<FieldKey>) -> Self {
        let key = original.into();
        self.entries.insert(key.clone(), key);
        self
    }

    /// Copy present `null` fields instead of dropping them
    pub fn keep_nulls(mut self, keep: bool) -> Self {
        self.keep_nulls = keep;
        self
    }

    pub fn entries(&self) -> &IndexMap<FieldKey, FieldKey> {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Apply the table to one record, preserving its shape.
    ///
    /// Mapping records project to mappings and object records to objects,
    /// with output fields in table insertion order. Scalar and null records
    /// pass through unchanged.
    pub fn project(&self, record: &Record) -> Record {
        match record {
            Record::Mapping(fields) => {
                let mut projected = IndexMap::new();
                for (original, output) in &self.entries {
                    if let Some(value) = fields.get(original) {
                        if self.keep_nulls || !value.is_null() {
                            projected.insert(output.clone(), value.clone());
                        }
                    }
                }
                Record::Mapping(projected)
            }
            Record::Object(fields) => {
                let mut projected = Map::new();
                for (original, output) in &self.entries {
                    if let Some(value) = fields.get(&original.to_string()) {
                        if self.keep_nulls || !value.is_null() {
                            projected.insert(output.to_string(), value.clone());
                        }
                    }
                }
                Record::Object(projected)
            }
            fieldless => fieldless.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{decode, DecodeOptions};
    use serde_json::{json, Value};

    fn mapping(line: &str) -> Record {
        let options = DecodeOptions {
            structured: false,
            ..DecodeOptions::default()
        };
        decode(line, &options).unwrap()
    }

    fn object(line: &str) -> Record {
        decode(line, &DecodeOptions::default()).unwrap()
    }

    #[test]
    fn test_rename_and_filter() {
        let table = Projection::new().map("a", "x").map("b", "y");
        let projected = table.project(&mapping(r#"{"a":1,"b":2,"c":3}"#));

        assert_eq!(projected.get(&FieldKey::from("x")), Some(&json!(1)));
        assert_eq!(projected.get(&FieldKey::from("y")), Some(&json!(2)));
        assert_eq!(projected.len(), 2);
    }

    #[test]
    fn test_null_fields_are_dropped() {
        let table = Projection::new().map("a", "x").map("b", "y");
        let projected = table.project(&mapping(r#"{"a":3,"b":null}"#));

        assert_eq!(projected.get(&FieldKey::from("x")), Some(&json!(3)));
        assert_eq!(projected.get(&FieldKey::from("y")), None);
        assert_eq!(projected.len(), 1);
    }

    #[test]
    fn test_keep_nulls_opt_in() {
        let table = Projection::new().map("a", "x").map("b", "y").keep_nulls(true);
        let projected = table.project(&mapping(r#"{"a":3,"b":null}"#));

        assert_eq!(projected.get(&FieldKey::from("y")), Some(&Value::Null));
    }

    #[test]
    fn test_missing_fields_are_dropped() {
        let table = Projection::new().keep("a").keep("missing");
        let projected = table.project(&mapping(r#"{"a":1}"#));
        assert_eq!(projected.len(), 1);
    }

    #[test]
    fn test_identity_table_drops_only_nulls() {
        let table = Projection::new().keep("a").keep("b").keep("c");
        let projected = table.project(&mapping(r#"{"a":1,"b":null,"c":3}"#));

        assert_eq!(projected, mapping(r#"{"a":1,"c":3}"#));
    }

    #[test]
    fn test_object_shape_is_preserved() {
        let table = Projection::new().map("a", "x");
        let projected = table.project(&object(r#"{"a":1,"b":2}"#));

        assert!(projected.is_object());
        assert_eq!(projected.get(&FieldKey::from("x")), Some(&json!(1)));
        assert_eq!(projected.len(), 1);
    }

    #[test]
    fn test_positional_columns() {
        let table = Projection::new().map(0usize, "first").keep(2usize);
        let projected = table.project(&mapping(r#"["a","b","c"]"#));

        assert_eq!(projected.get(&FieldKey::from("first")), Some(&json!("a")));
        assert_eq!(projected.get(&FieldKey::Index(2)), Some(&json!("c")));
        assert_eq!(projected.len(), 2);
    }

    #[test]
    fn test_output_order_follows_table_order() {
        let table = Projection::new().map("b", "y").map("a", "x");
        let projected = table.project(&mapping(r#"{"a":1,"b":2}"#));

        match projected {
            Record::Mapping(fields) => {
                let keys: Vec<String> = fields.keys().map(|k| k.to_string()).collect();
                assert_eq!(keys, vec!["y", "x"]);
            }
            other => panic!("expected mapping, got {other:?}"),
        }
    }

    #[test]
    fn test_fieldless_records_pass_through() {
        let table = Projection::new().keep("a");
        assert_eq!(table.project(&Record::Null), Record::Null);
        assert_eq!(
            table.project(&Record::Scalar(json!("s"))),
            Record::Scalar(json!("s"))
        );
    }

    #[test]
    fn test_empty_table_projects_to_empty() {
        let table = Projection::new();
        let projected = table.project(&mapping(r#"{"a":1}"#));
        assert!(projected.is_empty());
        assert!(projected.is_mapping());
    }
}
