use std::path::Path;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::errors::AppError;

/// One product's field-value data at a point in time.
///
/// Field order is the order in which fields were first inserted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn get_mut(&mut self, field: &str) -> Option<&mut Value> {
        self.0.get_mut(field)
    }

    /// Insert or replace a field. Replacing keeps the field's position.
    pub fn insert(&mut self, field: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(field.into(), value)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Append every variable of `vars` this record lacks, set to `null`.
    ///
    /// Existing fields keep their value and position; new fields follow in
    /// the order of `vars`. Returns how many fields were added.
    pub fn backfill(&mut self, vars: &VariableSet) -> usize {
        let mut added = 0;
        for name in vars.iter() {
            if !self.contains(name) {
                self.0.insert(name.to_string(), Value::Null);
                added += 1;
            }
        }
        added
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Record(map)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Object(record.0)
    }
}

/// A dictionary of records keyed by an opaque identifier, as produced by the
/// scraper. Identifier order is the document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    entries: Vec<(String, Record)>,
}

impl Dataset {
    /// Build a dataset from a parsed JSON document.
    ///
    /// The document must be an object whose values are all objects.
    pub fn from_value(value: Value) -> Result<Self, AppError> {
        let map = match value {
            Value::Object(map) => map,
            other => {
                return Err(AppError::NotADataset(format!(
                    "expected a JSON object at the top level, found {}",
                    json_kind(&other)
                )))
            }
        };

        let mut entries = Vec::with_capacity(map.len());
        for (id, record) in map {
            match record {
                Value::Object(fields) => entries.push((id, Record::from(fields))),
                other => {
                    return Err(AppError::NotADataset(format!(
                        "value of key '{}' is {}, expected an object",
                        id,
                        json_kind(&other)
                    )))
                }
            }
        }
        Ok(Dataset { entries })
    }

    /// Read and parse a dataset file.
    pub fn from_path(path: &Path) -> Result<Self, AppError> {
        if !path.exists() {
            return Err(AppError::FileNotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::FileRead(format!("{}: {}", path.display(), e)))?;
        let value: Value = serde_json::from_str(&content).map_err(|e| AppError::InvalidJson {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_value(value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(id, _)| id.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Record)> {
        self.entries.iter().map(|(id, r)| (id.as_str(), r))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut Record)> {
        self.entries.iter_mut().map(|(id, r)| (id.as_str(), r))
    }

    /// Drop the identifiers, keeping the records in document order.
    pub fn into_records(self) -> Vec<Record> {
        self.entries.into_iter().map(|(_, r)| r).collect()
    }
}

impl Serialize for Dataset {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, record) in &self.entries {
            map.serialize_entry(id, record)?;
        }
        map.end()
    }
}

/// Ordered, duplicate-free union of field names seen across records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct VariableSet {
    names: Vec<String>,
}

impl VariableSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a name if not yet present. Returns true when it was new.
    pub fn insert(&mut self, name: &str) -> bool {
        if self.contains(name) {
            return false;
        }
        self.names.push(name.to_string());
        true
    }

    /// Add every field of `record`, in the record's field order.
    pub fn observe(&mut self, record: &Record) {
        for field in record.fields() {
            self.insert(field);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Names in this set that `record` does not have.
    pub fn missing_from(&self, record: &Record) -> Vec<&str> {
        self.iter().filter(|name| !record.contains(name)).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => Record::from(map),
            _ => panic!("test record must be an object"),
        }
    }

    #[test]
    fn test_dataset_preserves_document_order() {
        let ds = Dataset::from_value(json!({
            "b": {"sku": "B"},
            "a": {"sku": "A"},
            "c": {"sku": "C"},
        }))
        .unwrap();
        let ids: Vec<&str> = ds.ids().collect();
        assert_eq!(ids, vec!["b", "a", "c"]);

        let skus: Vec<Value> = ds
            .into_records()
            .into_iter()
            .map(|r| r.get("sku").cloned().unwrap())
            .collect();
        assert_eq!(skus, vec![json!("B"), json!("A"), json!("C")]);
    }

    #[test]
    fn test_dataset_rejects_array_root() {
        let err = Dataset::from_value(json!([{"sku": "A"}])).unwrap_err();
        assert!(matches!(err, AppError::NotADataset(_)));
        assert!(err.to_string().contains("an array"));
    }

    #[test]
    fn test_dataset_rejects_scalar_record() {
        let err = Dataset::from_value(json!({"1": {"sku": "A"}, "2": 7})).unwrap_err();
        assert!(err.to_string().contains("'2'"));
    }

    #[test]
    fn test_dataset_serializes_as_object() {
        let ds = Dataset::from_value(json!({"x": {"a": 1}, "y": {"a": 2}})).unwrap();
        let text = serde_json::to_string(&ds).unwrap();
        assert_eq!(text, r#"{"x":{"a":1},"y":{"a":2}}"#);
    }

    #[test]
    fn test_dataset_from_missing_path() {
        let err = Dataset::from_path(Path::new("/definitely/not/here.json")).unwrap_err();
        assert_eq!(err.code(), "FILE_NOT_FOUND");
    }

    #[test]
    fn test_dataset_from_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{\"1\": {").unwrap();
        let err = Dataset::from_path(&path).unwrap_err();
        assert_eq!(err.code(), "INVALID_JSON");
    }

    #[test]
    fn test_duplicate_ids_keep_last_record_at_first_position() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dupes.json");
        std::fs::write(
            &path,
            r#"{"1": {"date": "a.1", "sku": "A"}, "2": {"date": "b"}, "1": {"date": "c.3", "sku": "C"}}"#,
        )
        .unwrap();

        let ds = Dataset::from_path(&path).unwrap();
        let ids: Vec<&str> = ds.ids().collect();
        assert_eq!(ids, vec!["1", "2"]);

        let records = ds.into_records();
        assert_eq!(records[0].get("sku"), Some(&json!("C")));
        assert_eq!(records[0].get("date"), Some(&json!("c.3")));
        assert_eq!(records[1].get("date"), Some(&json!("b")));
    }

    #[test]
    fn test_variable_set_first_seen_order() {
        let mut vars = VariableSet::new();
        vars.observe(&record(json!({"sku": "A", "date": "d"})));
        vars.observe(&record(json!({"price": 5, "sku": "B"})));
        let names: Vec<&str> = vars.iter().collect();
        assert_eq!(names, vec!["sku", "date", "price"]);
        assert!(!vars.insert("sku"));
    }

    #[test]
    fn test_backfill_appends_nulls_and_keeps_values() {
        let mut vars = VariableSet::new();
        vars.insert("price");
        vars.insert("sku");
        vars.insert("stock");

        let mut r = record(json!({"sku": "A"}));
        assert_eq!(vars.missing_from(&r), vec!["price", "stock"]);

        let added = r.backfill(&vars);
        assert_eq!(added, 2);
        assert_eq!(
            Value::from(r.clone()),
            json!({"sku": "A", "price": null, "stock": null})
        );
        let fields: Vec<&str> = r.fields().collect();
        assert_eq!(fields, vec!["sku", "price", "stock"]);

        assert_eq!(r.backfill(&vars), 0);
    }
}
