use std::path::PathBuf;

use serde_json::Value;
use tracing::debug;

use crate::errors::AppError;
use crate::models::config::FormatterConfig;
use crate::models::record::{Dataset, Record};
use crate::utils::export::render_json;

/// Where a dictionary-of-records document comes from.
#[derive(Debug, Clone)]
pub enum DataSource {
    /// A JSON file on disk.
    Path(PathBuf),
    /// An already-parsed document.
    Value(Value),
}

impl DataSource {
    pub fn load(self) -> Result<Dataset, AppError> {
        match self {
            DataSource::Path(path) => Dataset::from_path(&path),
            DataSource::Value(value) => Dataset::from_value(value),
        }
    }
}

impl From<PathBuf> for DataSource {
    fn from(path: PathBuf) -> Self {
        DataSource::Path(path)
    }
}

impl From<Value> for DataSource {
    fn from(value: Value) -> Self {
        DataSource::Value(value)
    }
}

/// Flatten a dictionary of records into a list, dropping the keys.
///
/// With `convert_time`, each record's date field is cut to whole seconds
/// first. Records keep the document order.
pub fn to_records(
    source: DataSource,
    convert_time: bool,
    date_field: &str,
) -> Result<Vec<Record>, AppError> {
    let mut dataset = source.load()?;
    if convert_time {
        let changed = truncate_dates(&mut dataset, date_field)?;
        debug!("Truncated {} of {} timestamps", changed, dataset.len());
    }
    Ok(dataset.into_records())
}

/// [`to_records`], serialized as a JSON array in the configured layout.
pub fn to_r_json(
    source: DataSource,
    convert_time: bool,
    config: &FormatterConfig,
) -> Result<String, AppError> {
    let records = to_records(source, convert_time, &config.date_field)?;
    render_json(&records, config.format)
}

/// Cut every record's `field` down to the text before its first `.`.
///
/// A `null` value is left alone. A missing field or a non-string value is
/// an error. Returns how many values changed.
pub fn truncate_dates(dataset: &mut Dataset, field: &str) -> Result<usize, AppError> {
    let mut changed = 0;
    for (key, record) in dataset.iter_mut() {
        match record.get_mut(field) {
            Some(Value::String(ts)) => {
                let keep = truncate_timestamp(ts).len();
                if keep < ts.len() {
                    ts.truncate(keep);
                    changed += 1;
                }
            }
            Some(Value::Null) => {}
            Some(_) => {
                return Err(AppError::InvalidFieldType {
                    key: key.to_string(),
                    field: field.to_string(),
                    expected: "a string",
                })
            }
            None => {
                return Err(AppError::MissingField {
                    key: key.to_string(),
                    field: field.to_string(),
                })
            }
        }
    }
    Ok(changed)
}

/// `2023-03-04T09:10:00.123456` -> `2023-03-04T09:10:00`.
pub fn truncate_timestamp(ts: &str) -> &str {
    match ts.find('.') {
        Some(pos) => &ts[..pos],
        None => ts,
    }
}
