//! Column-oriented dataset reading and transformation

use crate::{Result, StartupError};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::path::Path;
use viv_core::types::{FieldKind, FieldValue, Track, TrackField};

/// Column holding the row identity; every other column must match its keys
const ID_COLUMN: &str = "id";

/// Parsed dataset: column name -> (row key -> raw value), in file order
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnarDataset {
    columns: Map<String, Value>,
}

/// Read and parse a dataset file
///
/// Only the outer shape (an object of objects) is checked here; call
/// [`ColumnarDataset::validate`] for the column and key rules.
///
/// # Errors
///
/// - `FileNotFound` when `path` does not exist
/// - `Io` when the file cannot be read
/// - `Parse` / `InvalidFormat` when the content is not an object of objects
pub async fn read_dataset(path: &Path) -> Result<ColumnarDataset> {
    if !tokio::fs::try_exists(path).await.unwrap_or(false) {
        return Err(StartupError::FileNotFound(path.to_path_buf()));
    }

    let content = tokio::fs::read_to_string(path).await?;
    let dataset = ColumnarDataset::from_json(&content)?;

    tracing::debug!(
        path = %path.display(),
        columns = dataset.columns.len(),
        "Read dataset file"
    );

    Ok(dataset)
}

impl ColumnarDataset {
    /// Parse dataset content
    pub fn from_json(content: &str) -> Result<Self> {
        match serde_json::from_str::<Value>(content)? {
            Value::Object(columns) => {
                if let Some((name, _)) = columns.iter().find(|(_, rows)| !rows.is_object()) {
                    return Err(StartupError::InvalidFormat(format!(
                        "column `{}` is not an object of rows",
                        name
                    )));
                }
                Ok(Self { columns })
            }
            other => Err(StartupError::InvalidFormat(format!(
                "expected an object of columns, found {}",
                json_type(&other)
            ))),
        }
    }

    /// Rows of one column, keyed by row key
    pub fn column(&self, name: &str) -> Option<&Map<String, Value>> {
        self.columns.get(name).and_then(Value::as_object)
    }

    /// Number of rows, as defined by the `id` column
    pub fn row_count(&self) -> usize {
        self.column(ID_COLUMN).map_or(0, Map::len)
    }

    /// Check the column and key rules
    ///
    /// Every required column must be present, every column must have exactly
    /// the `id` column's keys, and every key must be a non-negative integer.
    /// A dataset whose `id` column is empty is valid and yields no tracks.
    pub fn validate(&self) -> Result<()> {
        for name in TrackField::dataset_columns() {
            if self.column(name).is_none() {
                return Err(StartupError::InvalidFormat(format!(
                    "missing required column `{}`",
                    name
                )));
            }
        }

        let ids = self
            .column(ID_COLUMN)
            .ok_or_else(|| StartupError::InvalidFormat("missing `id` column".to_string()))?;
        let id_keys: HashSet<&str> = ids.keys().map(String::as_str).collect();

        for name in TrackField::dataset_columns() {
            let Some(rows) = self.column(name) else {
                continue;
            };
            let same_keys =
                rows.len() == id_keys.len() && rows.keys().all(|key| id_keys.contains(key.as_str()));
            if !same_keys {
                return Err(StartupError::InvalidFormat(format!(
                    "column `{}` does not have the same rows as `id`",
                    name
                )));
            }
        }

        for key in ids.keys() {
            parse_row_key(key)?;
        }

        Ok(())
    }

    /// Validate, then build one unrated track per `id` row in file order
    pub fn into_tracks(self) -> Result<Vec<Track>> {
        self.validate()?;

        let Some(ids) = self.column(ID_COLUMN) else {
            return Ok(Vec::new());
        };

        let mut tracks = Vec::with_capacity(ids.len());
        for key in ids.keys() {
            let mut track = Track::unrated(parse_row_key(key)?, String::new(), String::new());

            for field in TrackField::ALL {
                let Some(name) = field.dataset_column() else {
                    continue;
                };
                let raw = self
                    .column(name)
                    .and_then(|rows| rows.get(key))
                    .unwrap_or(&Value::Null);
                track
                    .set(field, coerce(field, key, raw))
                    .map_err(|e| StartupError::InvalidFormat(e.to_string()))?;
            }

            tracks.push(track);
        }

        Ok(tracks)
    }
}

fn parse_row_key(key: &str) -> Result<i64> {
    let is_digits = !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit());
    is_digits
        .then(|| key.parse::<i64>().ok())
        .flatten()
        .ok_or_else(|| {
            StartupError::InvalidFormat(format!("row key `{}` is not a non-negative integer", key))
        })
}

/// Convert a raw cell into the column's kind
///
/// Values the column cannot hold fall back to zero.
fn coerce(field: TrackField, key: &str, raw: &Value) -> FieldValue {
    match field.kind() {
        FieldKind::Text => FieldValue::Text(match raw {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }),
        FieldKind::Integer => {
            let value = match raw {
                Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
                Value::String(s) => {
                    let s = s.trim();
                    s.parse::<i64>()
                        .ok()
                        .or_else(|| s.parse::<f64>().ok().map(|f| f.trunc() as i64))
                }
                _ => None,
            };
            FieldValue::Integer(value.unwrap_or_else(|| {
                tracing::warn!(column = %field, row = key, value = %raw, "Non-numeric value, using 0");
                0
            }))
        }
        FieldKind::Real => {
            let value = match raw {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.trim().parse::<f64>().ok(),
                _ => None,
            };
            FieldValue::Real(value.unwrap_or_else(|| {
                tracing::warn!(column = %field, row = key, value = %raw, "Non-numeric value, using 0");
                0.0
            }))
        }
    }
}

fn json_type(value: &Value) -> &'static str {
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

    fn row(id: &str, title: &str) -> Map<String, Value> {
        let mut cells = Map::new();
        for name in TrackField::dataset_columns() {
            cells.insert(name.to_string(), json!(0));
        }
        cells.insert("id".into(), json!(id));
        cells.insert("title".into(), json!(title));
        cells
    }

    fn dataset(rows: &[(&str, Map<String, Value>)]) -> ColumnarDataset {
        let mut columns = Map::new();
        for name in TrackField::dataset_columns() {
            let mut column = Map::new();
            for (key, cells) in rows {
                column.insert((*key).to_string(), cells[name].clone());
            }
            columns.insert(name.to_string(), Value::Object(column));
        }
        ColumnarDataset { columns }
    }

    #[test]
    fn rejects_non_object_documents() {
        assert!(matches!(
            ColumnarDataset::from_json("[1, 2]"),
            Err(StartupError::InvalidFormat(_))
        ));
        assert!(matches!(
            ColumnarDataset::from_json(r#"{"id": [1]}"#),
            Err(StartupError::InvalidFormat(_))
        ));
        assert!(matches!(
            ColumnarDataset::from_json("not json"),
            Err(StartupError::Parse(_))
        ));
    }

    #[test]
    fn missing_column_is_invalid() {
        let mut data = dataset(&[("0", row("a", "3AM"))]);
        data.columns.remove("valence");

        let err = data.validate().unwrap_err();
        assert!(err.to_string().contains("valence"));
    }

    #[test]
    fn mismatched_keys_are_invalid_even_with_equal_counts() {
        let mut data = dataset(&[("0", row("a", "3AM")), ("1", row("b", "4 Walls"))]);
        data.columns["tempo"] = json!({ "0": 1.0, "7": 2.0 });

        assert!(matches!(data.validate(), Err(StartupError::InvalidFormat(_))));
    }

    #[test]
    fn non_numeric_keys_are_invalid() {
        let data = dataset(&[("first", row("a", "3AM"))]);
        assert!(matches!(data.validate(), Err(StartupError::InvalidFormat(_))));

        let data = dataset(&[("-1", row("a", "3AM"))]);
        assert!(matches!(data.validate(), Err(StartupError::InvalidFormat(_))));
    }

    #[test]
    fn empty_id_column_is_valid() {
        let data = dataset(&[]);
        assert!(data.validate().is_ok());
        assert_eq!(data.row_count(), 0);
        assert!(data.into_tracks().unwrap().is_empty());
    }

    #[test]
    fn tracks_follow_file_order() {
        let data = dataset(&[
            ("2", row("c", "Walls Come Down")),
            ("0", row("a", "3AM")),
            ("1", row("b", "4 Walls")),
        ]);

        let tracks = data.into_tracks().unwrap();
        let idxs: Vec<_> = tracks.iter().map(|t| t.idx).collect();
        assert_eq!(idxs, vec![2, 0, 1]);
        assert!(tracks.iter().all(|t| !t.is_rated()));
    }

    #[test]
    fn values_are_coerced_to_column_kinds() {
        let mut cells = row("a", "3AM");
        cells.insert("duration_ms".into(), json!(225_947.9));
        cells.insert("key".into(), json!("8"));
        cells.insert("tempo".into(), json!("108.5"));
        cells.insert("mode".into(), json!(true));
        cells.insert("energy".into(), json!(null));

        let tracks = dataset(&[("0", cells)]).into_tracks().unwrap();
        let track = &tracks[0];

        assert_eq!(track.duration, 225_947);
        assert_eq!(track.key, 8);
        assert_eq!(track.tempo, 108.5);
        assert_eq!(track.mode, 0);
        assert_eq!(track.energy, 0.0);
    }

    #[test]
    fn text_columns_stringify_other_values() {
        let mut cells = row("a", "ignored");
        cells.insert("title".into(), json!(1999));

        let tracks = dataset(&[("0", cells)]).into_tracks().unwrap();
        assert_eq!(tracks[0].title, "1999");
    }
}
