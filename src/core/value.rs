//! Structured values produced by loaders and consumed by validators.
//!
//! Validators never guess whether a value is a table; instead
//! the loaders produce one variant of a closed enum and validators pattern
//! match on it:
//! - `Tabular`: delimited text with a header row
//! - `Hierarchical`: JSON objects and arrays
//! - `Scalar`: a bare JSON string, number or boolean
//! - `Missing`: an explicit JSON `null`

use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use std::borrow::Cow;
use std::fmt;

/// Ordered parameters of a validation rule.
pub type Params = IndexMap<String, JsonValue>;

/// Ordered free-form details attached to a validation result.
pub type Details = IndexMap<String, JsonValue>;

/// A single table cell. `None` marks a missing value.
pub type Cell = Option<String>;

/// Tokens treated as a missing value when reading delimited text.
pub const MISSING_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Whether a raw text cell denotes a missing value.
pub fn is_missing_token(raw: &str) -> bool {
    MISSING_TOKENS.contains(&raw)
}

/// Column-oriented view of tabular data.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Create a table. Rows shorter than the header are padded with missing
    /// cells; longer rows are truncated.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, None);
                row
            })
            .collect();
        Self { columns, rows }
    }

    /// A table with neither columns nor rows.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Column names in file order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Data rows (header excluded).
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.row_count(), self.column_count())
    }

    /// A table is empty when either axis has length zero.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.columns.is_empty()
    }

    /// Position of a column by name (first match).
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Number of missing cells in a column, or `None` if the column is absent.
    pub fn missing_count(&self, name: &str) -> Option<usize> {
        let index = self.column_index(name)?;
        Some(self.rows.iter().filter(|row| row[index].is_none()).count())
    }
}

/// A loaded artifact.
#[derive(Debug, Clone, PartialEq)]
pub enum StructuredValue {
    /// Delimited text with a header row.
    Tabular(Table),
    /// A JSON object or array.
    Hierarchical(JsonValue),
    /// A JSON string, number or boolean.
    Scalar(JsonValue),
    /// JSON `null`.
    Missing,
}

impl StructuredValue {
    /// Wrap a parsed JSON document in the matching variant.
    pub fn from_json(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => StructuredValue::Missing,
            JsonValue::Object(_) | JsonValue::Array(_) => StructuredValue::Hierarchical(value),
            scalar => StructuredValue::Scalar(scalar),
        }
    }

    /// Short name of the variant, used in result messages.
    pub fn kind(&self) -> &'static str {
        match self {
            StructuredValue::Tabular(_) => "table",
            StructuredValue::Hierarchical(JsonValue::Array(_)) => "array",
            StructuredValue::Hierarchical(_) => "object",
            StructuredValue::Scalar(_) => "scalar",
            StructuredValue::Missing => "null",
        }
    }

    /// Emptiness by each variant's own notion.
    ///
    /// Scalars are never empty; `Missing` always is.
    pub fn is_empty(&self) -> bool {
        match self {
            StructuredValue::Tabular(table) => table.is_empty(),
            StructuredValue::Hierarchical(JsonValue::Object(map)) => map.is_empty(),
            StructuredValue::Hierarchical(JsonValue::Array(items)) => items.is_empty(),
            StructuredValue::Hierarchical(_) | StructuredValue::Scalar(_) => false,
            StructuredValue::Missing => true,
        }
    }

    /// Number of top-level entries for hierarchical values.
    pub fn len(&self) -> Option<usize> {
        match self {
            StructuredValue::Hierarchical(JsonValue::Object(map)) => Some(map.len()),
            StructuredValue::Hierarchical(JsonValue::Array(items)) => Some(items.len()),
            _ => None,
        }
    }

    /// Column names, if the value has a column concept.
    ///
    /// Objects expose their keys; non-empty arrays of objects expose the union
    /// of record keys in first-seen order.
    pub fn columns(&self) -> Option<Vec<String>> {
        match self {
            StructuredValue::Tabular(table) => Some(table.columns().to_vec()),
            StructuredValue::Hierarchical(JsonValue::Object(map)) => {
                Some(map.keys().cloned().collect())
            }
            StructuredValue::Hierarchical(JsonValue::Array(items)) => {
                if items.is_empty() || !items.iter().all(JsonValue::is_object) {
                    return None;
                }
                Some(record_keys(items))
            }
            _ => None,
        }
    }

    /// `(rows, cols)`, if the value has a shape.
    pub fn shape(&self) -> Option<(usize, usize)> {
        match self {
            StructuredValue::Tabular(table) => Some(table.shape()),
            StructuredValue::Hierarchical(JsonValue::Object(map)) => {
                if map.values().all(JsonValue::is_array) {
                    let rows = map
                        .values()
                        .filter_map(JsonValue::as_array)
                        .map(Vec::len)
                        .max()
                        .unwrap_or(0);
                    Some((rows, map.len()))
                } else {
                    Some((1, map.len()))
                }
            }
            StructuredValue::Hierarchical(JsonValue::Array(items)) => {
                if items.is_empty() {
                    Some((0, 0))
                } else if items.iter().all(JsonValue::is_object) {
                    Some((items.len(), record_keys(items).len()))
                } else {
                    Some((items.len(), 1))
                }
            }
            _ => None,
        }
    }

    /// Tabular view of the value.
    ///
    /// Tables are borrowed. Record-shaped JSON converts: an object of equally
    /// long arrays (column-oriented), a single flat object (one row), or a
    /// non-empty array of objects (row-oriented). JSON `null` cells are
    /// missing. Anything else has no tabular view.
    pub fn as_table(&self) -> Option<Cow<'_, Table>> {
        match self {
            StructuredValue::Tabular(table) => Some(Cow::Borrowed(table)),
            StructuredValue::Hierarchical(JsonValue::Object(map)) => {
                let columns: Vec<String> = map.keys().cloned().collect();
                if !map.is_empty() && map.values().all(JsonValue::is_array) {
                    let arrays: Vec<&Vec<JsonValue>> =
                        map.values().filter_map(JsonValue::as_array).collect();
                    let height = arrays[0].len();
                    if arrays.iter().any(|a| a.len() != height) {
                        return None;
                    }
                    let rows = (0..height)
                        .map(|i| arrays.iter().map(|a| json_cell(&a[i])).collect())
                        .collect();
                    Some(Cow::Owned(Table::new(columns, rows)))
                } else {
                    let row = map.values().map(json_cell).collect();
                    Some(Cow::Owned(Table::new(columns, vec![row])))
                }
            }
            StructuredValue::Hierarchical(JsonValue::Array(items)) => {
                if items.is_empty() || !items.iter().all(JsonValue::is_object) {
                    return None;
                }
                let columns = record_keys(items);
                let rows = items
                    .iter()
                    .filter_map(JsonValue::as_object)
                    .map(|record| {
                        columns
                            .iter()
                            .map(|c| record.get(c).and_then(json_cell))
                            .collect()
                    })
                    .collect();
                Some(Cow::Owned(Table::new(columns, rows)))
            }
            _ => None,
        }
    }
}

impl fmt::Display for StructuredValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.shape() {
            Some((rows, cols)) => write!(f, "{} ({}x{})", self.kind(), rows, cols),
            None => write!(f, "{}", self.kind()),
        }
    }
}

fn record_keys(items: &[JsonValue]) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    for record in items.iter().filter_map(JsonValue::as_object) {
        for key in record.keys() {
            if !keys.contains(key) {
                keys.push(key.clone());
            }
        }
    }
    keys
}

fn json_cell(value: &JsonValue) -> Cell {
    match value {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cells(values: &[&str]) -> Vec<Cell> {
        values.iter().map(|v| Some(v.to_string())).collect()
    }

    #[test]
    fn test_table_padding_and_shape() {
        let table = Table::new(
            vec!["a".into(), "b".into(), "c".into()],
            vec![cells(&["1", "2", "3"]), cells(&["4"])],
        );
        assert_eq!(table.shape(), (2, 3));
        assert_eq!(table.rows()[1], vec![Some("4".to_string()), None, None]);
        assert_eq!(table.missing_count("b"), Some(1));
        assert_eq!(table.missing_count("zzz"), None);
    }

    #[test]
    fn test_header_only_table_is_empty() {
        let table = Table::new(vec!["a".into()], Vec::new());
        assert!(table.is_empty());
        assert!(StructuredValue::Tabular(table).is_empty());
        assert!(StructuredValue::Tabular(Table::empty()).is_empty());
    }

    #[test]
    fn test_from_json_variants() {
        assert_eq!(StructuredValue::from_json(json!(null)), StructuredValue::Missing);
        assert_eq!(StructuredValue::from_json(json!(3)).kind(), "scalar");
        assert_eq!(StructuredValue::from_json(json!([1])).kind(), "array");
        assert_eq!(StructuredValue::from_json(json!({"a": 1})).kind(), "object");
    }

    #[test]
    fn test_emptiness() {
        assert!(StructuredValue::from_json(json!({})).is_empty());
        assert!(StructuredValue::from_json(json!([])).is_empty());
        assert!(StructuredValue::Missing.is_empty());
        assert!(!StructuredValue::from_json(json!("")).is_empty());
        assert!(!StructuredValue::from_json(json!({"a": []})).is_empty());
    }

    #[test]
    fn test_columns_of_records() {
        let value = StructuredValue::from_json(json!([{"id": 1}, {"id": 2, "score": 0.5}]));
        assert_eq!(value.columns(), Some(vec!["id".to_string(), "score".to_string()]));
        assert_eq!(value.shape(), Some((2, 2)));

        let mixed = StructuredValue::from_json(json!([{"id": 1}, 7]));
        assert_eq!(mixed.columns(), None);
        assert_eq!(mixed.shape(), Some((2, 1)));

        assert_eq!(StructuredValue::from_json(json!([])).columns(), None);
        assert_eq!(StructuredValue::from_json(json!(true)).columns(), None);
    }

    #[test]
    fn test_object_shapes() {
        let columnar = StructuredValue::from_json(json!({"a": [1, 2, 3], "b": [4]}));
        assert_eq!(columnar.shape(), Some((3, 2)));

        let record = StructuredValue::from_json(json!({"a": 1, "b": "x"}));
        assert_eq!(record.shape(), Some((1, 2)));

        assert_eq!(StructuredValue::from_json(json!({})).shape(), Some((0, 0)));
        assert_eq!(StructuredValue::from_json(json!(1.5)).shape(), None);
    }

    #[test]
    fn test_as_table_conversions() {
        let columnar = StructuredValue::from_json(json!({"a": [1, null], "b": ["x", "y"]}));
        let table = columnar.as_table().expect("columnar object converts");
        assert_eq!(table.shape(), (2, 2));
        assert_eq!(table.missing_count("a"), Some(1));

        let ragged = StructuredValue::from_json(json!({"a": [1, 2], "b": [1]}));
        assert!(ragged.as_table().is_none());

        let records = StructuredValue::from_json(json!([{"a": 1}, {"b": 2}]));
        let table = records.as_table().expect("records convert");
        assert_eq!(table.missing_count("a"), Some(1));
        assert_eq!(table.missing_count("b"), Some(1));

        assert!(StructuredValue::from_json(json!([1, 2])).as_table().is_none());
        assert!(StructuredValue::Missing.as_table().is_none());
    }

    #[test]
    fn test_missing_tokens() {
        assert!(is_missing_token(""));
        assert!(is_missing_token("NA"));
        assert!(is_missing_token("nan"));
        assert!(!is_missing_token("0"));
        assert!(!is_missing_token(" NA"));
    }
}
