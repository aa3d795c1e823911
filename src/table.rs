//! In-memory tables of named columns with an integer row index.

use crate::error::{HypeError, Result};
use serde::Deserialize;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;

/// A single cell.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Float(f64),
    Text(String),
    Missing,
}

impl Value {
    /// Infers the narrowest value type for a raw text cell.
    pub fn parse(raw: &str) -> Value {
        let cell = raw.trim();
        if cell.is_empty() {
            Value::Missing
        } else if let Ok(i) = cell.parse::<i64>() {
            Value::Int(i)
        } else if let Ok(f) = cell.parse::<f64>() {
            Value::Float(f)
        } else {
            Value::Text(cell.to_string())
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) if !f.is_nan() => Some(*f),
            _ => None,
        }
    }

    /// Integer form used for identifiers. Floats are accepted only when they
    /// carry no fractional part.
    pub fn as_identifier(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            // `as` would saturate, so only floats inside the i64 range convert
            Value::Float(f)
                if f.fract() == 0.0 && (i64::MIN as f64..i64::MAX as f64).contains(f) =>
            {
                Some(*f as i64)
            }
            Value::Text(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(v) if v.is_nan() => Ok(()),
            // integral floats keep a trailing ".0" so they read back as floats
            Value::Float(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e16 => {
                write!(f, "{v:.1}")
            }
            Value::Float(v) => write!(f, "{v}"),
            Value::Text(s) => f.write_str(s),
            Value::Missing => Ok(()),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<Value>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Column {
            name: name.into(),
            values,
        }
    }
}

/// Ordered collection of equal-length columns plus a row index.
///
/// A freshly built table is indexed `0..n`. [`Table::set_index`] replaces the
/// index with the integer values of an identifier column.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    index: Vec<i64>,
    columns: Vec<Column>,
}

impl Table {
    /// Creates a table with `rows` rows and no columns.
    pub fn with_rows(rows: usize) -> Self {
        Table {
            index: (0..rows as i64).collect(),
            columns: Vec::new(),
        }
    }

    pub fn from_columns(columns: Vec<Column>) -> Result<Self> {
        let rows = columns.first().map_or(0, |c| c.values.len());
        let mut table = Table::with_rows(rows);
        for column in columns {
            table.push_column(column)?;
        }
        Ok(table)
    }

    pub fn n_rows(&self) -> usize {
        self.index.len()
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn index(&self) -> &[i64] {
        &self.index
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn push_column(&mut self, column: Column) -> Result<()> {
        if column.values.len() != self.n_rows() {
            return Err(HypeError::RaggedColumn {
                column: column.name,
                expected: self.n_rows(),
                actual: column.values.len(),
            });
        }
        if self.has_column(&column.name) {
            return Err(HypeError::DuplicateColumn(column.name));
        }
        self.columns.push(column);
        Ok(())
    }

    /// Appends a column holding the same value on every row.
    pub fn push_constant(&mut self, name: &str, value: Value) -> Result<()> {
        let values = vec![value; self.n_rows()];
        self.push_column(Column::new(name, values))
    }

    pub fn rename_column(&mut self, from: &str, to: &str) -> Result<()> {
        if from == to {
            return Ok(());
        }
        if self.has_column(to) {
            return Err(HypeError::DuplicateColumn(to.to_string()));
        }
        let pos = self
            .position(from)
            .ok_or_else(|| HypeError::MissingColumn(from.to_string()))?;
        self.columns[pos].name = to.to_string();
        Ok(())
    }

    /// Applies all `(from, to)` renames at once, so swaps and chains behave
    /// as a single mapping. The resulting names must be unique.
    pub fn rename_columns(&mut self, renames: &[(String, String)]) -> Result<()> {
        let mut names = self.column_names();
        for (from, to) in renames {
            let pos = self
                .position(from)
                .ok_or_else(|| HypeError::MissingColumn(from.clone()))?;
            names[pos] = to.clone();
        }
        let mut seen = HashSet::new();
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(HypeError::DuplicateColumn(name.clone()));
            }
        }
        for (column, name) in self.columns.iter_mut().zip(names) {
            column.name = name;
        }
        Ok(())
    }

    pub fn drop_column(&mut self, name: &str) -> Result<Column> {
        let pos = self
            .position(name)
            .ok_or_else(|| HypeError::MissingColumn(name.to_string()))?;
        Ok(self.columns.remove(pos))
    }

    /// Keeps only `names`, in that order. The index is carried over.
    pub fn select<S: AsRef<str>>(mut self, names: &[S]) -> Result<Table> {
        let mut seen = HashSet::new();
        let mut columns = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            if !seen.insert(name) {
                return Err(HypeError::DuplicateColumn(name.to_string()));
            }
            let pos = self
                .position(name)
                .ok_or_else(|| HypeError::MissingColumn(name.to_string()))?;
            columns.push(std::mem::replace(
                &mut self.columns[pos],
                Column::new(String::new(), Vec::new()),
            ));
        }
        Ok(Table {
            index: self.index,
            columns,
        })
    }

    /// Moves `column` out of the data columns into the row index and sorts
    /// the rows by it.
    pub fn set_index(&mut self, column: &str) -> Result<()> {
        let id = self.drop_column(column)?;
        let index = id
            .values
            .iter()
            .enumerate()
            .map(|(row, value)| {
                value
                    .as_identifier()
                    .ok_or_else(|| HypeError::InvalidIdentifier {
                        column: column.to_string(),
                        row,
                        value: value.to_string(),
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        self.index = index;
        self.sort_by_index();
        Ok(())
    }

    /// Stable ascending sort of the rows by index value.
    pub fn sort_by_index(&mut self) {
        let mut order: Vec<usize> = (0..self.n_rows()).collect();
        order.sort_by_key(|&row| self.index[row]);
        self.permute(&order);
    }

    /// Stable ascending sort of the rows by a numeric column. Missing values
    /// sort last.
    pub fn sort_by_column(&mut self, name: &str) -> Result<()> {
        let column = self
            .column(name)
            .ok_or_else(|| HypeError::MissingColumn(name.to_string()))?;
        let keys = column
            .values
            .iter()
            .enumerate()
            .map(|(row, value)| match value {
                Value::Missing => Ok(None),
                Value::Float(f) if f.is_nan() => Ok(None),
                other => other
                    .as_f64()
                    .map(Some)
                    .ok_or_else(|| HypeError::NonNumericSortKey {
                        column: name.to_string(),
                        row,
                        value: other.to_string(),
                    }),
            })
            .collect::<Result<Vec<Option<f64>>>>()?;

        let mut order: Vec<usize> = (0..self.n_rows()).collect();
        order.sort_by(|&a, &b| match (keys[a], keys[b]) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        self.permute(&order);
        Ok(())
    }

    /// Replaces the index with `0..n`.
    pub fn reset_index(&mut self) {
        self.index = (0..self.n_rows() as i64).collect();
    }

    fn permute(&mut self, order: &[usize]) {
        self.index = order.iter().map(|&row| self.index[row]).collect();
        for column in &mut self.columns {
            column.values = order.iter().map(|&row| column.values[row].clone()).collect();
        }
    }

    /// Concatenates tables column-wise. The caller is responsible for the
    /// tables sharing one index; the first table's index is kept.
    pub fn hstack(tables: Vec<Table>) -> Result<Table> {
        let mut iter = tables.into_iter();
        let Some(mut merged) = iter.next() else {
            return Ok(Table::with_rows(0));
        };
        for table in iter {
            for column in table.columns {
                merged.push_column(column)?;
            }
        }
        Ok(merged)
    }

    /// Iterates rows as vectors of cell references.
    pub fn rows(&self) -> impl Iterator<Item = Vec<&Value>> + '_ {
        (0..self.n_rows()).map(move |row| self.columns.iter().map(|c| &c.values[row]).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(values: &[i64]) -> Vec<Value> {
        values.iter().copied().map(Value::Int).collect()
    }

    #[test]
    fn test_parse_infers_types() {
        assert_eq!(Value::parse("12"), Value::Int(12));
        assert_eq!(Value::parse(" 2.5 "), Value::Float(2.5));
        assert_eq!(Value::parse("loam"), Value::Text("loam".into()));
        assert_eq!(Value::parse(""), Value::Missing);
    }

    #[test]
    fn test_display_keeps_float_marker() {
        assert_eq!(Value::Float(3.0).to_string(), "3.0");
        assert_eq!(Value::Float(2.296).to_string(), "2.296");
        assert_eq!(Value::Int(3).to_string(), "3");
        assert_eq!(Value::Missing.to_string(), "");
    }

    #[test]
    fn test_identifier_conversion() {
        assert_eq!(Value::Float(7.0).as_identifier(), Some(7));
        assert_eq!(Value::Text("42".into()).as_identifier(), Some(42));
        assert_eq!(Value::Float(7.5).as_identifier(), None);
        assert_eq!(Value::Text("wb-1".into()).as_identifier(), None);
    }

    #[test]
    fn test_set_index_sorts_and_drops() {
        let mut table = Table::from_columns(vec![
            Column::new("id", ints(&[3, 1, 2])),
            Column::new("v", ints(&[30, 10, 20])),
        ])
        .unwrap();
        table.set_index("id").unwrap();
        assert_eq!(table.index(), &[1, 2, 3]);
        assert_eq!(table.column_names(), vec!["v"]);
        assert_eq!(table.column("v").unwrap().values, ints(&[10, 20, 30]));
    }

    #[test]
    fn test_set_index_rejects_text() {
        let mut table =
            Table::from_columns(vec![Column::new("id", vec![Value::from("a")])]).unwrap();
        assert!(matches!(
            table.set_index("id"),
            Err(HypeError::InvalidIdentifier { row: 0, .. })
        ));
    }

    #[test]
    fn test_set_index_rejects_out_of_range_float() {
        let mut table = Table::from_columns(vec![Column::new(
            "id",
            vec![Value::Float(1e20), Value::Float(2e20)],
        )])
        .unwrap();
        assert!(matches!(
            table.set_index("id"),
            Err(HypeError::InvalidIdentifier { row: 0, .. })
        ));
        assert_eq!(Value::Float(-9.0e18).as_identifier(), Some(-9_000_000_000_000_000_000));
        assert_eq!(Value::Float(f64::INFINITY).as_identifier(), None);
    }

    #[test]
    fn test_sort_by_column_is_stable_with_missing_last() {
        let mut table = Table::from_columns(vec![
            Column::new(
                "area",
                vec![
                    Value::Float(2.0),
                    Value::Missing,
                    Value::Float(1.0),
                    Value::Float(2.0),
                ],
            ),
            Column::new("tag", ints(&[0, 1, 2, 3])),
        ])
        .unwrap();
        table.sort_by_column("area").unwrap();
        assert_eq!(table.column("tag").unwrap().values, ints(&[2, 0, 3, 1]));
        assert_eq!(table.index(), &[2, 0, 3, 1]);
    }

    #[test]
    fn test_sort_by_column_rejects_text() {
        let mut table =
            Table::from_columns(vec![Column::new("area", vec![Value::from("big")])]).unwrap();
        assert!(matches!(
            table.sort_by_column("area"),
            Err(HypeError::NonNumericSortKey { .. })
        ));
    }

    #[test]
    fn test_push_column_checks_length() {
        let mut table = Table::with_rows(2);
        assert!(matches!(
            table.push_column(Column::new("x", ints(&[1]))),
            Err(HypeError::RaggedColumn { .. })
        ));
    }

    #[test]
    fn test_rename_columns_is_simultaneous() {
        let mut table = Table::from_columns(vec![
            Column::new("a", ints(&[1])),
            Column::new("b", ints(&[2])),
        ])
        .unwrap();
        table
            .rename_columns(&[("a".into(), "b".into()), ("b".into(), "a".into())])
            .unwrap();
        assert_eq!(table.column_names(), vec!["b", "a"]);
        assert!(matches!(
            table.rename_columns(&[("a".into(), "b".into())]),
            Err(HypeError::DuplicateColumn(name)) if name == "b"
        ));
    }

    #[test]
    fn test_select_orders_and_rejects_missing() {
        let table = Table::from_columns(vec![
            Column::new("a", ints(&[1])),
            Column::new("b", ints(&[2])),
        ])
        .unwrap();
        let picked = table.clone().select(&["b", "a"]).unwrap();
        assert_eq!(picked.column_names(), vec!["b", "a"]);
        assert!(matches!(
            table.select(&["c"]),
            Err(HypeError::MissingColumn(name)) if name == "c"
        ));
    }
}
