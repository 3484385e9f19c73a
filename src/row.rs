//! The [`Row`] capability and the concrete row kinds shipped with the crate.

use serde::{Deserialize, Serialize};

use crate::types::Value;

/// A keyed, subtractable value.
///
/// `key` identifies the row within one sequence. `subtract` returns a new row holding the
/// value-wise difference `self - other`, with `self`'s key.
pub trait Row {
    /// Key used to match rows across sequences.
    fn key(&self) -> &str;

    /// Returns `self - other`. Neither input is modified.
    fn subtract(&self, other: &Self) -> Self;
}

/// A named row with two integer values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleRow {
    pub name: String,
    pub value1: i64,
    pub valuen: i64,
}

impl SampleRow {
    pub fn new(name: impl Into<String>, value1: i64, valuen: i64) -> Self {
        Self {
            name: name.into(),
            value1,
            valuen,
        }
    }
}

impl Row for SampleRow {
    fn key(&self) -> &str {
        &self.name
    }

    fn subtract(&self, other: &Self) -> Self {
        Self {
            name: self.name.clone(),
            value1: self.value1.wrapping_sub(other.value1),
            valuen: self.valuen.wrapping_sub(other.valuen),
        }
    }
}

/// A named row with a single integer value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingleValueRow {
    pub name: String,
    pub value: i64,
}

impl SingleValueRow {
    pub fn new(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

impl Row for SingleValueRow {
    fn key(&self) -> &str {
        &self.name
    }

    fn subtract(&self, other: &Self) -> Self {
        Self {
            name: self.name.clone(),
            value: self.value.wrapping_sub(other.value),
        }
    }
}

/// A [`crate::types::DataSet`] row bound to its key column.
///
/// Subtraction is column-wise:
///
/// - `Int64 - Int64` and `Float64 - Float64` produce the difference (integers wrap);
/// - a `Null` minuend stays `Null`, a `Null` subtrahend leaves the minuend value as is;
/// - `Bool`, `Utf8` and mismatched types keep the minuend value;
/// - the key column is never touched.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedRecord {
    key: String,
    key_index: usize,
    values: Vec<Value>,
}

impl KeyedRecord {
    /// Bind `values` to the key found at `key_index`.
    pub fn new(key: impl Into<String>, key_index: usize, values: Vec<Value>) -> Self {
        Self {
            key: key.into(),
            key_index,
            values,
        }
    }

    /// Row values in schema order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}

impl Row for KeyedRecord {
    fn key(&self) -> &str {
        &self.key
    }

    fn subtract(&self, other: &Self) -> Self {
        let values = self
            .values
            .iter()
            .enumerate()
            .map(|(idx, lhs)| {
                if idx == self.key_index {
                    return lhs.clone();
                }
                match (lhs, other.values.get(idx)) {
                    (Value::Int64(a), Some(Value::Int64(b))) => Value::Int64(a.wrapping_sub(*b)),
                    (Value::Float64(a), Some(Value::Float64(b))) => Value::Float64(a - b),
                    _ => lhs.clone(),
                }
            })
            .collect();

        Self {
            key: self.key.clone(),
            key_index: self.key_index,
            values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{KeyedRecord, Row, SampleRow, SingleValueRow};
    use crate::types::Value;

    #[test]
    fn sample_row_subtracts_both_values_and_keeps_name() {
        let a = SampleRow::new("b", 20, 7);
        let b = SampleRow::new("other", 2, 10);
        let out = a.subtract(&b);
        assert_eq!(out, SampleRow::new("b", 18, -3));
        // Inputs untouched
        assert_eq!(a, SampleRow::new("b", 20, 7));
        assert_eq!(b.key(), "other");
    }

    #[test]
    fn single_value_row_wraps_on_overflow() {
        let a = SingleValueRow::new("x", i64::MIN);
        let b = SingleValueRow::new("x", 1);
        assert_eq!(a.subtract(&b).value, i64::MAX);
    }

    #[test]
    fn keyed_record_subtracts_numeric_columns_only() {
        let a = KeyedRecord::new(
            "w1",
            0,
            vec![
                Value::Utf8("w1".to_string()),
                Value::Int64(10),
                Value::Float64(2.5),
                Value::Bool(true),
                Value::Utf8("left".to_string()),
            ],
        );
        let b = KeyedRecord::new(
            "w1",
            0,
            vec![
                Value::Utf8("w1".to_string()),
                Value::Int64(4),
                Value::Float64(0.5),
                Value::Bool(false),
                Value::Utf8("right".to_string()),
            ],
        );

        let out = a.subtract(&b);
        assert_eq!(out.key(), "w1");
        assert_eq!(
            out.values(),
            &[
                Value::Utf8("w1".to_string()),
                Value::Int64(6),
                Value::Float64(2.0),
                Value::Bool(true),
                Value::Utf8("left".to_string()),
            ]
        );
    }

    #[test]
    fn keyed_record_null_handling() {
        let a = KeyedRecord::new("k", 1, vec![Value::Null, Value::Int64(7), Value::Int64(5)]);
        let b = KeyedRecord::new("k", 1, vec![Value::Int64(3), Value::Int64(0), Value::Null]);
        let out = a.subtract(&b);
        // Null minuend stays null, null subtrahend leaves the value.
        assert_eq!(
            out.into_values(),
            vec![Value::Null, Value::Int64(7), Value::Int64(5)]
        );
    }

    #[test]
    fn keyed_record_integer_key_column_is_not_subtracted() {
        let a = KeyedRecord::new("3", 0, vec![Value::Int64(3), Value::Int64(9)]);
        let b = KeyedRecord::new("3", 0, vec![Value::Int64(3), Value::Int64(4)]);
        assert_eq!(
            a.subtract(&b).into_values(),
            vec![Value::Int64(3), Value::Int64(5)]
        );
    }
}
