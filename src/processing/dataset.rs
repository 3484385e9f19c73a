//! Key-indexed subtraction for [`crate::types::DataSet`].

use crate::error::{Side, SubtractError, SubtractResult};
use crate::observability::{SubtractContext, SubtractOperation, SubtractStats};
use crate::row::KeyedRecord;
use crate::types::{DataSet, DataType, Value};

use super::subtract::{KeyIndex, SubtractOptions, apply, report, report_duplicates};

/// Subtract same-keyed rows of `reduce` from `initial`, matching on `key_column`.
///
/// Rules:
///
/// - Both datasets must have equal schemas.
/// - `key_column` must exist and be [`DataType::Utf8`] or [`DataType::Int64`] (integer keys match
///   by their decimal text).
/// - Every row must have one value per schema field, else [`SubtractError::SchemaMismatch`].
/// - A null key fails with [`SubtractError::MissingKey`].
/// - Numeric columns are subtracted as described on [`KeyedRecord`]; everything else keeps the
///   `initial` value.
///
/// The output keeps `initial`'s schema and row order.
///
/// ```rust
/// use keyed_subtract::processing::{subtract_datasets, SubtractOptions};
/// use keyed_subtract::types::{DataSet, DataType, Field, Schema, Value};
///
/// let schema = Schema::new(vec![
///     Field::new("sku", DataType::Utf8),
///     Field::new("qty", DataType::Int64),
/// ]);
/// let stock = DataSet::new(
///     schema.clone(),
///     vec![
///         vec![Value::Utf8("a".into()), Value::Int64(10)],
///         vec![Value::Utf8("b".into()), Value::Int64(20)],
///     ],
/// );
/// let sold = DataSet::new(schema, vec![vec![Value::Utf8("b".into()), Value::Int64(2)]]);
///
/// let left = subtract_datasets(&stock, &sold, "sku", &SubtractOptions::default()).unwrap();
/// assert_eq!(left.rows[1][1], Value::Int64(18));
/// ```
pub fn subtract_datasets(
    initial: &DataSet,
    reduce: &DataSet,
    key_column: &str,
    options: &SubtractOptions,
) -> SubtractResult<DataSet> {
    let ctx = SubtractContext {
        operation: SubtractOperation::DataSet,
        initial_rows: initial.row_count(),
        reduce_rows: reduce.row_count(),
        duplicate_keys: options.duplicate_keys,
    };
    let result = subtract_datasets_impl(initial, reduce, key_column, options, &ctx);
    report(options, &ctx, result)
}

fn subtract_datasets_impl(
    initial: &DataSet,
    reduce: &DataSet,
    key_column: &str,
    options: &SubtractOptions,
    ctx: &SubtractContext,
) -> SubtractResult<(DataSet, SubtractStats)> {
    if initial.schema != reduce.schema {
        return Err(SubtractError::SchemaMismatch {
            message: format!(
                "initial and reduce schemas differ. initial={:?} reduce={:?}",
                initial.schema.field_names().collect::<Vec<_>>(),
                reduce.schema.field_names().collect::<Vec<_>>()
            ),
        });
    }

    let key_idx = initial
        .schema
        .index_of(key_column)
        .ok_or_else(|| SubtractError::SchemaMismatch {
            message: format!(
                "missing key column '{key_column}'. fields={:?}",
                initial.schema.field_names().collect::<Vec<_>>()
            ),
        })?;

    match initial.schema.fields[key_idx].data_type {
        DataType::Utf8 | DataType::Int64 => {}
        other => {
            return Err(SubtractError::SchemaMismatch {
                message: format!("key column '{key_column}' must be Utf8 or Int64, got {other:?}"),
            });
        }
    }

    let left = keyed_records(initial, key_idx, Side::Initial)?;
    let right = keyed_records(reduce, key_idx, Side::Reduce)?;

    let index = KeyIndex::build(&right, options.duplicate_keys)?;
    report_duplicates(options, ctx, &index);
    let (out, stats) = apply(&left, &right, &index);

    let rows = out.into_iter().map(KeyedRecord::into_values).collect();
    Ok((DataSet::new(initial.schema.clone(), rows), stats))
}

fn keyed_records(
    dataset: &DataSet,
    key_idx: usize,
    side: Side,
) -> SubtractResult<Vec<KeyedRecord>> {
    let width = dataset.schema.fields.len();
    dataset
        .rows
        .iter()
        .enumerate()
        .map(|(row, values)| {
            if values.len() != width {
                return Err(SubtractError::SchemaMismatch {
                    message: format!(
                        "{side} row {row} has {} values, schema has {width} fields",
                        values.len()
                    ),
                });
            }
            let key = match values.get(key_idx) {
                Some(Value::Utf8(s)) => s.clone(),
                Some(Value::Int64(v)) => v.to_string(),
                _ => return Err(SubtractError::MissingKey { side, row }),
            };
            Ok(KeyedRecord::new(key, key_idx, values.clone()))
        })
        .collect()
}
