//! Key-indexed subtraction over sequences of [`Row`]s.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::sync::Arc;

use crate::error::{SubtractError, SubtractResult};
use crate::observability::{
    SubtractContext, SubtractObserver, SubtractOperation, SubtractSeverity, SubtractStats,
};
use crate::row::Row;

/// How to resolve a key that appears more than once in the subtrahend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateKeyPolicy {
    /// The later occurrence replaces the earlier one.
    #[default]
    LastWins,
    /// The earliest occurrence is kept.
    FirstWins,
    /// Fail with [`SubtractError::DuplicateKey`].
    Reject,
}

/// A repeated subtrahend key and the two positions it was seen at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateKey {
    pub key: String,
    /// Position of the occurrence that held the key before `second` was seen.
    pub first: usize,
    pub second: usize,
}

/// Map from key to position in a row slice.
#[derive(Debug, Clone)]
pub struct KeyIndex<'a> {
    positions: HashMap<&'a str, usize>,
    duplicates: Vec<DuplicateKey>,
}

impl<'a> KeyIndex<'a> {
    /// Index `rows` by key, resolving repeated keys with `policy`.
    ///
    /// Only [`DuplicateKeyPolicy::Reject`] can fail.
    pub fn build<R: Row>(rows: &'a [R], policy: DuplicateKeyPolicy) -> SubtractResult<Self> {
        let mut positions = HashMap::with_capacity(rows.len());
        let mut duplicates = Vec::new();

        for (idx, row) in rows.iter().enumerate() {
            match positions.entry(row.key()) {
                Entry::Vacant(slot) => {
                    slot.insert(idx);
                }
                Entry::Occupied(mut slot) => {
                    let first = *slot.get();
                    match policy {
                        DuplicateKeyPolicy::Reject => {
                            return Err(SubtractError::DuplicateKey {
                                key: row.key().to_owned(),
                                first,
                                second: idx,
                            });
                        }
                        DuplicateKeyPolicy::LastWins => {
                            slot.insert(idx);
                        }
                        DuplicateKeyPolicy::FirstWins => {}
                    }
                    duplicates.push(DuplicateKey {
                        key: row.key().to_owned(),
                        first,
                        second: idx,
                    });
                }
            }
        }

        Ok(Self {
            positions,
            duplicates,
        })
    }

    /// Index `rows` with last-seen-wins semantics. Never fails.
    pub fn last_wins<R: Row>(rows: &'a [R]) -> Self {
        let mut positions = HashMap::with_capacity(rows.len());
        for (idx, row) in rows.iter().enumerate() {
            positions.insert(row.key(), idx);
        }
        Self {
            positions,
            duplicates: Vec::new(),
        }
    }

    /// Position of the row holding `key`, if any.
    pub fn get(&self, key: &str) -> Option<usize> {
        self.positions.get(key).copied()
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Repeated keys seen while building, in scan order.
    ///
    /// Always empty for [`KeyIndex::last_wins`].
    pub fn duplicates(&self) -> &[DuplicateKey] {
        &self.duplicates
    }
}

/// Options controlling [`subtract_with_options`] and [`super::subtract_datasets`].
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct SubtractOptions {
    /// Resolution of repeated subtrahend keys.
    pub duplicate_keys: DuplicateKeyPolicy,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn SubtractObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: SubtractSeverity,
}

impl fmt::Debug for SubtractOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubtractOptions")
            .field("duplicate_keys", &self.duplicate_keys)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for SubtractOptions {
    fn default() -> Self {
        Self {
            duplicate_keys: DuplicateKeyPolicy::default(),
            observer: None,
            alert_at_or_above: SubtractSeverity::Critical,
        }
    }
}

/// Subtract same-keyed rows of `reduce` from `initial`.
///
/// The output has one row per `initial` row, in the same order: `initial[i].subtract(r)` when
/// `reduce` holds a row `r` with the same key, otherwise a clone of `initial[i]`. If `reduce`
/// repeats a key, its last occurrence is used.
///
/// Runs in O(n + m) time with an O(m) key index.
///
/// ```rust
/// use keyed_subtract::processing::subtract;
/// use keyed_subtract::row::SingleValueRow;
///
/// let initial = vec![SingleValueRow::new("a", 10), SingleValueRow::new("b", 20)];
/// let reduce = vec![SingleValueRow::new("b", 2)];
///
/// let out = subtract(&initial, &reduce);
/// assert_eq!(out, vec![SingleValueRow::new("a", 10), SingleValueRow::new("b", 18)]);
/// ```
pub fn subtract<R: Row + Clone>(initial: &[R], reduce: &[R]) -> Vec<R> {
    let index = KeyIndex::last_wins(reduce);
    apply(initial, reduce, &index).0
}

/// Like [`subtract`], treating a `None` input as an empty sequence.
pub fn subtract_opt<R: Row + Clone>(initial: Option<&[R]>, reduce: Option<&[R]>) -> Vec<R> {
    subtract(initial.unwrap_or_default(), reduce.unwrap_or_default())
}

/// [`subtract`] with a configurable duplicate-key policy and observer reporting.
///
/// Under the default options the result equals [`subtract`]. Fails only when
/// `options.duplicate_keys` is [`DuplicateKeyPolicy::Reject`] and `reduce` repeats a key.
pub fn subtract_with_options<R: Row + Clone>(
    initial: &[R],
    reduce: &[R],
    options: &SubtractOptions,
) -> SubtractResult<Vec<R>> {
    let ctx = SubtractContext {
        operation: SubtractOperation::Rows,
        initial_rows: initial.len(),
        reduce_rows: reduce.len(),
        duplicate_keys: options.duplicate_keys,
    };

    let result = KeyIndex::build(reduce, options.duplicate_keys).map(|index| {
        report_duplicates(options, &ctx, &index);
        apply(initial, reduce, &index)
    });
    report(options, &ctx, result)
}

/// Walk `initial` once, subtracting the indexed `reduce` row where one exists.
pub(crate) fn apply<R: Row + Clone>(
    initial: &[R],
    reduce: &[R],
    index: &KeyIndex<'_>,
) -> (Vec<R>, SubtractStats) {
    let mut stats = SubtractStats {
        output_rows: initial.len(),
        duplicate_keys: index.duplicates().len(),
        ..SubtractStats::default()
    };

    let out: Vec<R> = initial
        .iter()
        .map(|row| match index.get(row.key()) {
            Some(pos) => {
                stats.matched += 1;
                row.subtract(&reduce[pos])
            }
            None => {
                stats.passed_through += 1;
                row.clone()
            }
        })
        .collect();

    (out, stats)
}

pub(crate) fn report_duplicates(
    options: &SubtractOptions,
    ctx: &SubtractContext,
    index: &KeyIndex<'_>,
) {
    if let Some(obs) = &options.observer {
        for dup in index.duplicates() {
            obs.on_duplicate_key(ctx, &dup.key, dup.first, dup.second);
        }
    }
}

/// Forward the outcome of a run to the configured observer and strip the stats.
pub(crate) fn report<T>(
    options: &SubtractOptions,
    ctx: &SubtractContext,
    result: SubtractResult<(T, SubtractStats)>,
) -> SubtractResult<T> {
    match result {
        Ok((out, stats)) => {
            if let Some(obs) = &options.observer {
                obs.on_success(ctx, stats);
            }
            Ok(out)
        }
        Err(e) => {
            if let Some(obs) = &options.observer {
                let severity = e.severity();
                obs.on_failure(ctx, severity, &e);
                if severity >= options.alert_at_or_above {
                    obs.on_alert(ctx, severity, &e);
                }
            }
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        DuplicateKey, DuplicateKeyPolicy, KeyIndex, SubtractOptions, subtract, subtract_opt,
        subtract_with_options,
    };
    use crate::error::SubtractError;
    use crate::row::{SampleRow, SingleValueRow};

    fn rows(pairs: &[(&str, i64)]) -> Vec<SingleValueRow> {
        pairs
            .iter()
            .map(|(k, v)| SingleValueRow::new(*k, *v))
            .collect()
    }

    #[test]
    fn subtract_matches_by_key_and_preserves_initial_order() {
        let initial = rows(&[("a", 10), ("b", 20), ("c", 30)]);
        let reduce = rows(&[("c", 3), ("b", 2)]);

        let out = subtract(&initial, &reduce);
        assert_eq!(out, rows(&[("a", 10), ("b", 18), ("c", 27)]));
        // Inputs unchanged
        assert_eq!(initial, rows(&[("a", 10), ("b", 20), ("c", 30)]));
    }

    #[test]
    fn subtract_two_value_rows() {
        let initial = vec![
            SampleRow::new("a", 10, 0),
            SampleRow::new("b", 20, 5),
            SampleRow::new("c", 30, 0),
        ];
        let reduce = vec![SampleRow::new("c", 3, 1), SampleRow::new("b", 2, 5)];

        assert_eq!(
            subtract(&initial, &reduce),
            vec![
                SampleRow::new("a", 10, 0),
                SampleRow::new("b", 18, 0),
                SampleRow::new("c", 27, -1),
            ]
        );
    }

    #[test]
    fn duplicate_reduce_key_last_occurrence_wins() {
        let out = subtract(&rows(&[("b", 20)]), &rows(&[("b", 1), ("b", 2)]));
        assert_eq!(out, rows(&[("b", 18)]));
    }

    #[test]
    fn duplicate_initial_keys_each_use_same_match() {
        let out = subtract(&rows(&[("b", 20), ("b", 5)]), &rows(&[("b", 2)]));
        assert_eq!(out, rows(&[("b", 18), ("b", 3)]));
    }

    #[test]
    fn empty_inputs() {
        let some = rows(&[("a", 1)]);
        assert!(subtract(&[], &some).is_empty());
        assert_eq!(subtract(&some, &[]), some);
        assert!(subtract_opt::<SingleValueRow>(None, None).is_empty());
        assert_eq!(subtract_opt(Some(&some[..]), None), some);
        assert!(subtract_opt(None, Some(&some[..])).is_empty());
    }

    #[test]
    fn key_index_policies() {
        let reduce = rows(&[("b", 1), ("a", 9), ("b", 2)]);

        let last = KeyIndex::build(&reduce, DuplicateKeyPolicy::LastWins).unwrap();
        assert_eq!(last.get("b"), Some(2));
        assert_eq!(last.len(), 2);
        assert_eq!(
            last.duplicates(),
            &[DuplicateKey {
                key: "b".to_string(),
                first: 0,
                second: 2
            }]
        );

        let first = KeyIndex::build(&reduce, DuplicateKeyPolicy::FirstWins).unwrap();
        assert_eq!(first.get("b"), Some(0));
        assert_eq!(first.get("missing"), None);

        let err = KeyIndex::build(&reduce, DuplicateKeyPolicy::Reject).unwrap_err();
        assert!(matches!(
            err,
            SubtractError::DuplicateKey { ref key, first: 0, second: 2 } if key == "b"
        ));
    }

    #[test]
    fn last_wins_index_matches_build() {
        let reduce = rows(&[("x", 1), ("x", 2)]);
        let index = KeyIndex::last_wins(&reduce);
        assert_eq!(index.get("x"), Some(1));
        assert!(index.duplicates().is_empty());
        assert!(KeyIndex::last_wins::<SingleValueRow>(&[]).is_empty());
    }

    #[test]
    fn options_first_wins() {
        let opts = SubtractOptions {
            duplicate_keys: DuplicateKeyPolicy::FirstWins,
            ..Default::default()
        };
        let out = subtract_with_options(&rows(&[("b", 20)]), &rows(&[("b", 1), ("b", 2)]), &opts)
            .unwrap();
        assert_eq!(out, rows(&[("b", 19)]));
    }

    #[test]
    fn default_options_equal_plain_subtract() {
        let initial = rows(&[("a", 10), ("b", 20), ("c", 30)]);
        let reduce = rows(&[("c", 3), ("b", 2), ("c", 4)]);
        assert_eq!(
            subtract_with_options(&initial, &reduce, &SubtractOptions::default()).unwrap(),
            subtract(&initial, &reduce)
        );
    }

    #[test]
    fn options_debug_hides_observer() {
        let dbg = format!("{:?}", SubtractOptions::default());
        assert!(dbg.contains("observer_set: false"));
        assert!(dbg.contains("LastWins"));
    }
}
