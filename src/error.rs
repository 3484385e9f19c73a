use thiserror::Error;

use crate::observability::SubtractSeverity;

/// Convenience result type for subtraction and loading operations.
pub type SubtractResult<T> = Result<T, SubtractError>;

/// Which input of a subtraction an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// The minuend (`initial`) sequence.
    Initial,
    /// The subtrahend (`reduce`) sequence.
    Reduce,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Initial => f.write_str("initial"),
            Side::Reduce => f.write_str("reduce"),
        }
    }
}

/// Error type returned by the fallible surfaces of the crate.
///
/// The plain [`crate::processing::subtract`] never fails; this enum covers configurable
/// subtraction, dataset subtraction and CSV loading.
#[derive(Debug, Error)]
pub enum SubtractError {
    /// Underlying I/O error outside CSV reading; CSV wraps its own I/O failures in [`Self::Csv`].
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV read or deserialization error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Input does not conform to the expected schema (missing columns, unequal schemas, etc.).
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// A value could not be parsed into the required [`crate::types::DataType`].
    #[error("failed to parse value at row {row} column '{column}': {message} (raw='{raw}')")]
    ParseError {
        row: usize,
        column: String,
        raw: String,
        message: String,
    },

    /// The subtrahend holds the same key twice and the policy is
    /// [`crate::processing::DuplicateKeyPolicy::Reject`].
    #[error("duplicate key '{key}' in reduce rows at positions {first} and {second}")]
    DuplicateKey {
        key: String,
        first: usize,
        second: usize,
    },

    /// A dataset row has a null key.
    #[error("missing key in {side} row {row}")]
    MissingKey { side: Side, row: usize },
}

impl SubtractError {
    /// Severity used when reporting this error to a [`crate::observability::SubtractObserver`].
    pub fn severity(&self) -> SubtractSeverity {
        match self {
            SubtractError::Io(_) => SubtractSeverity::Critical,
            SubtractError::Csv(err) => match err.kind() {
                csv::ErrorKind::Io(_) => SubtractSeverity::Critical,
                _ => SubtractSeverity::Error,
            },
            _ => SubtractSeverity::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Side, SubtractError};
    use crate::observability::SubtractSeverity;

    #[test]
    fn io_errors_are_critical() {
        let err = SubtractError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(err.severity(), SubtractSeverity::Critical);
    }

    #[test]
    fn csv_io_errors_are_critical_and_csv_data_errors_are_not() {
        let missing = csv::Reader::from_path("does/not/exist.csv").unwrap_err();
        assert_eq!(
            SubtractError::from(missing).severity(),
            SubtractSeverity::Critical
        );

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader("a,b\nc\n".as_bytes());
        let uneven = rdr.records().find_map(Result::err).unwrap();
        assert_eq!(
            SubtractError::from(uneven).severity(),
            SubtractSeverity::Error
        );
    }

    #[test]
    fn duplicate_key_message_names_key_and_positions() {
        let err = SubtractError::DuplicateKey {
            key: "b".to_string(),
            first: 0,
            second: 3,
        };
        assert_eq!(err.severity(), SubtractSeverity::Error);
        assert_eq!(
            err.to_string(),
            "duplicate key 'b' in reduce rows at positions 0 and 3"
        );
    }

    #[test]
    fn missing_key_message_names_side() {
        let err = SubtractError::MissingKey {
            side: Side::Reduce,
            row: 2,
        };
        assert_eq!(err.to_string(), "missing key in reduce row 2");
    }
}
