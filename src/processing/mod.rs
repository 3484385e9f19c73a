//! Key-indexed subtraction.
//!
//! Currently implemented:
//!
//! - [`subtract()`]: subtract same-keyed rows of one slice of [`crate::row::Row`]s from another
//! - [`subtract_opt()`]: the same, with absent inputs treated as empty
//! - [`subtract_with_options()`]: duplicate-key policy and observer reporting
//! - [`subtract_datasets()`]: the same operation over [`crate::types::DataSet`]s keyed by a column
//!
//! ## Example
//!
//! ```rust
//! use keyed_subtract::processing::{
//!     DuplicateKeyPolicy, SubtractOptions, subtract, subtract_with_options,
//! };
//! use keyed_subtract::row::SampleRow;
//!
//! let a = vec![
//!     SampleRow::new("a", 10, 0),
//!     SampleRow::new("b", 20, 0),
//!     SampleRow::new("c", 30, 0),
//! ];
//! let b = vec![SampleRow::new("c", 3, 0), SampleRow::new("b", 2, 0)];
//!
//! let c = subtract(&a, &b);
//! assert_eq!(c[1], SampleRow::new("b", 18, 0));
//! assert_eq!(c[2], SampleRow::new("c", 27, 0));
//!
//! // Refuse ambiguous subtrahends instead of letting the last row win.
//! let opts = SubtractOptions {
//!     duplicate_keys: DuplicateKeyPolicy::Reject,
//!     ..Default::default()
//! };
//! let dup = vec![SampleRow::new("b", 1, 0), SampleRow::new("b", 2, 0)];
//! assert!(subtract_with_options(&a, &dup, &opts).is_err());
//! ```

pub mod dataset;
pub mod subtract;

pub use dataset::subtract_datasets;
pub use subtract::{
    DuplicateKey, DuplicateKeyPolicy, KeyIndex, SubtractOptions, subtract, subtract_opt,
    subtract_with_options,
};
