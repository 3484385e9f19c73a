//! `keyed-subtract` subtracts one ordered sequence of keyed rows from another.
//!
//! Every row exposes a string key and a `subtract` operation through the [`row::Row`] trait. Given
//! a minuend sequence `initial` and a subtrahend sequence `reduce`, [`processing::subtract`]
//! returns one row per `initial` row, in order: the row minus its same-keyed `reduce` row when one
//! exists, the row unchanged otherwise.
//!
//! ## Quick example
//!
//! ```rust
//! use keyed_subtract::processing::subtract;
//! use keyed_subtract::row::SingleValueRow;
//!
//! let initial = vec![
//!     SingleValueRow::new("a", 10),
//!     SingleValueRow::new("b", 20),
//!     SingleValueRow::new("c", 30),
//! ];
//! let reduce = vec![SingleValueRow::new("c", 3), SingleValueRow::new("b", 2)];
//!
//! let out = subtract(&initial, &reduce);
//! assert_eq!(
//!     out,
//!     vec![
//!         SingleValueRow::new("a", 10),
//!         SingleValueRow::new("b", 18),
//!         SingleValueRow::new("c", 27),
//!     ]
//! );
//! ```
//!
//! ## Implementing `Row`
//!
//! ```rust
//! use keyed_subtract::processing::subtract;
//! use keyed_subtract::row::Row;
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Balance {
//!     account: String,
//!     cents: i64,
//! }
//!
//! impl Row for Balance {
//!     fn key(&self) -> &str {
//!         &self.account
//!     }
//!
//!     fn subtract(&self, other: &Self) -> Self {
//!         Balance { account: self.account.clone(), cents: self.cents - other.cents }
//!     }
//! }
//!
//! let before = vec![Balance { account: "acme".into(), cents: 500 }];
//! let spent = vec![Balance { account: "acme".into(), cents: 120 }];
//! assert_eq!(subtract(&before, &spent)[0].cents, 380);
//! ```
//!
//! ## Modules
//!
//! - [`row`]: the [`row::Row`] trait and the bundled row kinds
//! - [`processing`]: subtraction entrypoints, key index and options
//! - [`types`]: schema-typed [`types::DataSet`] model
//! - [`ingestion`]: CSV loading for typed rows and datasets
//! - [`observability`]: observer hooks for logging/alerts
//! - [`error`]: error type for the fallible entrypoints

pub mod error;
pub mod ingestion;
pub mod observability;
pub mod processing;
pub mod row;
pub mod types;

pub use error::{SubtractError, SubtractResult};
