//! Loading subtraction inputs from files.
//!
//! - [`csv::ingest_csv_from_path`] loads a schema-typed [`crate::types::DataSet`] for
//!   [`crate::processing::subtract_datasets`].
//! - [`csv::read_rows_from_path`] deserializes typed rows (e.g. [`crate::row::SampleRow`]) for
//!   [`crate::processing::subtract`].

pub mod csv;
