//! # In-Memory Tabular Datasets
//!
//! This module provides the dataframe type the rest of the crate revolves
//! around: an ordered set of named, typed columns plus row-major values. A
//! frame knows how to derive its own schema descriptor, iterate its rows as
//! column-keyed records, and serialize itself to CSV with a leading index
//! column, which is the shape the dump operation writes to disk.
//!
//! ## Usage
//!
//! Build a [`Schema`], wrap it in a [`DataFrame`], and append rows with
//! [`DataFrame::push_row`]; rows are validated against the schema as they
//! arrive, so a frame handed to the store is always internally consistent.
//!
//! ## Submodules
//!
//! - **dataset**: The `DataFrame`, `Schema`, and `Record` types.
//! - **types**: The `ColumnType` tags and the `Value` cell representation.

mod dataset;
mod types;

pub use dataset::{DataFrame, Record, Schema};
pub use types::{ColumnType, Value};
