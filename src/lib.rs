//! pgframe Library
//!
//! This library mirrors in-memory dataframes into PostgreSQL tables and
//! back, and bulk-exports every table in a database to one CSV file per
//! table. It is aimed at small scripts and one-off jobs that want "save
//! this dataframe as a SQL table" without writing SQL by hand.

pub mod frame;
pub mod sql;
pub mod store;
