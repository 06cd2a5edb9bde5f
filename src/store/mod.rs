//! Tools for mirroring dataframes into a PostgreSQL database and back.
//!
//! This module provides the storage side of the crate: it manages the database connection,
//! creates tables from dataframe schemas, inserts records with duplicate skipping, materializes
//! tables back into dataframes, and dumps whole databases to per-table CSV files.
//!
//! ## Usage
//!
//! The main entry point is [`FrameStore`], obtained from [`FrameStore::connect`]. Each store is
//! connected by construction and torn down with [`FrameStore::disconnect`], which consumes it.
//! The [`initialize_database`] and [`dump_database_to_csv`] functions wrap the common
//! connect-work-disconnect sequences into single calls.
//!
//! ## Submodules
//!
//! - **postgres**: Contains the PostgreSQL-specific adapter and helpers.

mod postgres;

pub use postgres::{dump_database_to_csv, initialize_database, FrameStore};
