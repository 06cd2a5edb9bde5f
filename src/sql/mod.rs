//! # SQL Statement Builders
//!
//! This module turns a table name and a schema descriptor into the SQL text
//! the store executes: CREATE TABLE with a uniqueness constraint spanning
//! every column, a parameterized INSERT that skips conflicts on that same
//! tuple, SELECT * for materialization, and the catalog query behind the
//! bulk CSV dump. Everything here is pure string construction; execution
//! and parameter binding live in the store module.
//!
//! ## Submodules
//!
//! - **statements**: The statement builder functions.

mod statements;

pub use statements::{
    create_table_statement, insert_statement, list_tables_statement, select_all_statement,
    select_columns_statement,
};
