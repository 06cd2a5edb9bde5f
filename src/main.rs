//! pgframe demo: Mirror a Dataframe into PostgreSQL and Dump the Database to CSV
//!
//! This application demonstrates the full round trip the crate offers: building an in-memory
//! dataframe, mirroring it into a PostgreSQL table, inserting an extra record with duplicate
//! skipping, and dumping every table in the database to per-table CSV files.
//!
//! ## Purpose
//! The goal is to showcase a minimal yet functional pipeline for treating PostgreSQL as a
//! persistence layer for dataframes, with the final step being a folder of CSV files.
//!
//! ## Design Overview
//! - **Frames**: In-memory datasets with typed, ordered columns live in the `frame` module.
//! - **Statements**: SQL text generation from schemas lives in the `sql` module.
//! - **Storage**: Connection handling, table creation, inserts, and dumps live in the `store` module.
//!
//! ## Dependencies
//! - **`tokio`**: For asynchronous runtime to handle database operations.
//! - **`tokio-postgres`**: For PostgreSQL database interaction.
//! - **`log` and `env_logger`**: For structured logging instead of `println!`.
//! - **`clap`**: For parsing command-line arguments to configure the application.
//! - **`chrono`**: Handles timestamp values carried by dataframe columns.
//! - **`anyhow`**: Wraps failures with context as they propagate.
//! - **`csv`**: Serializes materialized tables into CSV files.
//!
//! These dependencies are stable and widely used, aligning with the guideline to minimize
//! external dependencies while enhancing functionality.
//!
//! ## Usage
//! 1. Ensure a PostgreSQL database is running (e.g., database `pgframe`, user `postgres`,
//!    password `postgres`).
//! 2. Configure the application using environment variables or command-line arguments:
//!    ```sh
//!    export DB_PARAMS="host=localhost user=postgres password=postgres dbname=pgframe"
//!    export DUMP_FOLDER=pgframe-dump
//!    ```
//! 3. Run the application:
//!    ```sh
//!    cargo run -- --db-params "host=localhost user=postgres password=postgres dbname=pgframe" --folder pgframe-dump
//!    ```
//!    Pass `--overwrite` to replace the dump folder if it already exists, and `--table` to
//!    change the demo table's name.
//! 4. Logs will be output to the console, controlled by the `RUST_LOG` environment variable:
//!    ```sh
//!    export RUST_LOG=info
//!    cargo run
//!    ```
//!
//! ## Notes
//! - The demo table must not already exist; drop it (or pick another name) between runs.
//! - Logging levels (e.g., `info`, `debug`, `error`) can be adjusted via the `RUST_LOG` environment variable.

use clap::Parser;
use log::info;
use pgframe::frame::{ColumnType, DataFrame, Record, Schema, Value};
use pgframe::store::FrameStore;
use std::error::Error;
use std::path::PathBuf;

/// Command-line arguments for configuring the pgframe demo application.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
  /// PostgreSQL connection string (e.g., "host=localhost user=postgres password=your_password dbname=pgframe").
  #[clap(long, env = "DB_PARAMS", default_value = "host=localhost user=postgres password=postgres dbname=pgframe")]
  db_params: String,

  /// Folder to dump the database's tables into, one CSV file per table.
  #[clap(long, env = "DUMP_FOLDER", default_value = "pgframe-dump")]
  folder: PathBuf,

  /// Name of the demo table to create and seed.
  #[clap(long, env = "TABLE_NAME", default_value = "hello_world")]
  table: String,

  /// Replace the dump folder if it already exists
  #[clap(long, action)]
  overwrite: bool,
}

/// Orchestrates building, mirroring, and dumping a demo dataframe.
///
/// This function:
/// 1. Loads configuration from environment variables or command-line arguments.
/// 2. Builds a two-column dataframe with a pair of seed rows.
/// 3. Creates a matching table in PostgreSQL and inserts one extra record.
/// 4. Dumps every table in the database to CSV files.
/// 5. Logs progress at each step using the `log` crate.
///
/// # Returns
/// - `Ok(())` if all steps complete successfully.
/// - `Err(Box<dyn Error>)` if any step fails (e.g., database connection issue, existing dump folder).
#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
  // Initialize logging
  env_logger::init();

  // Parse command-line arguments
  let args = Args::parse();
  info!("Starting pgframe demo with parameters: {}", args.db_params);

  // Build the demo dataframe
  let schema = Schema::new([("Col1", ColumnType::Text), ("Col2", ColumnType::Float)]);
  let mut frame = DataFrame::new(schema);
  frame.push_row(vec![Value::from("Hello"), Value::from(6.0)])?;
  frame.push_row(vec![Value::from("World"), Value::from(3.0)])?;

  // Mirror the frame into a table
  let store = FrameStore::connect(&args.db_params).await?;
  store.create_table(&args.table, &frame).await?;
  info!("Mirrored {} row(s) into table {}", frame.len(), args.table);

  // Insert one extra record on top of the seeded rows
  let mut record = Record::new();
  record.insert("Col1".to_string(), Value::from("Goodbye"));
  record.insert("Col2".to_string(), Value::from(-5.0));
  store.insert_record(&args.table, frame.schema(), &record).await?;
  info!("Inserted one extra record into {}", args.table);

  // Dump every table in the database to CSV files
  store.dump_to_csv(&args.folder, args.overwrite).await?;
  info!("Database dumped to {}", args.folder.display());

  store.disconnect().await?;
  Ok(())
}
