use crate::frame::{ColumnType, DataFrame, Record, Schema, Value};
use crate::sql::{
  create_table_statement, insert_statement, list_tables_statement, select_all_statement,
  select_columns_statement,
};
use anyhow::{anyhow, bail, Context, Result as AnyhowResult};
use chrono::{DateTime, NaiveDateTime, Utc};
use log::{debug, error, info};
use std::fs;
use std::path::Path;
use tokio::task::JoinHandle;
use tokio_postgres::types::{ToSql, Type};
use tokio_postgres::{Client, NoTls, Row};

/// A connected PostgreSQL adapter for mirroring dataframes.
///
/// The adapter has exactly two states, and the type system enforces them:
/// [`FrameStore::connect`] is the only way to obtain a store, so every value
/// of this type is connected, and [`FrameStore::disconnect`] consumes the
/// store, so no operation can run after teardown. One logical operation
/// should be in flight at a time; each public method issues its statements
/// sequentially and awaits completion before returning.
pub struct FrameStore {
  client: Client,
  connection: JoinHandle<()>,
}

impl FrameStore {
  /// Connects to PostgreSQL and spawns the driver's connection task.
  ///
  /// # Arguments
  ///
  /// * `params` - Connection string (e.g., "host=localhost user=postgres dbname=demo").
  ///
  /// # Returns
  ///
  /// * `Ok(FrameStore)` - A connected adapter.
  /// * `Err(anyhow::Error)` - The connection could not be established.
  pub async fn connect(params: &str) -> AnyhowResult<FrameStore> {
    let (client, connection) = tokio_postgres::connect(params, NoTls)
      .await
      .context("Failed to connect to PostgreSQL")?;
    let connection = tokio::spawn(async move {
      if let Err(e) = connection.await {
        error!("Database connection error: {}", e);
      }
    });
    Ok(FrameStore { client, connection })
  }

  /// Closes the connection and waits for the connection task to finish.
  ///
  /// Consumes the store; any error the connection future hit on the way down
  /// has already been logged by the connection task.
  pub async fn disconnect(self) -> AnyhowResult<()> {
    drop(self.client);
    self
      .connection
      .await
      .context("Connection task failed to shut down")?;
    Ok(())
  }

  /// Creates a table mirroring the frame's schema and inserts every row.
  ///
  /// The generated CREATE TABLE declares a UNIQUE constraint over the full
  /// column tuple, and each row goes through [`FrameStore::insert_record`],
  /// so seeding is conflict-skipping like any other insert. Fails if the
  /// table already exists (the store's error propagates). A frame with
  /// columns but no rows creates an empty, constraint-only table.
  ///
  /// # Arguments
  ///
  /// * `table` - Name of the table to create.
  /// * `frame` - Dataset supplying both the schema and the initial rows.
  ///
  /// # Returns
  ///
  /// * `Ok(())` - Table created and all rows inserted.
  /// * `Err(anyhow::Error)` - Statement execution failed.
  ///
  /// # Examples
  ///
  /// ```rust,no_run
  /// use pgframe::frame::{ColumnType, DataFrame, Schema, Value};
  /// use pgframe::store::FrameStore;
  ///
  /// #[tokio::main]
  /// async fn main() -> anyhow::Result<()> {
  ///   let schema = Schema::new([("word", ColumnType::Text), ("score", ColumnType::Float)]);
  ///   let mut frame = DataFrame::new(schema);
  ///   frame.push_row(vec![Value::from("Hello"), Value::from(6.0)])?;
  ///   frame.push_row(vec![Value::from("World"), Value::from(3.0)])?;
  ///
  ///   let store = FrameStore::connect("host=localhost user=postgres dbname=demo").await?;
  ///   store.create_table("greetings", &frame).await?;
  ///   store.disconnect().await?;
  ///   Ok(())
  /// }
  /// ```
  pub async fn create_table(&self, table: &str, frame: &DataFrame) -> AnyhowResult<()> {
    let statement = create_table_statement(table, frame.schema());
    debug!("{}", statement);
    self
      .client
      .execute(statement.as_str(), &[])
      .await
      .with_context(|| format!("Failed to create table {}", table))?;

    for record in frame.records() {
      self.insert_record(table, frame.schema(), &record).await?;
    }

    info!("Created table {} with {} record(s)", table, frame.len());
    Ok(())
  }

  /// Inserts one record, skipping it silently if the full column tuple is
  /// already present.
  ///
  /// Values are bound in schema order; the record's own key order does not
  /// matter. A record missing a schema column is a local error naming that
  /// column.
  ///
  /// # Arguments
  ///
  /// * `table` - Name of the target table.
  /// * `schema` - Column names and types driving the statement and binding order.
  /// * `record` - Column-name-to-value map for one row.
  ///
  /// # Returns
  ///
  /// * `Ok(())` - The record was inserted, or skipped as a duplicate.
  /// * `Err(anyhow::Error)` - A column was missing or execution failed.
  pub async fn insert_record(
    &self,
    table: &str,
    schema: &Schema,
    record: &Record,
  ) -> AnyhowResult<()> {
    let statement = insert_statement(table, schema);
    debug!("{}", statement);

    let params = bind_record(schema, record)?;
    self
      .client
      .execute(statement.as_str(), &params)
      .await
      .with_context(|| format!("Failed to insert record into {}", table))?;
    Ok(())
  }

  /// Materializes a whole table into a dataframe.
  ///
  /// The result schema comes from the prepared statement's column metadata,
  /// so names and types are preserved even when the table holds no rows; an
  /// empty table materializes as an empty frame with its column set intact.
  /// Columns whose catalog type falls outside the mirrored set are selected
  /// through a textual cast and tagged as text, so tables created by other
  /// tools still materialize whole.
  ///
  /// # Arguments
  ///
  /// * `table` - Name of the table to read.
  ///
  /// # Returns
  ///
  /// * `Ok(DataFrame)` - One row per table record, columns in table order.
  /// * `Err(anyhow::Error)` - The table is missing or a value failed to decode.
  pub async fn read_table(&self, table: &str) -> AnyhowResult<DataFrame> {
    let statement = self
      .client
      .prepare(&select_all_statement(table))
      .await
      .with_context(|| format!("Failed to prepare SELECT for table {}", table))?;

    let schema = Schema::new(
      statement
        .columns()
        .iter()
        .map(|column| (column.name(), column_type_of(column.type_()))),
    );

    let rows = if statement
      .columns()
      .iter()
      .any(|column| needs_text_cast(column.type_()))
    {
      let select = select_columns_statement(
        table,
        statement
          .columns()
          .iter()
          .map(|column| (column.name(), needs_text_cast(column.type_()))),
      );
      debug!("{}", select);
      self
        .client
        .query(select.as_str(), &[])
        .await
        .with_context(|| format!("Failed to fetch rows from table {}", table))?
    } else {
      self
        .client
        .query(&statement, &[])
        .await
        .with_context(|| format!("Failed to fetch rows from table {}", table))?
    };

    let mut frame = DataFrame::new(schema);
    for row in &rows {
      let mut values = Vec::with_capacity(row.len());
      for index in 0..row.len() {
        let value = read_value(row, index)
          .with_context(|| format!("Failed to read a value from table {}", table))?;
        values.push(value);
      }
      frame.push_row(values)?;
    }
    Ok(frame)
  }

  /// Lists every base table in the public schema, in name order.
  pub async fn list_tables(&self) -> AnyhowResult<Vec<String>> {
    let rows = self
      .client
      .query(list_tables_statement(), &[])
      .await
      .context("Failed to list tables")?;

    let mut tables = Vec::with_capacity(rows.len());
    for row in &rows {
      let name: String = row.try_get(0).context("Failed to read a table name")?;
      tables.push(name);
    }
    Ok(tables)
  }

  /// Dumps every table in the database to `<folder>/<table>.csv`.
  ///
  /// The folder is prepared first: dumping into an existing folder is
  /// refused unless `overwrite` is set, in which case the folder's previous
  /// contents are removed entirely. Tables are then materialized and written
  /// one at a time; a failure partway through leaves a partially populated
  /// folder behind (there is no rollback).
  ///
  /// # Arguments
  ///
  /// * `folder` - Target directory, created by this call.
  /// * `overwrite` - Replace the folder if it already exists.
  ///
  /// # Returns
  ///
  /// * `Ok(())` - One CSV file written per table.
  /// * `Err(anyhow::Error)` - The folder existed without `overwrite`, or a
  ///   table failed to materialize or serialize.
  pub async fn dump_to_csv(&self, folder: &Path, overwrite: bool) -> AnyhowResult<()> {
    prepare_dump_folder(folder, overwrite)?;

    let tables = self.list_tables().await?;
    info!("Dumping {} table(s) to {}", tables.len(), folder.display());

    for table in &tables {
      let frame = self.read_table(table).await?;
      let path = folder.join(format!("{}.csv", table));
      frame.write_csv(&path)?;
      info!("Wrote {} record(s) to {}", frame.len(), path.display());
    }
    Ok(())
  }
}

/// Connects, creates every (name, frame) pair in order, and disconnects.
///
/// One-shot convenience for seeding a database from a set of dataframes.
///
/// # Arguments
///
/// * `params` - PostgreSQL connection string.
/// * `tables` - Table names paired with the frames that define and seed them.
pub async fn initialize_database(
  params: &str,
  tables: &[(&str, DataFrame)],
) -> AnyhowResult<()> {
  let store = FrameStore::connect(params).await?;
  for (table, frame) in tables {
    store.create_table(table, frame).await?;
  }
  store.disconnect().await
}

/// Connects, dumps the whole database to CSV files, and disconnects.
///
/// One-shot convenience wrapping [`FrameStore::dump_to_csv`].
///
/// # Arguments
///
/// * `params` - PostgreSQL connection string.
/// * `folder` - Target directory for the CSV files.
/// * `overwrite` - Replace the folder if it already exists.
pub async fn dump_database_to_csv(
  params: &str,
  folder: &Path,
  overwrite: bool,
) -> AnyhowResult<()> {
  let store = FrameStore::connect(params).await?;
  store.dump_to_csv(folder, overwrite).await?;
  store.disconnect().await
}

/// Prepares the dump target folder.
///
/// Refusing to touch an existing folder without the overwrite flag is the
/// one failure condition this crate defines itself; everything else is
/// inherited from the store or the filesystem. With the flag set, the
/// folder's previous contents are removed entirely before it is recreated.
fn prepare_dump_folder(folder: &Path, overwrite: bool) -> AnyhowResult<()> {
  if folder.exists() {
    if !overwrite {
      bail!(
        "Folder {} already exists. Either set the overwrite flag or choose a new folder name",
        folder.display()
      );
    }
    fs::remove_dir_all(folder)
      .with_context(|| format!("Failed to clear folder {}", folder.display()))?;
  }
  fs::create_dir(folder)
    .with_context(|| format!("Failed to create folder {}", folder.display()))?;
  Ok(())
}

/// Maps a catalog type reported by the store to a column type tag.
///
/// Anything outside the mirrored set is tagged as text, mirroring the text
/// fallback used when generating DDL from a frame.
fn column_type_of(ty: &Type) -> ColumnType {
  if *ty == Type::BOOL {
    ColumnType::Boolean
  } else if *ty == Type::INT2 || *ty == Type::INT4 || *ty == Type::INT8 {
    ColumnType::Integer
  } else if *ty == Type::FLOAT4 || *ty == Type::FLOAT8 {
    ColumnType::Float
  } else if *ty == Type::TIMESTAMP || *ty == Type::TIMESTAMPTZ {
    ColumnType::Timestamp
  } else {
    ColumnType::Text
  }
}

/// Whether a column of this catalog type must be selected through a textual
/// cast.
///
/// True for everything `read_value` cannot decode directly. The cast renders
/// such columns as text on the server, which is what their `Text` schema tag
/// expects.
fn needs_text_cast(ty: &Type) -> bool {
  !(*ty == Type::BOOL
    || *ty == Type::INT2
    || *ty == Type::INT4
    || *ty == Type::INT8
    || *ty == Type::FLOAT4
    || *ty == Type::FLOAT8
    || *ty == Type::TIMESTAMP
    || *ty == Type::TIMESTAMPTZ
    || *ty == Type::TEXT
    || *ty == Type::VARCHAR
    || *ty == Type::BPCHAR
    || *ty == Type::NAME
    || *ty == Type::UNKNOWN)
}

/// Borrows a cell as a statement parameter of the column's type.
///
/// Nulls must be typed for the driver, which is why the column type rides
/// along: a Null in a boolean column binds as `Option::<bool>::None`, and so
/// on for the other tags.
fn bind_value<'a>(value: &'a Value, column_type: ColumnType) -> &'a (dyn ToSql + Sync) {
  static NONE_BOOLEAN: Option<bool> = None;
  static NONE_INTEGER: Option<i64> = None;
  static NONE_FLOAT: Option<f64> = None;
  static NONE_TEXT: Option<String> = None;
  static NONE_TIMESTAMP: Option<NaiveDateTime> = None;

  match value {
    Value::Null => match column_type {
      ColumnType::Boolean => &NONE_BOOLEAN,
      ColumnType::Integer => &NONE_INTEGER,
      ColumnType::Float => &NONE_FLOAT,
      ColumnType::Text => &NONE_TEXT,
      ColumnType::Timestamp => &NONE_TIMESTAMP,
    },
    Value::Boolean(value) => value,
    Value::Integer(value) => value,
    Value::Float(value) => value,
    Value::Text(value) => value,
    Value::Timestamp(value) => value,
  }
}

/// Assembles a record's cells as statement parameters in schema order.
///
/// The record's own key order does not matter; a record lacking a schema
/// column is an error naming that column.
fn bind_record<'a>(
  schema: &Schema,
  record: &'a Record,
) -> AnyhowResult<Vec<&'a (dyn ToSql + Sync)>> {
  let mut params = Vec::with_capacity(schema.len());
  for (name, column_type) in schema.iter() {
    let value = record
      .get(name)
      .ok_or_else(|| anyhow!("Record is missing a value for column {}", name))?;
    params.push(bind_value(value, column_type));
  }
  Ok(params)
}

/// Decodes one cell from a fetched row.
///
/// Dispatches on the column's catalog type: the mirrored five types decode
/// to their tags (narrow integers and floats widen, TIMESTAMPTZ becomes a
/// naive UTC timestamp) and text-like types decode as text. Anything else is
/// an error naming the column: [`FrameStore::read_table`] selects such
/// columns through a textual cast, so reaching that arm means the row was
/// fetched without one.
fn read_value(row: &Row, index: usize) -> AnyhowResult<Value> {
  let column = &row.columns()[index];
  let ty = column.type_();

  let value = if *ty == Type::BOOL {
    row
      .try_get::<_, Option<bool>>(index)?
      .map_or(Value::Null, Value::Boolean)
  } else if *ty == Type::INT2 {
    row
      .try_get::<_, Option<i16>>(index)?
      .map_or(Value::Null, |value| Value::Integer(value.into()))
  } else if *ty == Type::INT4 {
    row
      .try_get::<_, Option<i32>>(index)?
      .map_or(Value::Null, |value| Value::Integer(value.into()))
  } else if *ty == Type::INT8 {
    row
      .try_get::<_, Option<i64>>(index)?
      .map_or(Value::Null, Value::Integer)
  } else if *ty == Type::FLOAT4 {
    row
      .try_get::<_, Option<f32>>(index)?
      .map_or(Value::Null, |value| Value::Float(value.into()))
  } else if *ty == Type::FLOAT8 {
    row
      .try_get::<_, Option<f64>>(index)?
      .map_or(Value::Null, Value::Float)
  } else if *ty == Type::TIMESTAMP {
    row
      .try_get::<_, Option<NaiveDateTime>>(index)?
      .map_or(Value::Null, Value::Timestamp)
  } else if *ty == Type::TIMESTAMPTZ {
    row
      .try_get::<_, Option<DateTime<Utc>>>(index)?
      .map_or(Value::Null, |value| Value::Timestamp(value.naive_utc()))
  } else if *ty == Type::TEXT
    || *ty == Type::VARCHAR
    || *ty == Type::BPCHAR
    || *ty == Type::NAME
    || *ty == Type::UNKNOWN
  {
    row
      .try_get::<_, Option<String>>(index)?
      .map_or(Value::Null, Value::Text)
  } else {
    bail!("Column {} has unsupported type {}", column.name(), ty);
  };

  Ok(value)
}
