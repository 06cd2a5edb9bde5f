use super::types::{ColumnType, Value};
use anyhow::{bail, Context, Result as AnyhowResult};
use std::collections::BTreeMap;
use std::path::Path;

/// One row of a dataframe, keyed by column name.
///
/// Records are what [`DataFrame::records`] yields and what the store's insert
/// operation consumes; values are bound to statement parameters in schema
/// order, not map order.
pub type Record = BTreeMap<String, Value>;

/// Ordered mapping from column name to column type, derived from a dataframe.
///
/// Declaration order is preserved: it drives the column order of generated
/// CREATE TABLE statements, the full-tuple uniqueness constraint, and the
/// parameter order of generated INSERT statements.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    columns: Vec<(String, ColumnType)>,
}

impl Schema {
    /// Builds a schema from (name, type) pairs, keeping their order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pgframe::frame::{ColumnType, Schema};
    ///
    /// let schema = Schema::new([("word", ColumnType::Text), ("score", ColumnType::Float)]);
    /// assert_eq!(schema.names().collect::<Vec<_>>(), vec!["word", "score"]);
    /// ```
    pub fn new<N, I>(columns: I) -> Schema
    where
        N: Into<String>,
        I: IntoIterator<Item = (N, ColumnType)>,
    {
        Schema {
            columns: columns
                .into_iter()
                .map(|(name, column_type)| (name.into(), column_type))
                .collect(),
        }
    }

    /// Iterates over (name, type) pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, ColumnType)> {
        self.columns
            .iter()
            .map(|(name, column_type)| (name.as_str(), *column_type))
    }

    /// Iterates over column names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the schema has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// An in-memory tabular dataset: named, typed columns and ordered rows.
///
/// This is the unit the store mirrors into PostgreSQL and materializes back
/// out. Rows are validated on insertion, so a frame handed to the store is
/// always consistent with its own schema.
///
/// # Examples
///
/// ```rust
/// use pgframe::frame::{ColumnType, DataFrame, Schema, Value};
///
/// let schema = Schema::new([("word", ColumnType::Text), ("score", ColumnType::Float)]);
/// let mut frame = DataFrame::new(schema);
/// frame.push_row(vec![Value::from("Hello"), Value::from(6.0)]).unwrap();
/// frame.push_row(vec![Value::from("World"), Value::from(3.0)]).unwrap();
///
/// assert_eq!(frame.len(), 2);
/// let first = frame.records().next().unwrap();
/// assert_eq!(first["word"], Value::from("Hello"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DataFrame {
    schema: Schema,
    rows: Vec<Vec<Value>>,
}

impl DataFrame {
    /// Creates an empty frame with the given schema.
    pub fn new(schema: Schema) -> DataFrame {
        DataFrame {
            schema,
            rows: Vec::new(),
        }
    }

    /// Creates a frame from a schema and an iterator of rows.
    ///
    /// Every row is validated the same way [`DataFrame::push_row`] validates.
    ///
    /// # Arguments
    ///
    /// * `schema` - Column names and types, in order.
    /// * `rows` - Row values, each in schema order.
    ///
    /// # Returns
    ///
    /// * `Ok(DataFrame)` - All rows matched the schema.
    /// * `Err(anyhow::Error)` - A row had the wrong arity or a mistyped value.
    pub fn from_rows<I>(schema: Schema, rows: I) -> AnyhowResult<DataFrame>
    where
        I: IntoIterator<Item = Vec<Value>>,
    {
        let mut frame = DataFrame::new(schema);
        for row in rows {
            frame.push_row(row)?;
        }
        Ok(frame)
    }

    /// Appends one row, validating arity and cell types against the schema.
    ///
    /// A `Null` value is accepted in any column.
    ///
    /// # Arguments
    ///
    /// * `row` - Cell values in schema order.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The row was appended.
    /// * `Err(anyhow::Error)` - The row length differed from the column count,
    ///   or a value did not match its column's type tag.
    pub fn push_row(&mut self, row: Vec<Value>) -> AnyhowResult<()> {
        if row.len() != self.schema.len() {
            bail!(
                "Row has {} value(s) but the schema has {} column(s)",
                row.len(),
                self.schema.len()
            );
        }
        for ((name, column_type), value) in self.schema.iter().zip(row.iter()) {
            if let Some(value_type) = value.column_type() {
                if value_type != column_type {
                    bail!(
                        "Column {} expects {} but the row holds {}",
                        name,
                        column_type,
                        value_type
                    );
                }
            }
        }
        self.rows.push(row);
        Ok(())
    }

    /// The schema this frame was built with.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The rows in insertion order, each in schema order.
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the frame has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterates over the rows as [`Record`]s, in row order.
    pub fn records(&self) -> impl Iterator<Item = Record> + '_ {
        self.rows.iter().map(move |row| {
            let record: Record = self
                .schema
                .names()
                .zip(row.iter())
                .map(|(name, value)| (name.to_string(), value.clone()))
                .collect();
            record
        })
    }

    /// Serializes the frame to a CSV file.
    ///
    /// The header row starts with an empty field for the index column, then
    /// the column names. Each data row starts with its 0-based row index.
    /// A frame with no rows produces a header-only file.
    ///
    /// # Arguments
    ///
    /// * `path` - Destination file; created or truncated.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The file was written and flushed.
    /// * `Err(anyhow::Error)` - The file could not be created or written.
    pub fn write_csv(&self, path: &Path) -> AnyhowResult<()> {
        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;

        let mut header = Vec::with_capacity(self.schema.len() + 1);
        header.push(String::new());
        header.extend(self.schema.names().map(str::to_string));
        writer
            .write_record(&header)
            .with_context(|| format!("Failed to write header to {}", path.display()))?;

        for (index, row) in self.rows.iter().enumerate() {
            let mut fields = Vec::with_capacity(row.len() + 1);
            fields.push(index.to_string());
            fields.extend(row.iter().map(Value::to_csv_field));
            writer
                .write_record(&fields)
                .with_context(|| format!("Failed to write row {} to {}", index, path.display()))?;
        }

        writer
            .flush()
            .with_context(|| format!("Failed to flush {}", path.display()))?;
        Ok(())
    }
}
