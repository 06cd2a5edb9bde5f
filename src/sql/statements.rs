use crate::frame::Schema;

/// Double-quotes an identifier, doubling any embedded quotes.
///
/// Generated statements always quote table and column names so mixed-case
/// identifiers survive PostgreSQL's case folding and round-trip through the
/// catalog unchanged.
fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Builds the CREATE TABLE statement for a table mirroring the given schema.
///
/// Columns appear in schema order, each mapped to its PostgreSQL type
/// keyword, followed by a UNIQUE constraint spanning the full column tuple.
/// That constraint is what makes re-inserting an existing row a no-op (see
/// [`insert_statement`]).
///
/// A zero-column schema yields a statement the store will reject; the
/// store's error is the caller's signal, as with any other malformed input.
///
/// # Arguments
///
/// * `table` - Name of the table to create.
/// * `schema` - Column names and types, in order.
///
/// # Examples
///
/// ```rust
/// use pgframe::frame::{ColumnType, Schema};
/// use pgframe::sql::create_table_statement;
///
/// let schema = Schema::new([("word", ColumnType::Text), ("score", ColumnType::Float)]);
/// assert_eq!(
///     create_table_statement("greetings", &schema),
///     "CREATE TABLE \"greetings\" (\"word\" TEXT, \"score\" DOUBLE PRECISION, \
///      UNIQUE (\"word\", \"score\"))"
/// );
/// ```
pub fn create_table_statement(table: &str, schema: &Schema) -> String {
    let columns = schema
        .iter()
        .map(|(name, column_type)| {
            format!("{} {}", quote_identifier(name), column_type.sql_type())
        })
        .collect::<Vec<_>>()
        .join(", ");
    let unique = schema
        .names()
        .map(quote_identifier)
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "CREATE TABLE {} ({}, UNIQUE ({}))",
        quote_identifier(table),
        columns,
        unique
    )
}

/// Builds the parameterized INSERT statement for one record.
///
/// Placeholders are numbered in schema order, and the ON CONFLICT clause
/// names the same full column tuple as the table's UNIQUE constraint, so
/// inserting a duplicate row does nothing instead of failing.
///
/// # Arguments
///
/// * `table` - Name of the target table.
/// * `schema` - Column names and types, in order.
pub fn insert_statement(table: &str, schema: &Schema) -> String {
    let columns = schema
        .names()
        .map(quote_identifier)
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = (1..=schema.len())
        .map(|index| format!("${}", index))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES ({}) ON CONFLICT ({}) DO NOTHING",
        quote_identifier(table),
        columns,
        placeholders,
        columns
    )
}

/// Builds the SELECT statement that materializes a whole table.
pub fn select_all_statement(table: &str) -> String {
    format!("SELECT * FROM {}", quote_identifier(table))
}

/// Builds a SELECT statement reading the named columns in order, casting the
/// flagged ones to text.
///
/// The store uses this when a table holds columns outside the mirrored type
/// set: selecting those through a textual cast lets every table materialize
/// (and dump) instead of failing on the first exotic column type.
///
/// # Arguments
///
/// * `table` - Name of the table to read.
/// * `columns` - Column names in order, each flagged true to cast to text.
pub fn select_columns_statement<'a, I>(table: &str, columns: I) -> String
where
    I: IntoIterator<Item = (&'a str, bool)>,
{
    let list = columns
        .into_iter()
        .map(|(name, cast_to_text)| {
            if cast_to_text {
                format!("{}::text", quote_identifier(name))
            } else {
                quote_identifier(name)
            }
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!("SELECT {} FROM {}", list, quote_identifier(table))
}

/// The catalog query listing every base table in the public schema.
///
/// Ordered by name so dumps enumerate tables deterministically.
pub fn list_tables_statement() -> &'static str {
    "SELECT table_name FROM information_schema.tables \
     WHERE table_schema = 'public' AND table_type = 'BASE TABLE' \
     ORDER BY table_name"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::ColumnType;

    /// Tests CREATE TABLE generation with the full-tuple UNIQUE constraint.
    #[test]
    fn test_create_table_statement() {
        let schema = Schema::new([("word", ColumnType::Text), ("score", ColumnType::Float)]);
        assert_eq!(
            create_table_statement("greetings", &schema),
            "CREATE TABLE \"greetings\" (\"word\" TEXT, \"score\" DOUBLE PRECISION, \
             UNIQUE (\"word\", \"score\"))"
        );
    }

    /// Tests that every column type keyword appears in generated DDL.
    #[test]
    fn test_create_table_statement_covers_all_types() {
        let schema = Schema::new([
            ("a", ColumnType::Integer),
            ("b", ColumnType::Float),
            ("c", ColumnType::Text),
            ("d", ColumnType::Boolean),
            ("e", ColumnType::Timestamp),
        ]);
        let statement = create_table_statement("t", &schema);
        assert!(statement.contains("\"a\" BIGINT"));
        assert!(statement.contains("\"b\" DOUBLE PRECISION"));
        assert!(statement.contains("\"c\" TEXT"));
        assert!(statement.contains("\"d\" BOOLEAN"));
        assert!(statement.contains("\"e\" TIMESTAMP"));
        assert!(statement.ends_with("UNIQUE (\"a\", \"b\", \"c\", \"d\", \"e\"))"));
    }

    /// Tests that mixed-case and quote-bearing identifiers are quoted.
    #[test]
    fn test_identifiers_are_quoted() {
        let schema = Schema::new([("Col1", ColumnType::Text)]);
        let statement = create_table_statement("He\"llo", &schema);
        assert!(statement.starts_with("CREATE TABLE \"He\"\"llo\""));
        assert!(statement.contains("\"Col1\" TEXT"));
    }

    /// Tests INSERT generation: ordered placeholders plus the conflict-skip
    /// clause over the full column tuple.
    #[test]
    fn test_insert_statement() {
        let schema = Schema::new([("word", ColumnType::Text), ("score", ColumnType::Float)]);
        assert_eq!(
            insert_statement("greetings", &schema),
            "INSERT INTO \"greetings\" (\"word\", \"score\") VALUES ($1, $2) \
             ON CONFLICT (\"word\", \"score\") DO NOTHING"
        );
    }

    /// Tests SELECT * generation.
    #[test]
    fn test_select_all_statement() {
        assert_eq!(select_all_statement("T"), "SELECT * FROM \"T\"");
    }

    /// Tests column selection with textual casts on the flagged columns.
    #[test]
    fn test_select_columns_statement_casts_flagged_columns() {
        assert_eq!(
            select_columns_statement("t", [("plain", false), ("exotic", true)]),
            "SELECT \"plain\", \"exotic\"::text FROM \"t\""
        );
    }

    /// Tests that the catalog query targets base tables in the public schema.
    #[test]
    fn test_list_tables_statement_targets_base_tables() {
        let statement = list_tables_statement();
        assert!(statement.contains("information_schema.tables"));
        assert!(statement.contains("table_schema = 'public'"));
        assert!(statement.contains("table_type = 'BASE TABLE'"));
    }
}
