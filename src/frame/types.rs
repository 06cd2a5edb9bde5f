use chrono::NaiveDateTime;
use std::fmt;

/// Type tag for one dataframe column.
///
/// Each tag corresponds to exactly one PostgreSQL column type, so a schema of
/// tags is enough to synthesize a CREATE TABLE statement. The reverse mapping
/// (from a catalog type reported by the store back to a tag) lives in the
/// store module and falls back to `Text` for anything it does not recognize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// 64-bit signed integer, stored as `BIGINT`.
    Integer,
    /// 64-bit float, stored as `DOUBLE PRECISION`.
    Float,
    /// UTF-8 text, stored as `TEXT`.
    Text,
    /// Boolean, stored as `BOOLEAN`.
    Boolean,
    /// Naive timestamp (no time zone), stored as `TIMESTAMP`.
    Timestamp,
}

impl ColumnType {
    /// Returns the PostgreSQL type keyword used for this tag in generated
    /// CREATE TABLE statements.
    pub fn sql_type(self) -> &'static str {
        match self {
            ColumnType::Integer => "BIGINT",
            ColumnType::Float => "DOUBLE PRECISION",
            ColumnType::Text => "TEXT",
            ColumnType::Boolean => "BOOLEAN",
            ColumnType::Timestamp => "TIMESTAMP",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::Text => "text",
            ColumnType::Boolean => "boolean",
            ColumnType::Timestamp => "timestamp",
        };
        write!(f, "{}", name)
    }
}

/// One cell of a dataframe.
///
/// `Null` is permitted in any column regardless of its type tag; every other
/// variant carries the single Rust representation of its column type.
///
/// # Examples
///
/// ```rust
/// use pgframe::frame::{ColumnType, Value};
///
/// let cell = Value::from(6.0);
/// assert_eq!(cell.column_type(), Some(ColumnType::Float));
/// assert_eq!(Value::Null.column_type(), None);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// SQL NULL.
    Null,
    /// A boolean cell.
    Boolean(bool),
    /// A 64-bit integer cell.
    Integer(i64),
    /// A 64-bit float cell.
    Float(f64),
    /// A text cell.
    Text(String),
    /// A naive timestamp cell.
    Timestamp(NaiveDateTime),
}

impl Value {
    /// Returns the column type tag this value belongs to, or `None` for
    /// `Null`, which fits any column.
    pub fn column_type(&self) -> Option<ColumnType> {
        match self {
            Value::Null => None,
            Value::Boolean(_) => Some(ColumnType::Boolean),
            Value::Integer(_) => Some(ColumnType::Integer),
            Value::Float(_) => Some(ColumnType::Float),
            Value::Text(_) => Some(ColumnType::Text),
            Value::Timestamp(_) => Some(ColumnType::Timestamp),
        }
    }

    /// Renders this value as one CSV field.
    ///
    /// `Null` becomes an empty field. Floats always carry a decimal point
    /// (`6.0`, not `6`), keeping a float column's cells distinguishable from
    /// an integer column's when the file is read back. Timestamps render as
    /// `YYYY-MM-DD HH:MM:SS`, with fractional seconds only when nonzero.
    pub fn to_csv_field(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Boolean(value) => value.to_string(),
            Value::Integer(value) => value.to_string(),
            Value::Float(value) => {
                if value.fract() == 0.0 && value.is_finite() {
                    format!("{:.1}", value)
                } else {
                    value.to_string()
                }
            }
            Value::Text(value) => value.clone(),
            Value::Timestamp(value) => value.to_string(),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Value {
        Value::Boolean(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Value {
        Value::Integer(value.into())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Value {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Value {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Value {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Value {
        Value::Text(value)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Value {
        Value::Timestamp(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    /// Tests that every type tag maps to its PostgreSQL keyword.
    #[test]
    fn test_sql_type_keywords() {
        assert_eq!(ColumnType::Integer.sql_type(), "BIGINT");
        assert_eq!(ColumnType::Float.sql_type(), "DOUBLE PRECISION");
        assert_eq!(ColumnType::Text.sql_type(), "TEXT");
        assert_eq!(ColumnType::Boolean.sql_type(), "BOOLEAN");
        assert_eq!(ColumnType::Timestamp.sql_type(), "TIMESTAMP");
    }

    /// Tests CSV field rendering for each value variant.
    #[test]
    fn test_to_csv_field() {
        let timestamp = NaiveDate::from_ymd_opt(2022, 4, 9)
            .unwrap()
            .and_hms_opt(0, 29, 37)
            .unwrap();

        assert_eq!(Value::Null.to_csv_field(), "");
        assert_eq!(Value::Boolean(true).to_csv_field(), "true");
        assert_eq!(Value::Integer(-42).to_csv_field(), "-42");
        assert_eq!(Value::Float(3.5).to_csv_field(), "3.5");
        assert_eq!(Value::Text("Hello".to_string()).to_csv_field(), "Hello");
        assert_eq!(
            Value::Timestamp(timestamp).to_csv_field(),
            "2022-04-09 00:29:37"
        );
    }

    /// Tests that whole floats keep a decimal point while fractional and
    /// non-finite floats render as-is.
    #[test]
    fn test_to_csv_field_whole_float() {
        assert_eq!(Value::Float(6.0).to_csv_field(), "6.0");
        assert_eq!(Value::Float(-5.0).to_csv_field(), "-5.0");
        assert_eq!(Value::Float(3.5).to_csv_field(), "3.5");
        assert_eq!(Value::Float(f64::INFINITY).to_csv_field(), "inf");
    }

    /// Tests the value-to-tag mapping used by row validation.
    #[test]
    fn test_column_type_of_values() {
        assert_eq!(Value::Null.column_type(), None);
        assert_eq!(Value::from(true).column_type(), Some(ColumnType::Boolean));
        assert_eq!(Value::from(7).column_type(), Some(ColumnType::Integer));
        assert_eq!(Value::from(7i64).column_type(), Some(ColumnType::Integer));
        assert_eq!(Value::from(7.0).column_type(), Some(ColumnType::Float));
        assert_eq!(Value::from("x").column_type(), Some(ColumnType::Text));
    }
}
