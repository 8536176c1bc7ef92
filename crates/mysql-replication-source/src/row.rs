//! mysql_async row → `QueryRow` conversion.

use mysql_async::{Row, Value};
use replication_check::QueryRow;

pub(crate) fn row_to_query_row(row: &Row) -> QueryRow {
    let columns = row.columns_ref();
    to_query_row(
        columns
            .iter()
            .enumerate()
            .map(|(i, column)| (column.name_str().into_owned(), row.as_ref(i))),
    )
}

/// Build a `QueryRow` from column names and their raw values.
///
/// A value that is missing from the row (already taken) is treated as NULL.
pub fn to_query_row<'a, I>(columns: I) -> QueryRow
where
    I: IntoIterator<Item = (String, Option<&'a Value>)>,
{
    let mut row = QueryRow::new();
    for (name, value) in columns {
        row.push(name, value.and_then(value_to_text));
    }
    row
}

/// Textual form of a column value, `None` for SQL NULL.
///
/// SHOW statements use the text protocol, so values normally arrive as
/// `Bytes`; the other variants are handled for completeness.
pub fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::NULL => None,
        Value::Bytes(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
        Value::Int(i) => Some(i.to_string()),
        Value::UInt(u) => Some(u.to_string()),
        Value::Float(f) => Some(f.to_string()),
        Value::Double(d) => Some(d.to_string()),
        other => Some(other.as_sql(true).trim_matches('\'').to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_to_text() {
        assert_eq!(value_to_text(&Value::NULL), None);
        assert_eq!(
            value_to_text(&Value::Bytes(b"Yes".to_vec())).as_deref(),
            Some("Yes")
        );
        assert_eq!(value_to_text(&Value::Int(-3)).as_deref(), Some("-3"));
        assert_eq!(value_to_text(&Value::UInt(1800)).as_deref(), Some("1800"));
    }

    #[test]
    fn test_to_query_row_keeps_nulls_and_order() {
        let io = Value::Bytes(b"Yes".to_vec());
        let lag = Value::NULL;
        let row = to_query_row(vec![
            ("Slave_IO_Running".to_string(), Some(&io)),
            ("Seconds_Behind_Master".to_string(), Some(&lag)),
            ("Last_SQL_Error".to_string(), None),
        ]);

        assert_eq!(row.get("Slave_IO_Running"), Some(Some("Yes")));
        assert_eq!(row.get("Seconds_Behind_Master"), Some(None));
        assert_eq!(row.get("Last_SQL_Error"), Some(None));
        assert_eq!(
            row.columns().map(|(name, _)| name).collect::<Vec<_>>(),
            vec!["Slave_IO_Running", "Seconds_Behind_Master", "Last_SQL_Error"]
        );
    }
}
