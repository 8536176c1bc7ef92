//! Replication status row parsing

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::connection::QueryRow;

pub const SLAVE_IO_STATE: &str = "Slave_IO_State";
pub const SLAVE_IO_RUNNING: &str = "Slave_IO_Running";
pub const SLAVE_SQL_RUNNING: &str = "Slave_SQL_Running";
pub const LAST_IO_ERROR: &str = "Last_IO_Error";
pub const LAST_SQL_ERROR: &str = "Last_SQL_Error";
pub const SECONDS_BEHIND_MASTER: &str = "Seconds_Behind_Master";

/// Fields a complete status row carries.
pub const EXPECTED_FIELDS: [&str; 6] = [
    SLAVE_IO_STATE,
    SLAVE_IO_RUNNING,
    SLAVE_SQL_RUNNING,
    LAST_IO_ERROR,
    LAST_SQL_ERROR,
    SECONDS_BEHIND_MASTER,
];

// Servers using replica/source terminology (SHOW REPLICA STATUS) report
// these names instead of the legacy ones.
const COLUMN_ALIASES: [(&str, &str); 4] = [
    ("Replica_IO_State", SLAVE_IO_STATE),
    ("Replica_IO_Running", SLAVE_IO_RUNNING),
    ("Replica_SQL_Running", SLAVE_SQL_RUNNING),
    ("Seconds_Behind_Source", SECONDS_BEHIND_MASTER),
];

/// A replication status row keyed by legacy column names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplicationStatusRow {
    fields: BTreeMap<String, Option<String>>,
}

impl ReplicationStatusRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, value: Option<String>) {
        let name = COLUMN_ALIASES
            .iter()
            .find(|(alias, _)| *alias == name)
            .map_or(name, |(_, legacy)| *legacy);
        self.fields.insert(name.to_string(), value);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Value of `name`, or `None` if it is missing or NULL.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(|value| value.as_deref())
    }
}

impl From<&QueryRow> for ReplicationStatusRow {
    fn from(row: &QueryRow) -> Self {
        let mut status = ReplicationStatusRow::new();
        for (name, value) in row.columns() {
            status.insert(name, value.map(str::to_string));
        }
        status
    }
}

/// Structured view of a replication status row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedStatus {
    pub io_running: bool,
    pub sql_running: bool,
    /// `None` when the server reported NULL or a non-numeric value
    pub lag_seconds: Option<i64>,
    pub last_sql_error: String,
    pub last_io_error: String,
    pub io_state: String,
    /// True only if every one of [`EXPECTED_FIELDS`] was present
    pub fields_complete: bool,
    pub missing_fields: Vec<&'static str>,
}

/// Result of parsing a status query's result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusOutcome {
    /// No row: the server is not configured as a replica
    NoRow,
    Parsed(ParsedStatus),
}

/// Parse the rows of a status query.
///
/// A status query yields at most one row. Should a server return more, the
/// first row is used.
pub fn parse_status(rows: &[QueryRow]) -> StatusOutcome {
    let Some(first) = rows.first() else {
        debug!("Status query returned no rows");
        return StatusOutcome::NoRow;
    };
    if rows.len() > 1 {
        warn!(
            rows = rows.len(),
            "Status query returned more than one row, using the first"
        );
    }
    StatusOutcome::Parsed(parse_row(&ReplicationStatusRow::from(first)))
}

pub fn parse_row(row: &ReplicationStatusRow) -> ParsedStatus {
    let missing_fields: Vec<&'static str> = EXPECTED_FIELDS
        .iter()
        .copied()
        .filter(|field| !row.contains(field))
        .collect();

    if !missing_fields.is_empty() {
        warn!(missing = ?missing_fields, "Replication status row is incomplete");
    }

    ParsedStatus {
        io_running: is_running(row.get(SLAVE_IO_RUNNING)),
        sql_running: is_running(row.get(SLAVE_SQL_RUNNING)),
        lag_seconds: row
            .get(SECONDS_BEHIND_MASTER)
            .and_then(|lag| lag.trim().parse::<i64>().ok()),
        last_sql_error: row.get(LAST_SQL_ERROR).unwrap_or_default().to_string(),
        last_io_error: row.get(LAST_IO_ERROR).unwrap_or_default().to_string(),
        io_state: row.get(SLAVE_IO_STATE).unwrap_or_default().to_string(),
        fields_complete: missing_fields.is_empty(),
        missing_fields,
    }
}

// Substring match: the value only has to contain "Yes".
fn is_running(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.contains("Yes"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn healthy_row() -> QueryRow {
        QueryRow::new()
            .with(SLAVE_IO_STATE, "Waiting for master to send event")
            .with("Master_Host", "db1.example.com")
            .with(SLAVE_IO_RUNNING, "Yes")
            .with(SLAVE_SQL_RUNNING, "Yes")
            .with(LAST_IO_ERROR, "")
            .with(LAST_SQL_ERROR, "")
            .with(SECONDS_BEHIND_MASTER, "12")
    }

    fn parsed(rows: &[QueryRow]) -> ParsedStatus {
        match parse_status(rows) {
            StatusOutcome::Parsed(status) => status,
            StatusOutcome::NoRow => panic!("expected a parsed status"),
        }
    }

    #[test]
    fn test_no_row() {
        assert_eq!(parse_status(&[]), StatusOutcome::NoRow);
    }

    #[test]
    fn test_healthy_row() {
        let status = parsed(&[healthy_row()]);
        assert!(status.io_running);
        assert!(status.sql_running);
        assert_eq!(status.lag_seconds, Some(12));
        assert_eq!(status.io_state, "Waiting for master to send event");
        assert!(status.fields_complete);
        assert!(status.missing_fields.is_empty());
    }

    #[test]
    fn test_running_is_substring_match() {
        let row = QueryRow::new()
            .with(SLAVE_IO_RUNNING, "Yes (reconnecting)")
            .with(SLAVE_SQL_RUNNING, "Connecting");
        let status = parsed(&[row]);
        assert!(status.io_running);
        assert!(!status.sql_running);
    }

    #[test]
    fn test_null_lag_is_absent_not_zero() {
        let row = QueryRow::new()
            .with(SLAVE_IO_STATE, "Reconnecting after a failed master event read")
            .with(SLAVE_IO_RUNNING, "No")
            .with(SLAVE_SQL_RUNNING, "Yes")
            .with(LAST_IO_ERROR, "error reconnecting to master")
            .with(LAST_SQL_ERROR, "")
            .with_null(SECONDS_BEHIND_MASTER);
        let status = parsed(&[row]);
        assert_eq!(status.lag_seconds, None);
        assert!(status.fields_complete);
    }

    #[test]
    fn test_non_numeric_lag_is_absent() {
        let mut row = ReplicationStatusRow::from(&healthy_row());
        row.insert(SECONDS_BEHIND_MASTER, Some("n/a".to_string()));
        assert_eq!(parse_row(&row).lag_seconds, None);
    }

    #[test]
    fn test_missing_fields_are_reported() {
        let row = QueryRow::new()
            .with(SLAVE_IO_STATE, "")
            .with(SLAVE_IO_RUNNING, "Yes")
            .with(SLAVE_SQL_RUNNING, "Yes")
            .with(LAST_IO_ERROR, "")
            .with(SECONDS_BEHIND_MASTER, "3");
        let status = parsed(&[row]);
        assert!(!status.fields_complete);
        assert_eq!(status.missing_fields, vec![LAST_SQL_ERROR]);
        assert_eq!(status.lag_seconds, Some(3));
        assert_eq!(status.last_sql_error, "");
    }

    #[test]
    fn test_replica_terminology_aliases() {
        let row = QueryRow::new()
            .with("Replica_IO_State", "Waiting for source to send event")
            .with("Replica_IO_Running", "Yes")
            .with("Replica_SQL_Running", "Yes")
            .with(LAST_IO_ERROR, "")
            .with(LAST_SQL_ERROR, "")
            .with("Seconds_Behind_Source", "0");
        let status = parsed(&[row]);
        assert!(status.io_running);
        assert!(status.sql_running);
        assert_eq!(status.lag_seconds, Some(0));
        assert!(status.fields_complete);
    }

    #[test]
    fn test_first_row_wins() {
        let lagging = QueryRow::new()
            .with(SLAVE_IO_RUNNING, "Yes")
            .with(SLAVE_SQL_RUNNING, "Yes")
            .with(SECONDS_BEHIND_MASTER, "999");
        let status = parsed(&[healthy_row(), lagging]);
        assert_eq!(status.lag_seconds, Some(12));
    }
}
