//! Classification of a parsed replication status into a severity level.

use crate::query::ConnectionTarget;
use crate::report::CheckResult;
use crate::status::ParsedStatus;

pub const DEFAULT_WARNING_SECS: i64 = 900;
pub const DEFAULT_CRITICAL_SECS: i64 = 1800;

/// Replication lag thresholds in seconds.
///
/// Lag strictly above `warning` warns; lag at or above `critical` is critical.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    pub warning: i64,
    pub critical: i64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            warning: DEFAULT_WARNING_SECS,
            critical: DEFAULT_CRITICAL_SECS,
        }
    }
}

/// Classify `status`. The first matching rule wins:
///
/// 1. IO or SQL thread stopped: CRITICAL
/// 2. lag >= critical: CRITICAL
/// 3. lag > warning: WARNING
/// 4. OK
///
/// Absent lag skips rules 2 and 3. An incomplete row never changes the
/// level; it only appends a note to the message.
pub fn evaluate(
    status: &ParsedStatus,
    target: &ConnectionTarget,
    thresholds: &Thresholds,
) -> CheckResult {
    let subject = subject(target);

    let mut result = if !status.io_running || !status.sql_running {
        let mut message = format!(
            "{subject} not running! IO: {}, SQL: {}, Last_SQL_Error: {}",
            yes_no(status.io_running),
            yes_no(status.sql_running),
            status.last_sql_error
        );
        if !status.last_io_error.is_empty() {
            message.push_str(&format!(", Last_IO_Error: {}", status.last_io_error));
        }
        CheckResult::critical(message)
    } else {
        match status.lag_seconds {
            Some(lag) if lag >= thresholds.critical => CheckResult::critical(format!(
                "{subject} replication delayed by {lag} seconds (critical at {})",
                thresholds.critical
            )),
            Some(lag) if lag > thresholds.warning => CheckResult::warning(format!(
                "{subject} replication delayed by {lag} seconds (warning above {})",
                thresholds.warning
            )),
            Some(lag) => CheckResult::ok(format!(
                "{subject} running, IO: Yes, SQL: Yes, replication delayed by {lag} seconds"
            )),
            None => CheckResult::ok(format!(
                "{subject} running, IO: Yes, SQL: Yes, no lag data (Seconds_Behind_Master is NULL or missing)"
            )),
        }
    };

    if !status.fields_complete {
        result.message.push_str(&format!(
            " [couldn't detect replication status: missing {}]",
            status.missing_fields.join(", ")
        ));
    }
    result
}

fn subject(target: &ConnectionTarget) -> String {
    match target {
        ConnectionTarget::Default => "Slave".to_string(),
        ConnectionTarget::Named(name) => format!("Master connection '{name}'"),
    }
}

fn yes_no(running: bool) -> &'static str {
    if running {
        "Yes"
    } else {
        "No"
    }
}
