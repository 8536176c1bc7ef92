//! Replication status query selection.
//!
//! Multi-source replication is addressed differently per flavor: MariaDB
//! names a *connection* (`SHOW SLAVE 'name' STATUS`), MySQL and Percona name
//! a *channel* (`SHOW SLAVE STATUS FOR CHANNEL 'name'`). The name ends up
//! inside a quoted literal, so it is validated before any query is built.

use tracing::warn;

use crate::error::CheckError;
use crate::flavor::FlavorKind;

pub const SLAVE_STATUS_QUERY: &str = "SHOW SLAVE STATUS";

/// Longest channel name the server accepts.
pub const MAX_CHANNEL_NAME_LEN: usize = 64;

/// Which replication stream the check looks at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConnectionTarget {
    /// The default, single-source replication stream
    #[default]
    Default,
    /// A named multi-source channel / connection
    Named(String),
}

impl ConnectionTarget {
    pub fn from_option(name: Option<String>) -> Self {
        match name {
            Some(name) => ConnectionTarget::Named(name),
            None => ConnectionTarget::Default,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            ConnectionTarget::Default => None,
            ConnectionTarget::Named(name) => Some(name),
        }
    }
}

/// Reject names that could escape the quoted literal they are placed in.
pub fn validate_channel_name(name: &str) -> Result<(), CheckError> {
    let invalid = |reason| CheckError::InvalidChannelName {
        name: name.to_string(),
        reason,
    };

    if name.is_empty() {
        return Err(invalid("name is empty"));
    }
    if name.chars().count() > MAX_CHANNEL_NAME_LEN {
        return Err(invalid("name is longer than 64 characters"));
    }
    if name.chars().any(char::is_control) {
        return Err(invalid("name contains a control character"));
    }
    if name.contains(['\'', '"', '`']) {
        return Err(invalid("name contains a quote character"));
    }
    if name.contains('\\') {
        return Err(invalid("name contains a backslash"));
    }
    Ok(())
}

/// Build the status query for `flavor` and `target`.
pub fn status_query(flavor: FlavorKind, target: &ConnectionTarget) -> Result<String, CheckError> {
    let name = match target {
        ConnectionTarget::Default => return Ok(SLAVE_STATUS_QUERY.to_string()),
        ConnectionTarget::Named(name) => name,
    };

    validate_channel_name(name)?;

    let query = match flavor {
        FlavorKind::MariaDB => format!("SHOW SLAVE '{name}' STATUS"),
        FlavorKind::MySQL | FlavorKind::Percona => channel_query(name),
        FlavorKind::Unknown => {
            warn!(
                channel = %name,
                "Unrecognized server flavor, addressing the replication channel with MySQL syntax"
            );
            channel_query(name)
        }
    };
    Ok(query)
}

fn channel_query(name: &str) -> String {
    format!("SHOW SLAVE STATUS FOR CHANNEL '{name}'")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> ConnectionTarget {
        ConnectionTarget::Named(name.to_string())
    }

    #[test]
    fn test_default_target_ignores_flavor() {
        for flavor in [
            FlavorKind::MySQL,
            FlavorKind::MariaDB,
            FlavorKind::Percona,
            FlavorKind::Unknown,
        ] {
            assert_eq!(
                status_query(flavor, &ConnectionTarget::Default).unwrap(),
                "SHOW SLAVE STATUS"
            );
        }
    }

    #[test]
    fn test_mariadb_connection_syntax() {
        assert_eq!(
            status_query(FlavorKind::MariaDB, &named("chan1")).unwrap(),
            "SHOW SLAVE 'chan1' STATUS"
        );
    }

    #[test]
    fn test_channel_syntax() {
        assert_eq!(
            status_query(FlavorKind::MySQL, &named("chan1")).unwrap(),
            "SHOW SLAVE STATUS FOR CHANNEL 'chan1'"
        );
        assert_eq!(
            status_query(FlavorKind::Percona, &named("chan1")).unwrap(),
            "SHOW SLAVE STATUS FOR CHANNEL 'chan1'"
        );
    }

    #[test]
    fn test_unknown_flavor_uses_channel_syntax() {
        assert_eq!(
            status_query(FlavorKind::Unknown, &named("chan1")).unwrap(),
            "SHOW SLAVE STATUS FOR CHANNEL 'chan1'"
        );
    }

    #[test]
    fn test_rejects_injection() {
        for name in [
            "x'; DROP TABLE users; --",
            "a\"b",
            "a`b",
            "a\\b",
            "line\nbreak",
            "nul\0",
            "",
        ] {
            let err = status_query(FlavorKind::MySQL, &named(name)).unwrap_err();
            assert!(
                matches!(err, CheckError::InvalidChannelName { .. }),
                "{name:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_name_length_limit() {
        let longest = "c".repeat(MAX_CHANNEL_NAME_LEN);
        assert!(validate_channel_name(&longest).is_ok());

        let too_long = "c".repeat(MAX_CHANNEL_NAME_LEN + 1);
        assert!(validate_channel_name(&too_long).is_err());
    }

    #[test]
    fn test_accepts_ordinary_names() {
        for name in ["chan1", "source-eu_west.2", "Primary DC"] {
            assert!(validate_channel_name(name).is_ok(), "{name:?}");
        }
    }
}
