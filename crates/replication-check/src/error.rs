//! Error taxonomy for the replication check.
//!
//! Every failure the check can hit is a [`CheckError`] variant. The runner
//! maps each variant to exactly one [`Level`], so nothing escapes the check
//! without producing a result.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::report::Level;

/// Error reported by the database driver collaborator.
///
/// `code` and `sql_state` are only present for errors the server itself
/// returned (an ERR packet); client-side failures such as a refused TCP
/// connection only carry a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverError {
    pub code: Option<u16>,
    pub message: String,
    pub sql_state: Option<String>,
}

impl DriverError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
            sql_state: None,
        }
    }

    pub fn server(code: u16, message: impl Into<String>, sql_state: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            message: message.into(),
            sql_state: Some(sql_state.into()),
        }
    }
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(code) = self.code {
            write!(f, "Error code: {code} ")?;
        }
        write!(f, "Error message: {}", self.message)?;
        if let Some(state) = self.sql_state.as_deref().filter(|s| !s.is_empty()) {
            write!(f, " SQLSTATE: {state}")?;
        }
        Ok(())
    }
}

impl std::error::Error for DriverError {}

/// Failure of a replication check.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("Missing credentials: {} not provided", .missing.join(", "))]
    MissingCredentials { missing: Vec<&'static str> },

    #[error("Unable to load credentials from {path:?}: {reason}")]
    IniFile { path: PathBuf, reason: String },

    #[error("Invalid master connection name {name:?}: {reason}")]
    InvalidChannelName { name: String, reason: &'static str },

    #[error("Connection failed. {0}")]
    Connection(DriverError),

    #[error("Unable to detect server flavor. {0}")]
    FlavorQueryFailed(DriverError),

    #[error("Query {query:?} failed. {source}")]
    Query { query: String, source: DriverError },

    #[error("{0}")]
    Unexpected(String),
}

impl CheckError {
    /// Severity this failure is reported with.
    pub fn level(&self) -> Level {
        match self {
            CheckError::MissingCredentials { .. }
            | CheckError::IniFile { .. }
            | CheckError::InvalidChannelName { .. } => Level::Unknown,
            CheckError::Connection(_)
            | CheckError::FlavorQueryFailed(_)
            | CheckError::Query { .. }
            | CheckError::Unexpected(_) => Level::Critical,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_error_display_includes_code_and_state() {
        let err = DriverError::server(1045, "Access denied for user 'nagios'", "28000");
        assert_eq!(
            err.to_string(),
            "Error code: 1045 Error message: Access denied for user 'nagios' SQLSTATE: 28000"
        );
    }

    #[test]
    fn test_driver_error_display_client_side() {
        let err = DriverError::new("Connection refused (os error 111)");
        assert_eq!(
            err.to_string(),
            "Error message: Connection refused (os error 111)"
        );
    }

    #[test]
    fn test_missing_credentials_lists_fields() {
        let err = CheckError::MissingCredentials {
            missing: vec!["host", "password"],
        };
        assert_eq!(
            err.to_string(),
            "Missing credentials: host, password not provided"
        );
        assert_eq!(err.level(), Level::Unknown);
    }

    #[test]
    fn test_levels() {
        let driver = DriverError::new("gone away");
        assert_eq!(
            CheckError::Connection(driver.clone()).level(),
            Level::Critical
        );
        assert_eq!(
            CheckError::FlavorQueryFailed(driver.clone()).level(),
            Level::Critical
        );
        assert_eq!(
            CheckError::Query {
                query: "SHOW SLAVE STATUS".to_string(),
                source: driver,
            }
            .level(),
            Level::Critical
        );
        assert_eq!(
            CheckError::InvalidChannelName {
                name: "a'b".to_string(),
                reason: "contains a quote character",
            }
            .level(),
            Level::Unknown
        );
        assert_eq!(
            CheckError::Unexpected("boom".to_string()).level(),
            Level::Critical
        );
    }
}
