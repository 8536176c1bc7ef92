//! Server flavor detection from `version_comment`.

use std::fmt;

use tracing::debug;

use crate::connection::QueryExecutor;
use crate::error::CheckError;

pub const VERSION_COMMENT_QUERY: &str = r#"SHOW VARIABLES LIKE "version_comment""#;

/// Database server implementation family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlavorKind {
    MySQL,
    MariaDB,
    Percona,
    Unknown,
}

impl FlavorKind {
    /// Classify a `version_comment` value.
    ///
    /// Matching is case-sensitive and ordered; the first hit wins.
    pub fn from_version_comment(comment: &str) -> Self {
        if comment.contains("mariadb") {
            FlavorKind::MariaDB
        } else if comment.contains("MySQL") {
            FlavorKind::MySQL
        } else if comment.contains("Percona") {
            FlavorKind::Percona
        } else {
            FlavorKind::Unknown
        }
    }
}

impl fmt::Display for FlavorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FlavorKind::MySQL => "MySQL",
            FlavorKind::MariaDB => "MariaDB",
            FlavorKind::Percona => "Percona",
            FlavorKind::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Query the server's `version_comment` and classify it.
///
/// An empty result classifies as [`FlavorKind::Unknown`]; a failed query is
/// returned as [`CheckError::FlavorQueryFailed`].
pub async fn detect_flavor<E>(conn: &mut E) -> Result<FlavorKind, CheckError>
where
    E: QueryExecutor + ?Sized,
{
    let rows = conn
        .query(VERSION_COMMENT_QUERY)
        .await
        .map_err(CheckError::FlavorQueryFailed)?;

    // SHOW VARIABLES yields (Variable_name, Value)
    let comment = rows
        .first()
        .and_then(|row| row.get("Value").flatten().or_else(|| row.value_at(1)))
        .unwrap_or_default();

    let flavor = FlavorKind::from_version_comment(comment);
    debug!(version_comment = %comment, flavor = %flavor, "Detected server flavor");
    Ok(flavor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert_eq!(
            FlavorKind::from_version_comment("mariadb.org binary distribution"),
            FlavorKind::MariaDB
        );
        assert_eq!(
            FlavorKind::from_version_comment("MySQL Community Server - GPL"),
            FlavorKind::MySQL
        );
        assert_eq!(
            FlavorKind::from_version_comment("Percona Server (GPL), Release 22"),
            FlavorKind::Percona
        );
        assert_eq!(
            FlavorKind::from_version_comment("Acme DB"),
            FlavorKind::Unknown
        );
        assert_eq!(FlavorKind::from_version_comment(""), FlavorKind::Unknown);
    }

    #[test]
    fn test_classification_order() {
        // "mariadb" is checked before "MySQL"
        assert_eq!(
            FlavorKind::from_version_comment("MySQL-compatible mariadb build"),
            FlavorKind::MariaDB
        );
        // "MySQL" is checked before "Percona"
        assert_eq!(
            FlavorKind::from_version_comment("Percona Server for MySQL"),
            FlavorKind::MySQL
        );
    }

    #[test]
    fn test_classification_is_case_sensitive() {
        assert_eq!(
            FlavorKind::from_version_comment("MariaDB Server"),
            FlavorKind::Unknown
        );
        assert_eq!(
            FlavorKind::from_version_comment("mysql community"),
            FlavorKind::Unknown
        );
    }
}
