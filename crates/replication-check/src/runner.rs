//! Check orchestration
//!
//! [`CheckRunner::run`] resolves credentials, opens the connection, detects
//! the flavor, runs the status query and classifies the row. Every failure
//! on the way is turned into a [`CheckResult`], so a run yields exactly one
//! result. The connection is closed on every path once it has been opened.

use std::any::Any;
use std::io;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use tracing::{debug, error, info, warn};

use crate::connection::{Connector, QueryExecutor};
use crate::credentials::{resolve_credentials, CredentialSource};
use crate::error::CheckError;
use crate::flavor::detect_flavor;
use crate::query::{status_query, validate_channel_name, ConnectionTarget};
use crate::report::{CheckResult, Level, Reporter};
use crate::status::{parse_status, StatusOutcome};
use crate::threshold::{evaluate, Thresholds};

pub const NOT_A_REPLICA_MESSAGE: &str =
    "show slave status returned no rows, this server is not a replica";

/// Immutable configuration of one check run.
#[derive(Debug, Clone, Default)]
pub struct CheckConfig {
    pub credentials: CredentialSource,
    pub target: ConnectionTarget,
    pub thresholds: Thresholds,
}

pub struct CheckRunner<C> {
    connector: C,
}

impl<C: Connector> CheckRunner<C> {
    pub fn new(connector: C) -> Self {
        Self { connector }
    }

    /// Run the check and return its single result.
    pub async fn run(&self, config: &CheckConfig) -> CheckResult {
        if config.thresholds.warning > config.thresholds.critical {
            warn!(
                warning = config.thresholds.warning,
                critical = config.thresholds.critical,
                "Warning threshold is above the critical threshold"
            );
        }

        let outcome = AssertUnwindSafe(self.try_run(config))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(CheckError::Unexpected(panic_message(panic))));

        match outcome {
            Ok(result) => {
                info!(level = %result.level, "Replication check finished");
                result
            }
            Err(e) => {
                error!(error = %e, "Replication check failed");
                CheckResult::new(e.level(), e.to_string())
            }
        }
    }

    /// Run the check, hand the result to `reporter`, and return its level.
    pub async fn run_and_report<R: Reporter + ?Sized>(
        &self,
        config: &CheckConfig,
        reporter: &mut R,
    ) -> io::Result<Level> {
        let result = self.run(config).await;
        reporter.report(&result)?;
        Ok(result.level)
    }

    async fn try_run(&self, config: &CheckConfig) -> Result<CheckResult, CheckError> {
        let credentials = resolve_credentials(&config.credentials)?;
        if let Some(name) = config.target.name() {
            validate_channel_name(name)?;
        }

        info!(
            host = %credentials.host,
            port = credentials.port,
            socket = ?credentials.socket,
            user = %credentials.user,
            "Connecting to database server"
        );
        let mut conn = self
            .connector
            .connect(&credentials)
            .await
            .map_err(CheckError::Connection)?;

        // A panic past this point must still reach close().
        let outcome = AssertUnwindSafe(check_replication(
            &mut conn,
            &config.target,
            &config.thresholds,
        ))
        .catch_unwind()
        .await
        .unwrap_or_else(|panic| Err(CheckError::Unexpected(panic_message(panic))));

        if let Err(e) = conn.close().await {
            warn!(error = %e, "Failed to close database connection cleanly");
        }
        outcome
    }
}

/// Evaluate replication on an already open connection.
pub async fn check_replication<E>(
    conn: &mut E,
    target: &ConnectionTarget,
    thresholds: &Thresholds,
) -> Result<CheckResult, CheckError>
where
    E: QueryExecutor + ?Sized,
{
    let flavor = detect_flavor(conn).await?;
    let query = status_query(flavor, target)?;

    debug!(query = %query, "Querying replication status");
    let rows = conn
        .query(&query)
        .await
        .map_err(|source| CheckError::Query {
            query: query.clone(),
            source,
        })?;

    Ok(match parse_status(&rows) {
        StatusOutcome::NoRow => CheckResult::ok(NOT_A_REPLICA_MESSAGE),
        StatusOutcome::Parsed(status) => evaluate(&status, target, thresholds),
    })
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    let detail = panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    format!("Unexpected failure: {detail}")
}
