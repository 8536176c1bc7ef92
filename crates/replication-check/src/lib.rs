//! Replication status evaluation for MySQL-family servers.
//!
//! The crate decides whether replication on a server is healthy and turns
//! the answer into one monitoring severity. It is driver-agnostic: database
//! access goes through the [`Connector`] and [`QueryExecutor`] traits, and the
//! verdict leaves through a [`Reporter`].
//!
//! # Flow
//!
//! ```text
//! CredentialSource ──resolve──▶ Credentials ──connect──▶ QueryExecutor
//!     │
//!     ├─ SHOW VARIABLES LIKE "version_comment"  → FlavorKind
//!     ├─ SHOW SLAVE [...] STATUS [...]          → rows
//!     ├─ parse_status                           → NoRow | ParsedStatus
//!     └─ evaluate                               → CheckResult
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use replication_check::{CheckConfig, CheckRunner, PluginReporter};
//!
//! let runner = CheckRunner::new(connector);
//! let mut reporter = PluginReporter::stdout("CheckMysqlReplication");
//! let level = runner.run_and_report(&config, &mut reporter).await?;
//! std::process::exit(level.exit_code());
//! ```

pub mod connection;
pub mod credentials;
pub mod error;
pub mod flavor;
pub mod query;
pub mod report;
pub mod runner;
pub mod status;
pub mod threshold;

pub use connection::{Connector, QueryExecutor, QueryRow};
pub use credentials::{resolve_credentials, CredentialSource, Credentials};
pub use error::{CheckError, DriverError};
pub use flavor::{detect_flavor, FlavorKind};
pub use query::{status_query, validate_channel_name, ConnectionTarget};
pub use report::{CheckResult, Level, PluginReporter, Reporter};
pub use runner::{check_replication, CheckConfig, CheckRunner};
pub use status::{parse_status, ParsedStatus, ReplicationStatusRow, StatusOutcome};
pub use threshold::{evaluate, Thresholds};
