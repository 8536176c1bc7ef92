//! Command-line interface for check-mysql-replication
//!
//! # Usage Examples
//!
//! ```bash
//! # Single-source replica
//! check-mysql-replication -h replica1 -u nagios -p secret
//!
//! # MariaDB multi-source connection, credentials from ~/.my.cnf
//! check-mysql-replication --ini ~/.my.cnf --master-connection dc2
//!
//! # Verbose diagnostics on stderr
//! RUST_LOG=debug check-mysql-replication --ini ~/.my.cnf
//! ```
//!
//! Stdout carries exactly one `CheckMysqlReplication <LEVEL>: <message>`
//! line; logs go to stderr.

use anyhow::Context;
use check_mysql_replication::{Cli, CHECK_NAME};
use clap::Parser;
use mysql_replication_source::MySqlConnector;
use replication_check::{CheckRunner, Level, PluginReporter};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    match run().await {
        Ok(level) => std::process::exit(level.exit_code()),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(Level::Unknown.exit_code());
        }
    }
}

async fn run() -> anyhow::Result<Level> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // --help
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            // Usage errors are UNKNOWN for the monitoring framework, not clap's exit code 2
            e.print().ok();
            std::process::exit(Level::Unknown.exit_code());
        }
    };

    let config = cli.into_config();
    tracing::debug!(?config, "Parsed check configuration");

    let runner = CheckRunner::new(MySqlConnector::new());
    let mut reporter = PluginReporter::stdout(CHECK_NAME);
    runner
        .run_and_report(&config, &mut reporter)
        .await
        .context("Failed to write check result")
}
