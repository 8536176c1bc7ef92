//! check-mysql-replication
//!
//! A monitoring check that reports whether replication on a MySQL, MariaDB or
//! Percona server is healthy.
//!
//! # Checks
//!
//! - IO and SQL replication threads are running
//! - Replication lag (`Seconds_Behind_Master`) is below the warning and
//!   critical thresholds
//! - Multi-source replication: one named channel (MySQL/Percona) or
//!   connection (MariaDB) per invocation
//!
//! # CLI Usage
//!
//! ```bash
//! # Default replication stream, credentials from flags
//! check-mysql-replication -h db1.example.com -u nagios -p secret
//!
//! # Credentials from an option file, one multi-source channel
//! check-mysql-replication --ini /etc/nagios/my.cnf --master-connection eu_west
//!
//! # Custom thresholds
//! check-mysql-replication --ini ~/.my.cnf -w 5m -c 30m
//! ```
//!
//! Exit codes follow the plugin convention: 0 OK, 1 WARNING, 2 CRITICAL,
//! 3 UNKNOWN.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser};
use replication_check::credentials::{DEFAULT_INI_SECTION, DEFAULT_PORT};
use replication_check::{CheckConfig, ConnectionTarget, CredentialSource, Thresholds};

pub mod duration;

pub use duration::parse_threshold_secs;

/// Name printed in front of the check result.
pub const CHECK_NAME: &str = "CheckMysqlReplication";

#[derive(Parser, Clone, Debug)]
#[command(name = "check-mysql-replication")]
#[command(about = "Check MySQL/MariaDB/Percona replication status")]
#[command(long_about = None)]
#[command(disable_help_flag = true)]
pub struct Cli {
    #[command(flatten)]
    pub connection: ConnectionOpts,

    #[command(flatten)]
    pub thresholds: ThresholdOpts,

    /// Master connection (MariaDB) or replication channel (MySQL/Percona) to check
    #[arg(short = 'm', long, value_name = "NAME")]
    pub master_connection: Option<String>,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    pub help: Option<bool>,
}

/// Database connection options
#[derive(Args, Clone)]
pub struct ConnectionOpts {
    /// MySQL host
    #[arg(short = 'h', long, env = "MYSQL_HOST")]
    pub host: Option<String>,

    /// MySQL port
    #[arg(short = 'P', long, default_value_t = DEFAULT_PORT, env = "MYSQL_TCP_PORT")]
    pub port: u16,

    /// MySQL unix socket
    #[arg(short = 's', long)]
    pub socket: Option<String>,

    /// MySQL user
    #[arg(short = 'u', long, env = "MYSQL_USER")]
    pub user: Option<String>,

    /// MySQL password
    #[arg(short = 'p', long, env = "MYSQL_PWD", hide_env_values = true)]
    pub password: Option<String>,

    /// MySQL option file to read credentials from instead of the flags above
    #[arg(short = 'i', long, value_name = "PATH")]
    pub ini: Option<PathBuf>,

    /// Section of the option file holding the credentials
    #[arg(long, default_value = DEFAULT_INI_SECTION)]
    pub ini_section: String,
}

// Manual impl keeps the password out of logs.
impl std::fmt::Debug for ConnectionOpts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&CredentialSource::from(self), f)
    }
}

/// Replication lag thresholds
#[derive(Args, Clone, Debug)]
pub struct ThresholdOpts {
    /// Warn when replication lag is above this (seconds, or with s/m/h suffix)
    #[arg(short = 'w', long = "warning", default_value = "900", value_parser = parse_threshold_secs)]
    pub warning: i64,

    /// Critical when replication lag reaches this (seconds, or with s/m/h suffix)
    #[arg(short = 'c', long = "critical", default_value = "1800", value_parser = parse_threshold_secs)]
    pub critical: i64,
}

impl From<&ConnectionOpts> for CredentialSource {
    fn from(opts: &ConnectionOpts) -> Self {
        Self {
            host: opts.host.clone(),
            user: opts.user.clone(),
            password: opts.password.clone(),
            socket: opts.socket.clone(),
            port: opts.port,
            ini_file: opts.ini.clone(),
            ini_section: opts.ini_section.clone(),
        }
    }
}

impl From<&ThresholdOpts> for Thresholds {
    fn from(opts: &ThresholdOpts) -> Self {
        Self {
            warning: opts.warning,
            critical: opts.critical,
        }
    }
}

impl Cli {
    pub fn into_config(self) -> CheckConfig {
        CheckConfig {
            credentials: CredentialSource::from(&self.connection),
            target: ConnectionTarget::from_option(self.master_connection),
            thresholds: Thresholds::from(&self.thresholds),
        }
    }
}
