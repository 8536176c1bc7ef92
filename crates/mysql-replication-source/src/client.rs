//! MySQL client utilities
//!
//! Opens one connection per check. A pool would only add background tasks
//! for a process that runs two statements and exits.

use async_trait::async_trait;
use mysql_async::prelude::Queryable;
use mysql_async::{Conn, OptsBuilder, Row};
use replication_check::{Connector, Credentials, DriverError, QueryExecutor, QueryRow};
use tracing::debug;

use crate::row::row_to_query_row;

/// Convert a mysql_async error into the check's driver error.
///
/// Server errors keep their error code and SQL state; everything else
/// (I/O, protocol, URL) only has a message.
pub fn driver_error(err: mysql_async::Error) -> DriverError {
    match err {
        mysql_async::Error::Server(e) => DriverError::server(e.code, e.message, e.state),
        other => DriverError::new(other.to_string()),
    }
}

#[derive(Debug, Clone, Default)]
pub struct MySqlConnector;

impl MySqlConnector {
    pub fn new() -> Self {
        Self
    }

    fn opts(credentials: &Credentials) -> OptsBuilder {
        OptsBuilder::default()
            .ip_or_hostname(credentials.host.clone())
            .tcp_port(credentials.port)
            .user(Some(credentials.user.clone()))
            .pass(Some(credentials.password.clone()))
            .socket(credentials.socket.clone())
    }
}

#[async_trait]
impl Connector for MySqlConnector {
    type Connection = MySqlConnection;

    async fn connect(&self, credentials: &Credentials) -> Result<MySqlConnection, DriverError> {
        let conn = Conn::new(Self::opts(credentials))
            .await
            .map_err(driver_error)?;
        debug!(
            connection_id = conn.id(),
            server_version = ?conn.server_version(),
            "MySQL connection established"
        );
        Ok(MySqlConnection { conn: Some(conn) })
    }
}

/// An open connection. `None` once closed.
pub struct MySqlConnection {
    conn: Option<Conn>,
}

#[async_trait]
impl QueryExecutor for MySqlConnection {
    async fn query(&mut self, query: &str) -> Result<Vec<QueryRow>, DriverError> {
        let conn = self
            .conn
            .as_mut()
            .ok_or_else(|| DriverError::new("connection already closed"))?;

        let rows: Vec<Row> = conn.query(query).await.map_err(driver_error)?;
        debug!(query = %query, rows = rows.len(), "Query completed");
        Ok(rows.iter().map(row_to_query_row).collect())
    }

    async fn close(&mut self) -> Result<(), DriverError> {
        match self.conn.take() {
            Some(conn) => conn.disconnect().await.map_err(driver_error),
            None => Ok(()),
        }
    }
}
