//! mysql_async adapter for the replication check
//!
//! Implements the `Connector` / `QueryExecutor` seams of `replication-check`
//! on top of a single, unpooled `mysql_async::Conn`.

mod client;
mod row;

pub use client::{driver_error, MySqlConnection, MySqlConnector};
pub use row::{to_query_row, value_to_text};
