//! Database collaborator seams
//!
//! The check never speaks the MySQL protocol itself. It opens a connection
//! through a [`Connector`] and runs statements through the resulting
//! [`QueryExecutor`]; driver crates implement both.

use async_trait::async_trait;

use crate::credentials::Credentials;
use crate::error::DriverError;

/// One result-set row as column name → textual value.
///
/// Column order is preserved. SQL NULL is `None`, which is distinct from a
/// missing column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryRow {
    columns: Vec<(String, Option<String>)>,
}

impl QueryRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, value: Option<String>) {
        self.columns.push((name.into(), value));
    }

    /// Builder-style [`QueryRow::push`] for a non-NULL value.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(name, Some(value.into()));
        self
    }

    /// Builder-style [`QueryRow::push`] for a NULL value.
    pub fn with_null(mut self, name: impl Into<String>) -> Self {
        self.push(name, None);
        self
    }

    /// `None` if the column does not exist, `Some(None)` if it is NULL.
    pub fn get(&self, name: &str) -> Option<Option<&str>> {
        self.columns
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, value)| value.as_deref())
    }

    pub fn value_at(&self, index: usize) -> Option<&str> {
        self.columns.get(index).and_then(|(_, value)| value.as_deref())
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.columns
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// An open database connection able to run text queries.
#[async_trait]
pub trait QueryExecutor: Send {
    /// Run `query` and return every row of its result set.
    async fn query(&mut self, query: &str) -> Result<Vec<QueryRow>, DriverError>;

    /// Release the connection.
    async fn close(&mut self) -> Result<(), DriverError>;
}

/// Opens [`QueryExecutor`] connections.
#[async_trait]
pub trait Connector: Send + Sync {
    type Connection: QueryExecutor;

    async fn connect(&self, credentials: &Credentials) -> Result<Self::Connection, DriverError>;
}
