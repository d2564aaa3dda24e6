//! Backend abstraction for running queries.
//!
//! A [`Connector`] opens one [`Connection`] per collection cycle. Queries
//! return a [`ResultSet`]: the column names plus a row iterator that reads
//! from the server as it is advanced.

use super::DbError;
use super::dsn::Dsn;
use crate::metric::RawCell;

/// Row iterator borrowed from an open connection.
pub type RowIter<'a> = Box<dyn Iterator<Item = Result<Vec<RawCell>, DbError>> + 'a>;

/// Columns and rows of one executed statement.
pub struct ResultSet<'a> {
    columns: Vec<String>,
    rows: RowIter<'a>,
}

impl<'a> ResultSet<'a> {
    pub fn new(columns: Vec<String>, rows: RowIter<'a>) -> Self {
        Self { columns, rows }
    }

    /// Names of the columns, in select order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}

impl Iterator for ResultSet<'_> {
    type Item = Result<Vec<RawCell>, DbError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.rows.next()
    }
}

/// An open database session.
///
/// Dropping the value closes the session.
pub trait Connection {
    /// Execute a statement and return its result set.
    fn query(&mut self, sql: &str) -> Result<ResultSet<'_>, DbError>;

    /// Get the backend name for logging/debugging.
    fn backend_name(&self) -> &'static str;
}

/// Opens connections from a shaped DSN.
pub trait Connector {
    type Conn: Connection;

    fn connect(&self, dsn: &Dsn) -> Result<Self::Conn, DbError>;
}
