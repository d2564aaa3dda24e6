//! Database access for the query input.
//!
//! - [`dsn`]: parsing and shaping of the connection string
//! - [`backend`]: the connector/connection traits the query runner talks to
//! - [`mysql`]: the MySQL implementation of those traits
//! - [`preflight`]: the database existence check
//!
//! Cells are handed to the metric layer as raw bytes. Typing happens there,
//! never in the driver layer.

pub mod backend;
pub mod dsn;
pub mod escape;
pub mod mysql;
pub mod preflight;

pub use backend::{Connection, Connector, ResultSet, RowIter};
pub use dsn::{DEFAULT_TIMEOUT, Dsn, DsnError, shape_dsn};
pub use preflight::database_exists;
pub use self::mysql::{MySqlConnection, MySqlConnector};

use thiserror::Error;

/// Database error types
#[derive(Error, Debug)]
pub enum DbError {
    #[error("Failed to open connection to '{endpoint}': {message}")]
    OpenFailed { endpoint: String, message: String },

    #[error("Query failed: {message}")]
    QueryFailed { message: String },

    #[error("Failed to read row: {message}")]
    ReadFailed { message: String },
}
