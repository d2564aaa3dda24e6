//! The query input: one collection cycle per [`QueryPlugin::gather`] call.
//!
//! Each cycle opens a fresh connection, checks once per instance whether the
//! configured database exists, runs the query and emits one metric per row
//! that still has fields after tag extraction.
//!
//! `gather` takes `&mut self`; callers sharing an instance across threads
//! must serialize access themselves.

use thiserror::Error;
use tracing::{debug, trace};

use crate::accumulator::Accumulator;
use crate::config::PluginConfig;
use crate::db::{
    Connection, Connector, DbError, Dsn, DsnError, MySqlConnector, database_exists, shape_dsn,
};
use crate::metric::{extract_tags, materialize};

pub const DESCRIPTION: &str = "Collects metrics from a SQL query";

#[derive(Error, Debug)]
pub enum GatherError {
    #[error("Invalid server DSN: {0}")]
    Dsn(#[from] DsnError),

    #[error(transparent)]
    Connect(DbError),

    #[error("Failed to check whether database '{database}' exists: {source}")]
    Preflight { database: String, source: DbError },

    #[error("query error: {query} - {source}")]
    Query { query: String, source: DbError },

    #[error("Failed to read row {row} of query '{query}': {message}")]
    RowScan {
        query: String,
        row: usize,
        message: String,
    },
}

/// Outcome of the database existence check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PreflightState {
    /// No check has succeeded yet.
    #[default]
    Uninitialized,
    /// Checked once; never re-checked for the lifetime of the instance.
    Initialized { database_exists: bool },
}

pub struct QueryPlugin<C: Connector = MySqlConnector> {
    config: PluginConfig,
    connector: C,
    state: PreflightState,
}

impl QueryPlugin<MySqlConnector> {
    pub fn new(config: PluginConfig) -> Self {
        Self::with_connector(config, MySqlConnector)
    }
}

impl<C: Connector> QueryPlugin<C> {
    pub fn with_connector(config: PluginConfig, connector: C) -> Self {
        Self {
            config,
            connector,
            state: PreflightState::Uninitialized,
        }
    }

    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    pub fn state(&self) -> PreflightState {
        self.state
    }

    pub fn is_initialized(&self) -> bool {
        matches!(self.state, PreflightState::Initialized { .. })
    }

    /// Whether the configured database was found. `false` until initialized.
    pub fn database_exists(&self) -> bool {
        matches!(
            self.state,
            PreflightState::Initialized {
                database_exists: true
            }
        )
    }

    /// Run one collection cycle, returning the number of metrics emitted.
    ///
    /// On error, metrics emitted before the failing row stay emitted.
    pub fn gather(&mut self, acc: &mut dyn Accumulator) -> Result<usize, GatherError> {
        let dsn: Dsn = shape_dsn(&self.config.server)?.parse()?;
        debug!(endpoint = %dsn.endpoint(), "Opening connection");

        let mut conn = self.connector.connect(&dsn).map_err(GatherError::Connect)?;
        trace!(backend = conn.backend_name(), "Connection open");

        if self.state == PreflightState::Uninitialized {
            self.init_data(&mut conn)?;
        }

        if self.config.query.is_empty() {
            return Ok(0);
        }

        self.gather_from_query(&mut conn, acc)
    }

    fn init_data(&mut self, conn: &mut dyn Connection) -> Result<(), GatherError> {
        let database = &self.config.database;
        let found = database_exists(conn, database).map_err(|source| GatherError::Preflight {
            database: database.clone(),
            source,
        })?;
        debug!(
            caller = "init_data",
            database = %database,
            exists = found,
            "Check if database exists"
        );

        self.state = PreflightState::Initialized {
            database_exists: found,
        };
        Ok(())
    }

    fn gather_from_query(
        &self,
        conn: &mut dyn Connection,
        acc: &mut dyn Accumulator,
    ) -> Result<usize, GatherError> {
        let query = &self.config.query;
        let rows = conn.query(query).map_err(|source| GatherError::Query {
            query: query.clone(),
            source,
        })?;
        let columns = rows.columns().to_vec();
        let row_error = |row: usize, message: String| GatherError::RowScan {
            query: query.clone(),
            row,
            message,
        };

        let mut read = 0;
        let mut emitted = 0;
        for (index, row) in rows.enumerate() {
            let cells = row.map_err(|e| row_error(index, e.to_string()))?;
            let mut fields = materialize(&columns, &cells).map_err(|e| row_error(index, e.to_string()))?;
            let tags = extract_tags(&self.config.tags, &mut fields);
            read += 1;

            if fields.is_empty() {
                trace!(row = index, "Skipping row without fields");
                continue;
            }

            acc.add_fields(&self.config.measurement, fields, tags);
            emitted += 1;
        }

        debug!(
            measurement = %self.config.measurement,
            rows = read,
            emitted,
            "Gathered metrics from query"
        );
        Ok(emitted)
    }
}
