//! Shared test utilities: an in-memory stand-in for a database server and
//! a log event recorder.
//!
//! `StubConnection` answers the catalog lookup from a list of database names
//! and every other statement from canned result sets. `StubConnector` hands
//! out clones of a template connection and records what happened to them.
//! `CapturedEvents` keeps every tracing event emitted on the current thread
//! while installed with [`with_captured_events`].

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

use crate::db::preflight::exists_query;
use crate::db::{Connection, Connector, DbError, Dsn, ResultSet};
use crate::metric::RawCell;

pub const SAMPLE_QUERY: &str = "SELECT 10 AS field_integer, 20.30 AS field_decimal, \
     'helloworld' AS field_string, 'tagValue1' AS tag_1, 'tagValue2' AS tag_2 FROM DUAL";

/// A canned result set. Rows given as `Err` fail when read.
#[derive(Debug, Clone)]
pub struct CannedResult {
    pub columns: Vec<String>,
    pub rows: Vec<Result<Vec<RawCell>, String>>,
}

impl CannedResult {
    pub fn new(columns: &[&str]) -> Self {
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn row(mut self, cells: &[&str]) -> Self {
        self.rows.push(Ok(cells.iter().map(|c| RawCell::from(*c)).collect()));
        self
    }

    pub fn raw_row(mut self, cells: Vec<RawCell>) -> Self {
        self.rows.push(Ok(cells));
        self
    }

    pub fn broken_row(mut self, message: &str) -> Self {
        self.rows.push(Err(message.to_string()));
        self
    }
}

/// Canned result for [`SAMPLE_QUERY`].
pub fn sample_result() -> CannedResult {
    CannedResult::new(&["field_integer", "field_decimal", "field_string", "tag_1", "tag_2"])
        .row(&["10", "20.30", "helloworld", "tagValue1", "tagValue2"])
}

#[derive(Debug, Clone, Default)]
pub struct StubConnection {
    databases: Vec<String>,
    results: HashMap<String, CannedResult>,
    fail_queries: bool,
    statements: Rc<RefCell<Vec<String>>>,
    open: Option<Rc<Cell<usize>>>,
}

impl StubConnection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_databases(mut self, names: &[&str]) -> Self {
        self.databases = names.iter().map(|n| n.to_string()).collect();
        self
    }

    pub fn with_result(mut self, sql: &str, result: CannedResult) -> Self {
        self.results.insert(sql.to_string(), result);
        self
    }

    /// Every statement fails as if the server went away.
    pub fn failing_queries(mut self) -> Self {
        self.fail_queries = true;
        self
    }

    /// Statements executed so far, across all clones of this connection.
    pub fn statements(&self) -> Vec<String> {
        self.statements.borrow().clone()
    }
}

impl Connection for StubConnection {
    fn query(&mut self, sql: &str) -> Result<ResultSet<'_>, DbError> {
        self.statements.borrow_mut().push(sql.to_string());

        if self.fail_queries {
            return Err(DbError::QueryFailed {
                message: "server has gone away".to_string(),
            });
        }

        if sql.starts_with("SHOW DATABASES LIKE ") {
            let rows: Vec<Result<Vec<RawCell>, DbError>> = self
                .databases
                .iter()
                .filter(|name| exists_query(name) == sql)
                .map(|name| Ok(vec![RawCell::from(name.as_str())]))
                .collect();
            return Ok(ResultSet::new(
                vec!["Database".to_string()],
                Box::new(rows.into_iter()),
            ));
        }

        let Some(result) = self.results.get(sql) else {
            return Err(DbError::QueryFailed {
                message: "You have an error in your SQL syntax".to_string(),
            });
        };
        let rows = result.rows.clone().into_iter().map(|row| {
            row.map_err(|message| DbError::ReadFailed { message })
        });
        Ok(ResultSet::new(result.columns.clone(), Box::new(rows)))
    }

    fn backend_name(&self) -> &'static str {
        "Stub"
    }
}

impl Drop for StubConnection {
    fn drop(&mut self) {
        if let Some(open) = &self.open {
            open.set(open.get() - 1);
        }
    }
}

/// Connector handing out clones of a template [`StubConnection`].
#[derive(Debug, Default)]
pub struct StubConnector {
    template: StubConnection,
    refuse: Option<String>,
    connects: Rc<Cell<usize>>,
    open: Rc<Cell<usize>>,
    last_dsn: RefCell<Option<Dsn>>,
}

impl StubConnector {
    pub fn new(template: StubConnection) -> Self {
        Self {
            template,
            ..Self::default()
        }
    }

    /// Refuse every connection attempt with `message`.
    pub fn refusing(message: &str) -> Self {
        Self {
            refuse: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn connects(&self) -> usize {
        self.connects.get()
    }

    /// Connections handed out and not yet dropped.
    pub fn open_connections(&self) -> usize {
        self.open.get()
    }

    pub fn statements(&self) -> Vec<String> {
        self.template.statements()
    }

    pub fn last_dsn(&self) -> Option<Dsn> {
        self.last_dsn.borrow().clone()
    }
}

impl Connector for StubConnector {
    type Conn = StubConnection;

    fn connect(&self, dsn: &Dsn) -> Result<Self::Conn, DbError> {
        self.connects.set(self.connects.get() + 1);
        *self.last_dsn.borrow_mut() = Some(dsn.clone());

        if let Some(message) = &self.refuse {
            return Err(DbError::OpenFailed {
                endpoint: dsn.endpoint(),
                message: message.clone(),
            });
        }

        self.open.set(self.open.get() + 1);
        let mut conn = self.template.clone();
        conn.open = Some(Rc::clone(&self.open));
        Ok(conn)
    }
}

/// One recorded tracing event with its fields rendered as text.
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub level: Level,
    pub fields: BTreeMap<String, String>,
}

#[derive(Default)]
struct FieldRecorder(BTreeMap<String, String>);

impl Visit for FieldRecorder {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{:?}", value));
    }
}

/// Layer recording every event it sees.
#[derive(Debug, Clone, Default)]
pub struct CapturedEvents {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl CapturedEvents {
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Events carrying `key` with the rendered value `value`.
    pub fn matching(&self, key: &str, value: &str) -> Vec<CapturedEvent> {
        self.events()
            .into_iter()
            .filter(|event| event.fields.get(key).is_some_and(|v| v == value))
            .collect()
    }

    pub fn count_at(&self, level: Level) -> usize {
        self.events().iter().filter(|event| event.level == level).count()
    }
}

impl<S: Subscriber> Layer<S> for CapturedEvents {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut recorder = FieldRecorder::default();
        event.record(&mut recorder);
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(CapturedEvent {
                level: *event.metadata().level(),
                fields: recorder.0,
            });
    }
}

/// Run `f` with `events` recording everything logged on this thread.
pub fn with_captured_events<T>(events: &CapturedEvents, f: impl FnOnce() -> T) -> T {
    let subscriber = tracing_subscriber::registry().with(events.clone());
    tracing::subscriber::with_default(subscriber, f)
}
