//! MySQL backend built on the `mysql` crate.
//!
//! Statements run over the text protocol, so cells normally arrive as raw
//! bytes exactly as the server rendered them. Binary values are rendered to
//! the same text MySQL would have sent.

use mysql::prelude::Queryable;
use mysql::{Conn, OptsBuilder, SslOpts, Value};
use tracing::warn;

use super::DbError;
use super::backend::{Connection, Connector, ResultSet};
use super::dsn::Dsn;
use crate::metric::RawCell;

/// Opens plain (unpooled) MySQL connections.
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlConnector;

impl Connector for MySqlConnector {
    type Conn = MySqlConnection;

    fn connect(&self, dsn: &Dsn) -> Result<Self::Conn, DbError> {
        let conn = Conn::new(opts_from_dsn(dsn)).map_err(|e| DbError::OpenFailed {
            endpoint: dsn.endpoint(),
            message: e.to_string(),
        })?;
        Ok(MySqlConnection { conn })
    }
}

/// A single MySQL session. Closed on drop.
pub struct MySqlConnection {
    conn: Conn,
}

impl Connection for MySqlConnection {
    fn query(&mut self, sql: &str) -> Result<ResultSet<'_>, DbError> {
        let result = self.conn.query_iter(sql).map_err(|e| DbError::QueryFailed {
            message: e.to_string(),
        })?;

        let columns = result
            .columns()
            .as_ref()
            .iter()
            .map(|column| column.name_str().into_owned())
            .collect();

        let rows = result.map(|row| -> Result<Vec<RawCell>, DbError> {
            let row = row.map_err(|e| DbError::ReadFailed {
                message: e.to_string(),
            })?;
            Ok((0..row.len())
                .map(|i| row.as_ref(i).map_or_else(RawCell::null, raw_cell))
                .collect())
        });

        Ok(ResultSet::new(columns, Box::new(rows)))
    }

    fn backend_name(&self) -> &'static str {
        "MySql"
    }
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

/// Map DSN settings onto driver options.
fn opts_from_dsn(dsn: &Dsn) -> OptsBuilder {
    let mut builder = OptsBuilder::new()
        .user(non_empty(&dsn.user))
        .pass(non_empty(&dsn.password))
        .db_name(non_empty(&dsn.db_name))
        .tcp_connect_timeout(dsn.timeout)
        .read_timeout(dsn.read_timeout)
        .write_timeout(dsn.write_timeout);

    if dsn.net == "unix" {
        builder = builder.socket(Some(dsn.addr.clone()));
    } else {
        let (host, port) = dsn.host_port();
        builder = builder.ip_or_hostname(Some(host)).tcp_port(port);
    }

    match dsn.params.get("tls").map(String::as_str) {
        Some("true") => builder.ssl_opts(Some(SslOpts::default())),
        Some("skip-verify") | Some("preferred") => builder
            .ssl_opts(Some(SslOpts::default().with_danger_accept_invalid_certs(true))),
        None | Some("false") => builder,
        Some(other) => {
            warn!(tls = other, "Unsupported tls setting, connecting without TLS");
            builder
        }
    }
}

/// Render one driver value as the bytes the text protocol would carry.
fn raw_cell(value: &Value) -> RawCell {
    match value {
        Value::NULL => RawCell::null(),
        Value::Bytes(bytes) => RawCell::new(bytes.clone()),
        Value::Int(i) => RawCell::new(i.to_string()),
        Value::UInt(u) => RawCell::new(u.to_string()),
        Value::Float(f) => RawCell::new(f.to_string()),
        Value::Double(d) => RawCell::new(d.to_string()),
        Value::Date(year, month, day, hour, minute, second, micros) => {
            let mut text = format!(
                "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
                year, month, day, hour, minute, second
            );
            if *micros > 0 {
                text.push_str(&format!(".{:06}", micros));
            }
            RawCell::new(text)
        }
        Value::Time(negative, days, hours, minutes, seconds, micros) => {
            let sign = if *negative { "-" } else { "" };
            let hours = u64::from(*days) * 24 + u64::from(*hours);
            let mut text = format!("{}{:02}:{:02}:{:02}", sign, hours, minutes, seconds);
            if *micros > 0 {
                text.push_str(&format!(".{:06}", micros));
            }
            RawCell::new(text)
        }
    }
}
