//! Database existence check.

use super::DbError;
use super::backend::Connection;
use super::escape::{escape_like_pattern, escape_string_literal};

/// Build the catalog lookup for `name`.
pub fn exists_query(name: &str) -> String {
    format!(
        "SHOW DATABASES LIKE '{}'",
        escape_string_literal(&escape_like_pattern(name))
    )
}

/// Check whether the server has a database called `name`.
///
/// Asks the server catalog rather than switching to the database. A missing
/// database is `Ok(false)`; only transport failures are errors.
pub fn database_exists(conn: &mut dyn Connection, name: &str) -> Result<bool, DbError> {
    let mut count = 0usize;
    for row in conn.query(&exists_query(name))? {
        row?;
        count += 1;
    }
    Ok(count == 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::StubConnection;
    use rstest::rstest;

    #[rstest]
    fn test_exists_query() {
        assert_eq!(exists_query("mysql"), "SHOW DATABASES LIKE 'mysql'");
        assert_eq!(exists_query("my_db"), r"SHOW DATABASES LIKE 'my\\_db'");
        assert_eq!(exists_query("o'neil"), r"SHOW DATABASES LIKE 'o\'neil'");
    }

    #[rstest]
    fn test_database_found() {
        let mut conn = StubConnection::new().with_databases(&["mysql", "metrics"]);
        assert!(database_exists(&mut conn, "mysql").unwrap());
    }

    #[rstest]
    fn test_database_not_found_is_not_an_error() {
        let mut conn = StubConnection::new().with_databases(&["mysql"]);
        assert!(!database_exists(&mut conn, "fakedatabase").unwrap());
    }

    #[rstest]
    fn test_transport_failure_is_an_error() {
        let mut conn = StubConnection::new().failing_queries();
        let err = database_exists(&mut conn, "mysql").unwrap_err();
        assert!(matches!(err, DbError::QueryFailed { .. }));
    }
}
