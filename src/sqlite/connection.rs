//! SQLite connection implementation.

use std::path::{Component, Path, PathBuf};

use rusqlite::{Batch, Statement};
use tokio_rusqlite::Connection;
use tracing::debug;

use super::error::{SqliteError, SqliteResult};
use super::types::{describe_column, scalar_from_value_ref};
use crate::protocol::{ColumnDescriptor, ConnectionInfo, StatementResult};

/// Label used for databases that live only for the request.
pub const MEMORY_DATABASE: &str = ":memory:";

/// A SQLite connection.
pub struct SqliteConnection {
    conn: Connection,
    label: String,
    closed: bool,
}

impl SqliteConnection {
    /// Open a SQLite database.
    ///
    /// An empty `db` or `:memory:` opens an in-memory database. Anything
    /// else is a relative path resolved against `root`.
    pub async fn open(root: &Path, db: &str) -> SqliteResult<Self> {
        let (conn, label) = if db.is_empty() || db == MEMORY_DATABASE {
            (Connection::open_in_memory().await?, MEMORY_DATABASE.to_string())
        } else {
            let path = resolve_path(root, db)?;
            let conn = Connection::open(&path).await?;
            conn.call(|c| {
                c.execute_batch("PRAGMA busy_timeout=5000;")?;
                Ok(())
            })
            .await?;
            (conn, db.to_string())
        };

        debug!(database = %label, "SQLite database opened");

        Ok(Self {
            conn,
            label,
            closed: false,
        })
    }

    /// Description sent in reply to a connection test.
    pub fn connection_info(&self) -> ConnectionInfo {
        ConnectionInfo {
            host_info: format!("{} via SQLite", self.label),
            protocol_version: "3".to_string(),
            server_version: rusqlite::version().to_string(),
        }
    }

    /// Execute the SQL in `sql` and collect everything the response needs.
    ///
    /// Text holding several statements runs all of them in order; only the
    /// first one is described in the result. The first failure from any of
    /// them is returned.
    pub async fn run_statement(&self, sql: &str) -> SqliteResult<StatementResult> {
        if self.closed {
            return Err(SqliteError::ConnectionClosed);
        }

        let sql = sql.to_string();

        let result = self
            .conn
            .call(move |conn| {
                let conn: &rusqlite::Connection = conn;
                let mut batch = Batch::new(conn, &sql);

                let Some(mut first) = batch.next()? else {
                    return Ok(None);
                };
                let result = run_prepared(conn, &mut first)?;
                drop(first);

                while let Some(mut stmt) = batch.next()? {
                    if stmt.column_count() == 0 {
                        stmt.execute([])?;
                    } else {
                        let mut rows = stmt.query([])?;
                        while rows.next()?.is_some() {}
                    }
                }

                Ok(Some(result))
            })
            .await
            .map_err(SqliteError::from)?;

        result.ok_or(SqliteError::EmptyQuery)
    }

    /// Close the connection.
    pub async fn close(mut self) -> SqliteResult<()> {
        self.closed = true;
        self.conn.close().await.map_err(SqliteError::from)
    }

    /// Check if the connection is closed.
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

/// Run one prepared statement to completion.
fn run_prepared(
    conn: &rusqlite::Connection,
    stmt: &mut Statement<'_>,
) -> rusqlite::Result<StatementResult> {
    let rowid_before = conn.last_insert_rowid();

    if stmt.column_count() == 0 {
        let affected = stmt.execute([])?;
        let insert_id = inserted_rowid(conn, rowid_before);
        return Ok(StatementResult::modified(affected as u64, insert_id));
    }

    let columns: Vec<ColumnDescriptor> = stmt
        .columns()
        .iter()
        .map(|c| describe_column(c.name(), c.decl_type()))
        .collect();

    let mut rows_data = Vec::new();
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let mut row_values = Vec::with_capacity(columns.len());
        for i in 0..columns.len() {
            row_values.push(scalar_from_value_ref(row.get_ref(i)?));
        }
        rows_data.push(row_values);
    }
    drop(rows);

    // `changes()` still holds the previous write's count after a read.
    let (affected_rows, insert_id) = if stmt.readonly() {
        (0, 0)
    } else {
        (conn.changes(), inserted_rowid(conn, rowid_before))
    };

    Ok(StatementResult {
        affected_rows,
        insert_id,
        columns,
        rows: rows_data,
    })
}

/// New rowid if the statement inserted a row, else 0.
fn inserted_rowid(conn: &rusqlite::Connection, rowid_before: i64) -> u64 {
    let rowid_after = conn.last_insert_rowid();
    if rowid_after != rowid_before {
        u64::try_from(rowid_after).unwrap_or(0)
    } else {
        0
    }
}

/// Join `db` onto `root`, refusing paths that could leave it.
fn resolve_path(root: &Path, db: &str) -> SqliteResult<PathBuf> {
    let relative = Path::new(db);
    let escapes = relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));

    if escapes {
        return Err(SqliteError::InvalidPath(db.to_string()));
    }
    Ok(root.join(relative))
}
