//! MySQL connection implementation.
//!
//! The driver is blocking, so every call runs on tokio's blocking pool. The
//! connection is moved into the worker and handed back with the result.

use ::mysql::prelude::Queryable;
use ::mysql::{Conn, OptsBuilder};
use tracing::{debug, warn};

use super::error::{MySqlError, MySqlResult};
use super::types::{describe_column, scalar_from_value};
use crate::protocol::{ColumnDescriptor, ConnectionInfo, StatementResult};

/// Default MySQL port.
pub const DEFAULT_PORT: u16 = 3306;

/// MySQL connection parameters.
#[derive(Debug, Clone)]
pub struct MySqlConnectOptions {
    /// Hostname or IP address
    pub host: String,
    /// Port number (default: 3306)
    pub port: u16,
    /// Username
    pub user: String,
    /// Password
    pub password: String,
    /// Initial database (optional)
    pub database: Option<String>,
}

impl MySqlConnectOptions {
    fn to_opts(&self) -> OptsBuilder {
        OptsBuilder::new()
            .ip_or_hostname(Some(self.host.clone()))
            .tcp_port(self.port)
            .user(Some(self.user.clone()))
            .pass(Some(self.password.clone()))
            .db_name(self.database.clone())
            .prefer_socket(false)
    }
}

/// A MySQL connection.
pub struct MySqlConnection {
    /// Driver connection; `None` while a worker holds it or after it was lost.
    conn: Option<Conn>,
    host: String,
}

impl MySqlConnection {
    /// Connect and authenticate.
    pub async fn connect(options: MySqlConnectOptions) -> MySqlResult<Self> {
        let host = options.host.clone();
        let conn = tokio::task::spawn_blocking(move || Conn::new(options.to_opts()))
            .await
            .map_err(|e| MySqlError::Worker(e.to_string()))??;

        debug!(host = %host, "MySQL connection established");

        Ok(Self {
            conn: Some(conn),
            host,
        })
    }

    /// Run `f` against the driver connection on the blocking pool.
    async fn with_conn<T, F>(&mut self, f: F) -> MySqlResult<T>
    where
        F: FnOnce(&mut Conn) -> MySqlResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let mut conn = self.conn.take().ok_or(MySqlError::ConnectionClosed)?;
        let (conn, result) = tokio::task::spawn_blocking(move || {
            let result = f(&mut conn);
            (conn, result)
        })
        .await
        .map_err(|e| MySqlError::Worker(e.to_string()))?;
        self.conn = Some(conn);
        result
    }

    /// Description sent in reply to a connection test.
    pub async fn connection_info(&mut self) -> ConnectionInfo {
        let server_version = match self.with_conn(server_version).await {
            Ok(version) => version,
            Err(e) => {
                warn!(error = %e, "Could not read server version");
                "Unknown".to_string()
            }
        };

        ConnectionInfo {
            host_info: format!("{} via TCP/IP", self.host),
            protocol_version: "10".to_string(),
            server_version,
        }
    }

    /// Execute one statement with the text protocol.
    pub async fn run_statement(&mut self, sql: &str) -> MySqlResult<StatementResult> {
        let sql = sql.to_string();
        self.with_conn(move |conn| run_text_statement(conn, &sql))
            .await
    }

    /// Close the connection, sending COM_QUIT from the blocking pool.
    pub async fn close(mut self) {
        if let Some(conn) = self.conn.take() {
            if let Err(e) = tokio::task::spawn_blocking(move || drop(conn)).await {
                warn!(error = %e, "MySQL connection close failed");
            }
        }
    }
}

fn server_version(conn: &mut Conn) -> MySqlResult<String> {
    let version: Option<String> = conn.query_first("SELECT VERSION()")?;
    Ok(version.unwrap_or_else(|| {
        let (major, minor, patch) = conn.server_version();
        format!("{}.{}.{}", major, minor, patch)
    }))
}

/// Only the first result set is framed; dropping the result drains the rest
/// so the connection stays usable for the next statement.
fn run_text_statement(conn: &mut Conn, sql: &str) -> MySqlResult<StatementResult> {
    let mut result = conn.query_iter(sql)?;

    let columns: Vec<ColumnDescriptor> = result
        .columns()
        .as_ref()
        .iter()
        .map(describe_column)
        .collect();
    let affected_rows = result.affected_rows();
    let insert_id = result.last_insert_id().unwrap_or(0);

    let mut rows = Vec::new();
    for row in result.by_ref() {
        let row = row?;
        rows.push(row.unwrap().into_iter().map(scalar_from_value).collect());
    }

    Ok(StatementResult {
        affected_rows,
        insert_id,
        columns,
        rows,
    })
}
