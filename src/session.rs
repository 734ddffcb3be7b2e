//! One database session per tunnel request.

use tracing::warn;

use crate::config::{Engine, TunnelConfig};
use crate::error::{Result, TunnelError, ERR_CONNECTION_UNKNOWN, ERR_STATEMENT_UNKNOWN};
use crate::mysql::{MySqlConnectOptions, MySqlConnection, DEFAULT_PORT as MYSQL_DEFAULT_PORT};
use crate::protocol::{ConnectionInfo, StatementResult};
use crate::request::ConnectParams;
use crate::sqlite::SqliteConnection;

/// Host used when the client sends an empty `host`.
pub const DEFAULT_HOST: &str = "localhost";

/// Engine-specific connection behind a request.
pub enum Session {
    MySql(MySqlConnection),
    Sqlite(SqliteConnection),
}

impl Session {
    /// Connect with the request's parameters using the configured engine.
    pub async fn open(config: &TunnelConfig, params: &ConnectParams) -> Result<Self> {
        match config.engine {
            Engine::MySql => {
                let host = if params.host.is_empty() {
                    DEFAULT_HOST.to_string()
                } else {
                    params.host.clone()
                };
                let options = MySqlConnectOptions {
                    host,
                    port: params.port.unwrap_or(MYSQL_DEFAULT_PORT),
                    user: params.login.clone(),
                    password: params.password.clone(),
                    database: params.database.clone(),
                };
                let conn = MySqlConnection::connect(options)
                    .await
                    .map_err(|e| TunnelError::Connection {
                        code: e.connect_code(),
                        message: e.client_message(),
                    })?;
                Ok(Session::MySql(conn))
            }
            Engine::Sqlite => {
                let db = params.database.as_deref().unwrap_or_default();
                let conn = SqliteConnection::open(&config.sqlite_root, db)
                    .await
                    .map_err(|e| TunnelError::Connection {
                        code: e.sqlite_code().unwrap_or(ERR_CONNECTION_UNKNOWN),
                        message: e.client_message(),
                    })?;
                Ok(Session::Sqlite(conn))
            }
        }
    }

    pub async fn connection_info(&mut self) -> ConnectionInfo {
        match self {
            Session::MySql(conn) => conn.connection_info().await,
            Session::Sqlite(conn) => conn.connection_info(),
        }
    }

    /// Run one statement. Failures carry the code for the result-set header.
    pub async fn execute(&mut self, sql: &str) -> Result<StatementResult> {
        match self {
            Session::MySql(conn) => {
                conn.run_statement(sql)
                    .await
                    .map_err(|e| TunnelError::Statement {
                        code: e.statement_code(),
                        message: e.client_message(),
                    })
            }
            Session::Sqlite(conn) => {
                conn.run_statement(sql)
                    .await
                    .map_err(|e| TunnelError::Statement {
                        code: e.sqlite_code().unwrap_or(ERR_STATEMENT_UNKNOWN),
                        message: e.client_message(),
                    })
            }
        }
    }

    pub async fn close(self) {
        match self {
            Session::MySql(conn) => conn.close().await,
            Session::Sqlite(conn) => {
                if let Err(e) = conn.close().await {
                    warn!(error = %e, "SQLite connection close failed");
                }
            }
        }
    }
}
