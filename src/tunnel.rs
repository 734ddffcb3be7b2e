//! Request orchestration.
//!
//! Opens one session per request, runs the action against it and assembles
//! the binary response with the frame builder.

use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use tracing::{debug, info, warn};

use crate::config::TunnelConfig;
use crate::protocol::{error_response, EchoHeader, ResponseBuilder, StatementOutcome};
use crate::request::{Action, TunnelRequest};
use crate::session::Session;

/// Drives a validated request to its response body.
#[derive(Debug, Clone)]
pub struct Tunnel {
    config: Arc<TunnelConfig>,
}

impl Tunnel {
    pub fn new(config: Arc<TunnelConfig>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TunnelConfig {
        &self.config
    }

    /// Build the response body for `request`. Connection failures become an
    /// echo header carrying the error; statement failures are framed per
    /// statement and never abort the batch.
    pub async fn respond(&self, request: &TunnelRequest) -> Bytes {
        let started = Instant::now();

        let mut session = match Session::open(&self.config, &request.params).await {
            Ok(session) => session,
            Err(e) => {
                warn!(
                    host = %request.params.host,
                    code = e.code(),
                    error = %e,
                    "Connection failed"
                );
                return error_response(e.code(), &e.to_string());
            }
        };

        let mut response = ResponseBuilder::new();
        response.push(&EchoHeader::ok());

        match &request.action {
            Action::ConnectionTest => {
                let connection_info = session.connection_info().await;
                info!(
                    host_info = %connection_info.host_info,
                    server_version = %connection_info.server_version,
                    "Connection test succeeded"
                );
                response.push(&connection_info);
            }
            Action::QueryBatch(statements) => {
                let mut failed = 0usize;
                for (index, sql) in statements.iter().enumerate() {
                    let outcome = match session.execute(sql).await {
                        Ok(result) => {
                            debug!(
                                statement = index + 1,
                                affected_rows = result.affected_rows,
                                rows = result.rows.len(),
                                "Statement executed"
                            );
                            StatementOutcome::Succeeded(result)
                        }
                        Err(e) => {
                            failed += 1;
                            warn!(statement = index + 1, code = e.code(), error = %e, "Statement failed");
                            StatementOutcome::Failed {
                                code: e.code(),
                                message: e.to_string(),
                            }
                        }
                    };
                    response.push_statement(&outcome, index + 1 == statements.len());
                }
                info!(
                    statements = statements.len(),
                    failed,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Query batch completed"
                );
            }
        }

        session.close().await;
        response.finish()
    }
}
