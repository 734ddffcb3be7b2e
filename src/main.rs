//! HTTP tunnel server.
//!
//! Accepts tunnel requests over HTTP POST, runs them against the configured
//! database engine and answers with the binary result protocol.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{ArgAction, Parser};
use ntunnel::config::{Engine, TunnelConfig};
use ntunnel::server::{router, AppState};
use ntunnel::telemetry;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "ntunnel")]
#[command(about = "HTTP tunnel for database clients", version)]
struct Args {
    /// Address to listen on
    #[arg(long, env = "NTUNNEL_LISTEN", default_value = "0.0.0.0:8000")]
    listen: SocketAddr,

    /// Database engine requests are forwarded to
    #[arg(long, env = "NTUNNEL_ENGINE", value_enum, default_value_t = Engine::MySql)]
    engine: Engine,

    /// Serve the diagnostic page on GET and for incomplete requests
    #[arg(
        long,
        env = "NTUNNEL_ALLOW_TEST_MENU",
        action = ArgAction::Set,
        default_value_t = true
    )]
    allow_test_menu: bool,

    /// Directory SQLite database paths are resolved against
    #[arg(long, env = "NTUNNEL_SQLITE_ROOT", default_value = ".")]
    sqlite_root: PathBuf,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, env = "JSON_LOGS", default_value = "false")]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    telemetry::init(&args.log_level, args.json_logs)?;

    let config = TunnelConfig::new(args.engine)
        .allow_test_menu(args.allow_test_menu)
        .sqlite_root(args.sqlite_root);

    info!(
        listen = %args.listen,
        engine = config.engine.name(),
        allow_test_menu = config.allow_test_menu,
        "Starting HTTP tunnel"
    );

    let app = router(AppState::new(config));
    let listener = tokio::net::TcpListener::bind(args.listen).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP tunnel stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Received shutdown signal");
    }
}
