//! HTTP surface of the tunnel.

use std::sync::Arc;

use axum::{
    extract::{rejection::FormRejection, Form, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use bytes::Bytes;
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::config::{Engine, TunnelConfig};
use crate::error::TunnelError;
use crate::protocol::error_response;
use crate::request::TunnelRequest;
use crate::tunnel::Tunnel;

/// Content type the client expects for binary responses.
pub const BINARY_CONTENT_TYPE: &str = "text/plain; charset=x-user-defined";

const TEST_PAGE: &str = include_str!("test_page.html");

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<TunnelConfig>,
    pub tunnel: Tunnel,
}

impl AppState {
    pub fn new(config: TunnelConfig) -> Self {
        let config = Arc::new(config);
        Self {
            tunnel: Tunnel::new(config.clone()),
            config,
        }
    }
}

/// Router accepting the tunnel on any path.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(show_test_page).post(handle_tunnel))
        .route("/*path", get(show_test_page).post(handle_tunnel))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn show_test_page(State(state): State<AppState>) -> Response {
    test_page_or_denied(&state.config)
}

async fn handle_tunnel(
    State(state): State<AppState>,
    form: Result<Form<Vec<(String, String)>>, FormRejection>,
) -> Response {
    let fields = match form {
        Ok(Form(fields)) => fields,
        Err(rejection) => {
            debug!(error = %rejection, "Unreadable form body");
            Vec::new()
        }
    };

    let request = match TunnelRequest::from_form(&fields) {
        Ok(request) => request,
        Err(TunnelError::MissingParameters) if state.config.allow_test_menu => {
            return render_test_page(&state.config).into_response();
        }
        Err(e) => {
            debug!(error = %e, "Rejected tunnel request");
            return binary(error_response(e.code(), &e.to_string()));
        }
    };

    binary(state.tunnel.respond(&request).await)
}

fn binary(body: Bytes) -> Response {
    (
        [
            (header::CONTENT_TYPE, BINARY_CONTENT_TYPE.to_string()),
            (header::CONTENT_LENGTH, body.len().to_string()),
        ],
        body,
    )
        .into_response()
}

fn test_page_or_denied(config: &TunnelConfig) -> Response {
    if config.allow_test_menu {
        render_test_page(config).into_response()
    } else {
        (StatusCode::FORBIDDEN, "Access denied").into_response()
    }
}

fn render_test_page(config: &TunnelConfig) -> Html<String> {
    let default_port = match config.engine {
        Engine::MySql => crate::mysql::DEFAULT_PORT.to_string(),
        Engine::Sqlite => String::new(),
    };

    Html(
        TEST_PAGE
            .replace("{{VERSION}}", env!("CARGO_PKG_VERSION"))
            .replace("{{ENGINE}}", config.engine.name())
            .replace("{{DEFAULT_PORT}}", &default_port),
    )
}
