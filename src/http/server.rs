//! HTTP server setup and request dispatch.
//!
//! # Responsibilities
//! - Create the Axum router with a single fallback handler
//! - Wire up middleware (tracing, body limit, timeout, request ID)
//! - Dispatch each request to its receive route by exact path
//! - Run the submission pipeline and turn its outcome into a response
//! - Drain in-flight requests on shutdown

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{DefaultBodyLimit, State},
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use chrono::Utc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServiceConfig;
use crate::http::form::decode_form;
use crate::http::request::{referer, request_id};
use crate::http::response::{see_other, DispatchError, MSG_NOT_FOUND};
use crate::lifecycle::shutdown::notified;
use crate::observability::metrics::{record_submission, NO_ROUTE};
use crate::pipeline::{assemble, FormValues, OutputTarget};
use crate::receive::{Route, Schema};
use crate::routing::{RouteMatch, Router as ReceiveRouter};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub routes: Arc<ReceiveRouter>,
    pub output: Arc<OutputTarget>,
}

/// HTTP server for the receive endpoints.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
}

impl HttpServer {
    /// Create a server for a compiled schema.
    pub fn new(config: ServiceConfig, schema: Schema) -> Self {
        let state = AppState {
            routes: Arc::new(ReceiveRouter::new(Arc::new(schema))),
            output: Arc::new(config.output.target()),
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        Router::new()
            .fallback(receive_handler)
            .with_state(state)
            .layer(DefaultBodyLimit::max(config.limits.max_form_bytes))
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.limits.request_timeout_secs,
            )))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// A handle to the fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            output_root = %self.config.output.root.display(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                notified(shutdown).await;
                tracing::info!("Shutdown signal received, draining requests");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}

/// Single entry point: every path is looked up in the schema.
async fn receive_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let request_id = request_id(request.headers()).to_string();

    let route = match state.routes.match_path(&path) {
        RouteMatch::Found { route, .. } => route,
        RouteMatch::NotFound => {
            tracing::warn!(request_id = %request_id, method = %method, path = %path, "404 Not Found");
            record_submission(NO_ROUTE, StatusCode::NOT_FOUND.as_u16(), start_time);
            return (StatusCode::NOT_FOUND, MSG_NOT_FOUND).into_response();
        }
    };

    tracing::info!(request_id = %request_id, method = %method, path = %path, "Receiving submission");

    let response = match dispatch(&state, route, request).await {
        Ok(response) => response,
        Err(e) => {
            let status = e.status();
            if status.is_server_error() {
                tracing::error!(request_id = %request_id, method = %method, path = %path, error = %e, "Submission failed");
            } else {
                tracing::info!(request_id = %request_id, method = %method, path = %path, error = %e, "Submission rejected");
            }
            e.into_response()
        }
    };

    record_submission(&path, response.status().as_u16(), start_time);
    tracing::debug!(request_id = %request_id, method = %method, path = %path, status = %response.status(), "Submission handled");
    response
}

/// Run the pipeline for one matched route.
async fn dispatch(
    state: &AppState,
    route: &Route,
    request: Request<Body>,
) -> Result<Response, DispatchError> {
    let referer = referer(request.headers());
    let form = decode_form(request).await?;
    let record = assemble(route, &form, Utc::now())?;

    if let Some(file) = &route.create_file {
        let rendered = file.name.render(&record)?;
        let output = state.output.clone();
        let format = file.format;

        let written = tokio::task::spawn_blocking(move || {
            output.materialize(&rendered, format, &record)
        })
        .await??;
        tracing::info!(file = %written.display(), "Record written");
    }

    see_other(&redirect_location(&form, referer))
}

/// `callback` form value, else the referer, else the site root.
fn redirect_location(form: &FormValues, referer: Option<String>) -> String {
    form.get("callback")
        .filter(|cb| !cb.is_empty())
        .map(str::to_owned)
        .or(referer)
        .unwrap_or_else(|| "/".to_string())
}
