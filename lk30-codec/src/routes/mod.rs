use std::time::Duration;

use axum::{Router, http::StatusCode};
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer};

use crate::libs::config::{self, Config};

mod v1;

/// The resources used by this service.
#[derive(Clone)]
pub struct State {
    /// The scope root path for the service.
    ///
    /// For example `/lk30-codec`, the APIs are
    /// - `http://host:port/lk30-codec/api/v1/codec/xxx`
    pub scope_path: String,
}

/// To create resources for the service.
pub fn new_state(conf: &Config) -> State {
    let conf = config::apply_default(conf);
    let scope = conf.scope.unwrap_or_default();
    State {
        scope_path: match scope.len() {
            0 => "".to_string(),
            _ => format!("/{}", scope),
        },
    }
}

/// To register service URIs in the specified root path.
pub fn new_service(state: &State) -> Router {
    let router = Router::new().merge(v1::codec::new_service("/api/v1/codec"));
    match state.scope_path.len() {
        0 => router,
        _ => Router::new().nest(state.scope_path.as_str(), router),
    }
}

/// To create the whole application with CORS and request timeout layers.
pub fn new_app(state: &State, timeout: Duration) -> Router {
    Router::new()
        .merge(new_service(state))
        .layer(CorsLayer::permissive())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
}
