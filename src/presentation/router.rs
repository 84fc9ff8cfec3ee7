use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::application::ports::{Annotator, FileLoader, UnitSplitter};
use crate::infrastructure::observability::request_id_middleware;
use crate::presentation::handlers::{extract_handler, health_handler};
use crate::presentation::state::AppState;

pub fn create_router<F, S, A>(state: AppState<F, S, A>) -> Router
where
    F: FileLoader + 'static,
    S: UnitSplitter + 'static + ?Sized,
    A: Annotator + 'static + ?Sized,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/v1/extract", post(extract_handler::<F, S, A>))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}
