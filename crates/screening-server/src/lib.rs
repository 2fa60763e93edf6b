//! screening-server
//!
//! HTTP surface of the screening dataset: the reconciled patient list, the
//! correction write-back and per-patient reports.

pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::Router;
use axum::middleware as axum_mw;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};

pub use state::AppState;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/instruments", get(routes::instruments::list_instruments))
        .route("/patients", get(routes::patients::list_patients))
        .route("/patients/{name}", get(routes::patients::get_patient))
        .route("/patients/{name}/report", get(routes::reports::patient_report))
        .route("/refresh", post(routes::patients::refresh))
        .route("/corrections", post(routes::corrections::record_correction))
        .layer(axum_mw::from_fn(middleware::request_log))
        .layer(cors)
        .with_state(state)
}
