use std::time::Instant;

use axum::extract::{FromRequestParts, MatchedPath, RawPathParams, Request};
use axum::middleware::Next;
use axum::response::Response;

/// Logs one `screening request` event per call: the route template rather
/// than the raw path, the decoded patient name for per-patient routes, the
/// status and the handling time.
pub async fn request_log(req: Request, next: Next) -> Response {
    let started = Instant::now();
    let method = req.method().clone();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    let (mut parts, body) = req.into_parts();
    let patient = RawPathParams::from_request_parts(&mut parts, &())
        .await
        .ok()
        .and_then(|params| {
            params
                .iter()
                .find(|(key, _)| *key == "name")
                .map(|(_, value)| value.to_string())
        });
    let req = Request::from_parts(parts, body);

    let response = next.run(req).await;

    tracing::info!(
        method = %method,
        route = %route,
        patient = patient.as_deref(),
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "screening request"
    );

    response
}
