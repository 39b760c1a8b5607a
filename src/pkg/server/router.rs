use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn_with_state;
use axum::routing::post;
use axum::{Router, routing::get};

use super::handlers;
use super::handlers::probes::{healthz, livez};
use super::middlewares::authn;
use super::state::AppState;
use crate::conf::settings;
use crate::pkg::internal::extract::encoded_cap;
use crate::prelude::Result;

pub async fn build_routes() -> Result<Router> {
    let state = AppState::new().await?;
    // Body limit sized for the configured document cap in its base64 form,
    // with headroom for the JSON envelope; without this axum's 2 MB default
    // would refuse valid documents before the handler runs.
    let upload_body_limit = encoded_cap(settings.max_document_bytes) + 1024;
    let app = Router::new()
        .route("/analyze", post(handlers::feedback::analyze))
        .route("/feedback", get(handlers::feedback::list))
        .layer(from_fn_with_state(state.clone(), authn::authenticate))
        .route(
            "/extractText",
            post(handlers::extract::extract_text).layer(DefaultBodyLimit::max(upload_body_limit)),
        )
        .route("/healthz", get(healthz))
        .route("/livez", get(livez))
        .with_state(state);

    Ok(app)
}
