use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};

use crate::{
    pkg::{internal::auth::VerifyOps, internal::errors::AuthError, server::state::AppState},
    prelude::Result,
};

/// Resolves the bearer token and stashes the verified identity as a request
/// extension. Any client-asserted user id in the body is ignored; ownership
/// decisions downstream use only this identity.
pub async fn authenticate(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let token = match bearer_token(&headers) {
        Ok(token) => token,
        Err(e) => {
            tracing::warn!("token missing, authentication denied");
            return Err(e);
        }
    };
    let identity = state.auth_client.resolve(token).await?;
    request.extensions_mut().insert(Arc::new(identity));
    Ok(next.run(request).await)
}

pub fn bearer_token(headers: &HeaderMap) -> Result<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AuthError::MissingCredential.into())
}
