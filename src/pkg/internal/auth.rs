use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::{conf::settings, pkg::internal::errors::AuthError, prelude::Result};

/// Stable, server-verified reference to the acting user. Ownership of the
/// account itself lives with the identity provider; this core only scopes
/// data by the resolved id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
}

#[derive(Debug)]
pub struct AuthClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Deserialize)]
struct ProviderUser {
    id: String,
}

impl AuthClient {
    pub fn new() -> Self {
        AuthClient {
            http: reqwest::Client::new(),
            base_url: settings.auth_endpoint.trim_end_matches('/').to_string(),
            api_key: settings.auth_api_key.clone(),
        }
    }
}

#[async_trait]
pub trait VerifyOps {
    /// Resolves a bearer token to an identity via the provider's user
    /// endpoint. Nothing is cached; every call re-verifies.
    async fn resolve(&self, token: &str) -> Result<Identity>;
}

#[async_trait]
impl VerifyOps for Arc<AuthClient> {
    async fn resolve(&self, token: &str) -> Result<Identity> {
        if token.trim().is_empty() {
            return Err(AuthError::MissingCredential.into());
        }
        let res = self
            .http
            .get(format!("{}/auth/v1/user", &self.base_url))
            .bearer_auth(token)
            .header("apikey", &self.api_key)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("identity provider unreachable: {}", e);
                AuthError::InvalidCredential
            })?;
        if res.status() != StatusCode::OK {
            tracing::warn!("identity provider rejected token: {}", res.status());
            return Err(AuthError::InvalidCredential.into());
        }
        let user: ProviderUser = res.json().await.map_err(|_| AuthError::InvalidCredential)?;
        Ok(Identity { user_id: user.id })
    }
}
