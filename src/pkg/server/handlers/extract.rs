use axum::{Json, extract::State, http::HeaderMap};
use serde::{Deserialize, Serialize};

use crate::{
    conf::settings,
    pkg::{
        internal::{
            auth::VerifyOps,
            extract::{decode_payload, extract_document},
            storage::S3Ops,
        },
        server::{middlewares::authn::bearer_token, state::AppState},
    },
    prelude::Result,
};

#[derive(Deserialize)]
pub struct ExtractInput {
    pub file: Option<String>,
    #[serde(default = "default_extension")]
    pub extension: String,
}

fn default_extension() -> String {
    "pdf".into()
}

#[derive(Serialize)]
pub struct ExtractOutput {
    pub text: String,
}

/// Decodes and parses the uploaded document, returning its plain text.
/// When the request carries a valid bearer token the raw bytes are also
/// written to object storage, as a spawned side effect that never delays
/// or fails the response.
pub async fn extract_text(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<ExtractInput>,
) -> Result<Json<ExtractOutput>> {
    let encoded = input.file.as_deref().unwrap_or("");
    let data = decode_payload(encoded, settings.max_document_bytes)?;
    let text = extract_document(&data, &input.extension, settings.max_document_bytes)?;

    if let Ok(token) = bearer_token(&headers) {
        let token = token.to_string();
        let extension = input.extension.clone();
        let auth_client = state.auth_client.clone();
        let s3_client = state.s3_client.clone();
        tokio::spawn(async move {
            let identity = match auth_client.resolve(&token).await {
                Ok(identity) => identity,
                Err(e) => {
                    tracing::warn!("skipping resume upload, token did not resolve: {}", e);
                    return;
                }
            };
            let key = format!("{}/resume.{}", &identity.user_id, &extension);
            let content_type = match extension.as_str() {
                "docx" => {
                    "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
                }
                _ => "application/pdf",
            };
            if let Err(e) = s3_client
                .upload_object(&settings.s3_bucket_name, &key, data, content_type)
                .await
            {
                tracing::error!("resume upload failed for {}: {}", &key, e);
            } else {
                tracing::debug!("resume stored at {}", &key);
            }
        });
    }

    Ok(Json(ExtractOutput { text }))
}
