use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("no credential provided")]
    MissingCredential,
    #[error("credential rejected by the identity provider")]
    InvalidCredential,
}

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("no document payload supplied")]
    EmptyPayload,
    #[error("document could not be parsed")]
    MalformedDocument,
    #[error("document exceeds the configured size limit")]
    TooLarge,
}

#[derive(Debug, Error)]
pub enum AiProviderError {
    #[error("evaluation backend unavailable")]
    Unavailable,
    #[error("evaluation backend throttled the request")]
    RateLimited,
    #[error("evaluation backend returned no usable text")]
    EmptyCompletion,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("required field is empty: {0}")]
    EmptyField(&'static str),
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    #[error(transparent)]
    AiProvider(#[from] AiProviderError),
    #[error("feedback could not be saved")]
    WriteFailed(#[source] sqlx::Error),
    #[error("database error")]
    Database(#[from] sqlx::Error),
    #[error("migration error")]
    Migrate(#[from] sqlx::migrate::MigrateError),
    #[error("object storage error")]
    Storage(String),
    #[error("i/o error")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn status(&self) -> StatusCode {
        match self {
            Error::Auth(_) => StatusCode::UNAUTHORIZED,
            Error::EmptyField(_) => StatusCode::BAD_REQUEST,
            Error::Extraction(ExtractionError::EmptyPayload)
            | Error::Extraction(ExtractionError::TooLarge) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("request failed: {:?}", &self);
        } else {
            tracing::warn!("request rejected: {}", &self);
        }
        (status, Json(json!({"error": self.to_string()}))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_errors_map_to_401() {
        assert_eq!(
            Error::from(AuthError::MissingCredential).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            Error::from(AuthError::InvalidCredential).status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn client_caused_errors_map_to_400() {
        assert_eq!(
            Error::EmptyField("resumeText").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::from(ExtractionError::EmptyPayload).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::from(ExtractionError::TooLarge).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn backend_errors_map_to_500() {
        assert_eq!(
            Error::from(ExtractionError::MalformedDocument).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            Error::from(AiProviderError::Unavailable).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            Error::from(AiProviderError::RateLimited).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            Error::WriteFailed(sqlx::Error::PoolClosed).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
