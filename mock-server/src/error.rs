use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

/// The page the service serves for any request it will not authorize.
pub const FORBIDDEN_PAGE: &str = "<!doctype html>\n<html lang=en>\n<title>403 Forbidden</title>\n<h1>Forbidden</h1>\n<p>Please provide 'auth_key' Header</p>\n";

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Unknown credentials or a missing/unknown `auth_key` header.
    #[error("forbidden")]
    Forbidden,

    #[error("{0}")]
    BadRequest(String),
}

impl From<axum::extract::multipart::MultipartError> for ServiceError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        ServiceError::BadRequest(err.body_text())
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        match self {
            ServiceError::Forbidden => (StatusCode::FORBIDDEN, Html(FORBIDDEN_PAGE)).into_response(),
            ServiceError::BadRequest(message) => (StatusCode::BAD_REQUEST, message).into_response(),
        }
    }
}
