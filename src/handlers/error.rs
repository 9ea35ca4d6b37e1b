//! Handler outcomes that end a request early.

use axum::{
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::http::request::RequestView;
use crate::http::response;

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("Method Not Allowed")]
    MethodNotAllowed,

    #[error("Not Found")]
    NotFound,

    #[error("Unauthorised Attempt")]
    Unauthorized,

    /// The document could not be rendered; fatal for this request only.
    #[error("failed to serialize response: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        match self {
            HandlerError::MethodNotAllowed => {
                response::plain_error(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
            }
            HandlerError::NotFound => response::plain_error(StatusCode::NOT_FOUND, "Not Found"),
            HandlerError::Unauthorized => {
                response::plain_error(StatusCode::UNAUTHORIZED, "Unauthorised Attempt")
            }
            HandlerError::Serialization(e) => {
                tracing::error!(error = %e, "Failed to serialize response document");
                response::plain_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
        }
    }
}

/// Reject the request unless its method is one of `methods`.
pub fn allow(view: &RequestView, methods: &[Method]) -> Result<(), HandlerError> {
    if methods.contains(view.method()) {
        Ok(())
    } else {
        Err(HandlerError::MethodNotAllowed)
    }
}
