use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

use crate::{backend::BackendError, form::SubmitError, AdminError};

#[derive(Error, Debug)]
pub enum WebError {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("BadRequest: `{0}`")]
    BadRequest(String),
    #[error("`{0}` not found")]
    NotFound(String),
    /// A user-facing failure message, reported as-is.
    #[error("{0}")]
    Failed(String),
    #[error("InternalError: `{0}`")]
    InternalError(String),
    #[error("MultipartError: `{0}`")]
    MultipartError(String),
}

impl From<std::io::Error> for WebError {
    fn from(e: std::io::Error) -> Self {
        WebError::InternalError(e.to_string())
    }
}

impl From<AdminError> for WebError {
    fn from(e: AdminError) -> Self {
        match e {
            AdminError::BackendError(inner) => inner.into(),
            other => WebError::InternalError(other.to_string()),
        }
    }
}

impl From<BackendError> for WebError {
    fn from(e: BackendError) -> Self {
        match e {
            BackendError::Validation(msg) => WebError::BadRequest(msg),
            BackendError::NotFound(msg) => WebError::NotFound(msg),
            other => WebError::InternalError(other.to_string()),
        }
    }
}

impl From<SubmitError> for WebError {
    fn from(e: SubmitError) -> Self {
        if e.cause.is_validation() {
            WebError::BadRequest(e.message)
        } else {
            WebError::Failed(e.message)
        }
    }
}

impl From<actix_multipart::MultipartError> for WebError {
    fn from(e: actix_multipart::MultipartError) -> Self {
        WebError::MultipartError(e.to_string())
    }
}

impl ResponseError for WebError {
    fn error_response(&self) -> HttpResponse {
        let mut body = json!({
            "message": self.to_string()
        });
        match self {
            WebError::Unauthorized => {
                body["error"] = json!("Unauthorized");
                HttpResponse::Unauthorized().json(body)
            }
            WebError::BadRequest(msg) => {
                body["error"] = json!("Bad Request");
                body["message"] = json!(msg);
                HttpResponse::BadRequest().json(body)
            }
            WebError::NotFound(_) => {
                body["error"] = json!("Not Found");
                HttpResponse::NotFound().json(body)
            }
            WebError::Failed(_) | WebError::InternalError(_) => {
                body["error"] = json!("Internal Server Error");
                HttpResponse::InternalServerError().json(body)
            }
            WebError::MultipartError(msg) => {
                body["error"] = json!("Multipart Error");
                body["message"] = json!(msg);
                HttpResponse::BadRequest().json(body)
            }
        }
    }
}
