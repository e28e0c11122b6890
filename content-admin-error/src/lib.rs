pub mod backend;
pub mod form;
pub mod web;

use anyhow::Error as AnyhowError;
use backend::BackendError;
use config::ConfigError;
use serde_json::Error as SerdeJsonError;
use std::{error::Error as StdError, io::Error as IoError};
use thiserror::Error;
use tokio::task::JoinError;
use web::WebError;

pub type AdminResult<T, E = AdminError> = anyhow::Result<T, E>;
pub type WebResult<T, E = WebError> = anyhow::Result<T, E>;
pub type BackendResult<T, E = BackendError> = Result<T, E>;

#[derive(Error, Debug, Default)]
pub enum AdminError {
    #[error("service unavailable")]
    #[default]
    ServiceUnavailable,
    #[error("{0}")]
    JoinError(#[from] JoinError),
    #[error("{0}")]
    StdError(#[from] Box<dyn StdError + Send + Sync>),
    #[error("{0}")]
    IoError(#[from] IoError),
    #[error("{0}")]
    Msg(String),
    #[error("{0}")]
    Anyhow(#[from] AnyhowError),
    #[error("{0}")]
    Json(#[from] SerdeJsonError),
    #[error("{0}")]
    ConfigError(#[from] ConfigError),
    #[error("{0}")]
    BackendError(#[from] BackendError),
    #[error("{0}")]
    WebError(#[from] WebError),
    #[error("Initialization error: {0}")]
    InitializationError(String),
    #[error("Shutdown error: {0}")]
    ShutdownError(String),
}

impl From<String> for AdminError {
    #[inline]
    fn from(e: String) -> Self {
        AdminError::Msg(e)
    }
}

impl From<&str> for AdminError {
    #[inline]
    fn from(e: &str) -> Self {
        AdminError::Msg(e.to_string())
    }
}
