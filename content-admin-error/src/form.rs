use crate::backend::BackendError;
use thiserror::Error;

/// A failed dialog submission.
///
/// `message` is the generic text shown to the user ("Failed to add event.
/// Please try again."); `cause` keeps the backend failure for the logs.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct SubmitError {
    pub message: String,
    #[source]
    pub cause: BackendError,
}

impl SubmitError {
    pub fn new(message: impl Into<String>, cause: BackendError) -> Self {
        Self {
            message: message.into(),
            cause,
        }
    }
}
