use thiserror::Error;

use crate::operations::Operation;
use crate::store::StoreError;

/// Everything that turns a request into a non-200 response.
#[derive(Debug, Error)]
pub(crate) enum ApiError {
    /// The request body failed field validation.
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    MissingParameter(&'static str),

    #[error("Invalid HTTP Method: {0}")]
    MethodNotAllowed(String),

    #[error("{operation:?} failed: {source}")]
    Store {
        operation: Operation,
        #[source]
        source: StoreError,
    },

    #[error("could not encode response: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ApiError {
    pub fn store(operation: Operation) -> impl FnOnce(StoreError) -> Self {
        move |source| Self::Store { operation, source }
    }

    pub fn status(&self) -> u16 {
        match self {
            Self::Validation(_) | Self::MissingParameter(_) => 400,
            Self::MethodNotAllowed(_) => 405,
            Self::Store { source, .. } => source.status().unwrap_or(501),
            Self::Encode(_) => 500,
        }
    }
}
