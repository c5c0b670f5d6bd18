use service_core::error::AppError;
use thiserror::Error;

use crate::services::{scope::ScopeError, IntrospectionError};

#[derive(Debug, Error)]
pub enum TransactionError {
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Malformed scope: {0}")]
    MalformedScope(String),

    #[error(transparent)]
    Introspection(#[from] IntrospectionError),
}

impl From<ScopeError> for TransactionError {
    fn from(err: ScopeError) -> Self {
        match err {
            ScopeError::MalformedScope(token) => TransactionError::MalformedScope(token),
        }
    }
}

impl From<TransactionError> for AppError {
    fn from(err: TransactionError) -> Self {
        match err {
            TransactionError::MissingField(field) => {
                AppError::BadRequest(anyhow::anyhow!("Missing field: {}", field))
            }
            TransactionError::Unauthorized => AppError::Unauthorized(anyhow::anyhow!("Unauthorized")),
            TransactionError::MalformedScope(token) => AppError::InternalError(anyhow::anyhow!(
                "Introspected scope token '{}' has a non-integer transaction id",
                token
            )),
            TransactionError::Introspection(err) => AppError::BadGateway(err.to_string()),
        }
    }
}
