use thiserror::Error;

use crate::engine::validation::PromotionValidationError;
use crate::repository::RepositoryError;

pub mod products;
pub mod promotions;

/// Errors returned by the service layer to its callers.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("not found")]
    NotFound,
    #[error(transparent)]
    Validation(#[from] PromotionValidationError),
    #[error("{0}")]
    Form(String),
    #[error("internal error")]
    Internal,
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound,
            RepositoryError::Unexpected(message) => {
                log::error!("Repository failure: {message}");
                ServiceError::Internal
            }
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
