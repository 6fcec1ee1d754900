use domain::DomainError;
use thiserror::Error;

use crate::cache::CacheError;
use crate::password::PasswordHasherError;
use crate::queue::QueueError;
use crate::repository::RepositoryError;

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
    #[error("queue error: {0}")]
    Queue(#[from] QueueError),
    #[error("cache error: {0}")]
    Cache(#[from] CacheError),
    #[error("password error: {0}")]
    Password(#[from] PasswordHasherError),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("authentication failed")]
    Authentication,
}
