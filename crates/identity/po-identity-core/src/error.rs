//! Identity error types.

use crate::types::UserName;
use thiserror::Error;

pub type IdentityResult<T> = Result<T, IdentityError>;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Invalid user name: {0:?}")]
    InvalidUserName(String),

    #[error("User already exists: {0}")]
    AlreadyExists(UserName),

    #[error("User not found: {0}")]
    NotFound(UserName),

    #[error("Storage error: {0}")]
    StorageError(String),
}
