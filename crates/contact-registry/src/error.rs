//! Registry errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("code {0} is already registered")]
    DuplicateCode(String),

    #[error("code {0} not found")]
    NotFound(String),

    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
