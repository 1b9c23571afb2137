use thiserror::Error;

use crate::ids::MenuId;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("menu not found: {0}")]
    NotFound(MenuId),
    #[error("parent menu not found: {0}")]
    ParentNotFound(MenuId),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("invalid operation: {0}")]
    InvalidOperation(String),
    #[error("inconsistent state: {0}")]
    InconsistentState(String),
    #[error("storage error: {0}")]
    Storage(String),
}

impl Error {
    /// Machine-readable code reported to API clients.
    pub fn code(&self) -> &'static str {
        match self {
            Error::NotFound(_) => "NOT_FOUND",
            Error::ParentNotFound(_) => "PARENT_NOT_FOUND",
            Error::Validation(_) => "VALIDATION_ERROR",
            Error::InvalidOperation(_) => "INVALID_OPERATION",
            Error::InconsistentState(_) | Error::Storage(_) => "INTERNAL_SERVER_ERROR",
        }
    }
}
