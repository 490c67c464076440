use db::DatabaseError;
use storage::StorageError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Connection profile '{0}' not found")]
    ProfileNotFound(String),

    #[error("Invalid object key '{0}'")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::Storage(e) if e.is_not_found())
    }
}

impl From<AppError> for utils::error::Error {
    fn from(err: AppError) -> Self {
        utils::error::Error::with_source("Operation failed", Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
