use thiserror::Error;

use crate::application::tokens::VerifyError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("access denied, token required")]
    MissingToken,

    #[error("access denied, token invalid")]
    InvalidToken,

    #[error("access denied, bad token")]
    WrongTokenType,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Resource not found")]
    NotFound,

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err.to_string())
    }
}

impl From<VerifyError> for AppError {
    // Expired and malformed both collapse into the same generic denial;
    // the response must not reveal which check failed.
    fn from(_: VerifyError) -> Self {
        AppError::InvalidToken
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(err: bcrypt::BcryptError) -> Self {
        AppError::Internal(err.to_string())
    }
}
