pub mod dashboard;
pub mod entries;
pub mod health;
pub mod presets;

use crate::error::{AppError, AppResult};

/// Separates validation failures, which go back to the dashboard as a flash
/// message, from errors that become error responses.
pub(crate) fn split_validation<T>(result: Result<T, AppError>) -> AppResult<Result<T, String>> {
    match result {
        Ok(value) => Ok(Ok(value)),
        Err(AppError::Validation(message)) => Ok(Err(message)),
        Err(e) => Err(e),
    }
}
