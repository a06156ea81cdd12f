use crate::error::AppError;

/// Workspace-wide result alias.
pub type AppResult<T> = Result<T, AppError>;
