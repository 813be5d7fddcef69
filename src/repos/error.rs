/*
 * Responsibility
 * - Failures the stores report to their callers
 * - Handlers convert these into AppError (crate::error)
 */
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("db error: {0}")]
    Db(#[from] sqlx::Error),

    #[error("page must be greater than zero, got {0}")]
    InvalidPage(i64),

    #[error("{0}")]
    Conflict(String),

    #[error("invalid stored value: {0}")]
    InvalidRow(String),
}

impl RepoError {
    /// Give unique-constraint violations their own meaning; everything else
    /// stays an opaque database failure.
    pub fn from_sqlx(e: sqlx::Error, conflict: &str) -> Self {
        if let sqlx::Error::Database(dbe) = &e
            && dbe.code().as_deref() == Some("23505")
        {
            return RepoError::Conflict(conflict.to_string());
        }
        RepoError::Db(e)
    }
}
