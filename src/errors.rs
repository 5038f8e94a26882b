use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Policy violation: {0}")]
    PolicyViolation(String),

    #[error("Submission already in flight for attempt '{0}'")]
    ConcurrentSubmission(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl AppError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::AlreadyExists(_) => "ALREADY_EXISTS",
            AppError::PolicyViolation(_) => "POLICY_VIOLATION",
            AppError::ConcurrentSubmission(_) => "CONCURRENT_SUBMISSION",
            AppError::DatabaseError(_) => "DATABASE_ERROR",
            AppError::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// True for the losing side of a submit race; callers treat these as
    /// silent no-ops rather than user-visible failures.
    pub fn is_benign_race(&self) -> bool {
        matches!(self, AppError::ConcurrentSubmission(_))
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        use mongodb::error::{ErrorKind, WriteFailure};

        // A duplicate-key write is the uniqueness constraint firing, not a
        // storage fault; callers rely on the distinction to resolve races.
        if let ErrorKind::Write(WriteFailure::WriteError(write_err)) = &*err.kind {
            if write_err.code == 11000 {
                return AppError::AlreadyExists(write_err.message.clone());
            }
        }
        AppError::DatabaseError(err.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for AppError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        AppError::InternalError(format!("BSON serialization error: {}", err))
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            AppError::PolicyViolation("test".into()).error_code(),
            "POLICY_VIOLATION"
        );
        assert_eq!(
            AppError::ConcurrentSubmission("a-1".into()).error_code(),
            "CONCURRENT_SUBMISSION"
        );
        assert_eq!(AppError::NotFound("test".into()).error_code(), "NOT_FOUND");
    }

    #[test]
    fn test_error_messages() {
        let err = AppError::NotFound("quiz".into());
        assert_eq!(err.to_string(), "Not found: quiz");

        let err = AppError::PolicyViolation("maximum attempts reached".into());
        assert_eq!(err.to_string(), "Policy violation: maximum attempts reached");
    }

    #[test]
    fn test_only_concurrent_submission_is_benign() {
        assert!(AppError::ConcurrentSubmission("a-1".into()).is_benign_race());
        assert!(!AppError::DatabaseError("down".into()).is_benign_race());
        assert!(!AppError::AlreadyExists("dup".into()).is_benign_race());
    }
}
