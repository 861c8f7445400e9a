use crate::services::{activity_service::ActivityError, auth_service::AuthError};

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Unauthorized(String),
    Internal(String),
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest(message)
            | Self::Unauthorized(message)
            | Self::Internal(message) => message.as_str(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for AppError {}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::DuplicateIdentity | AuthError::Validation(_) => {
                AppError::bad_request(err.to_string())
            }
            AuthError::InvalidCredentials | AuthError::Unauthenticated => {
                AppError::unauthorized(err.to_string())
            }
            AuthError::Store(_) | AuthError::Internal(_) => {
                AppError::internal("Could not complete the request")
            }
        }
    }
}

/// Favorites endpoints answer every failure with 400; store details stay in the log.
impl From<ActivityError> for AppError {
    fn from(err: ActivityError) -> Self {
        match err {
            ActivityError::Store(_) => AppError::bad_request("Could not complete the request"),
            other => AppError::bad_request(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AppError;
    use crate::services::{activity_service::ActivityError, auth_service::AuthError};

    #[test]
    fn internal_auth_failures_hide_library_details() {
        let err = AppError::from(AuthError::Internal(
            "password hashing failed: salt too short".to_string(),
        ));
        assert!(matches!(err, AppError::Internal(_)));
        assert_eq!(err.message(), "Could not complete the request");
    }

    #[test]
    fn activity_failures_are_bad_requests() {
        let err = AppError::from(ActivityError::NotFound);
        assert!(matches!(err, AppError::BadRequest(_)));
        assert_eq!(err.message(), "Activity not found");
    }
}
