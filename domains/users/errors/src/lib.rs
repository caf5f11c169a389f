use sql_connection::{PgError, PoolError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiUserError {
    #[error("Username {username} already in use.")]
    DuplicateUsername { username: String },
    #[error("Email {email} already in use.")]
    DuplicateEmail { email: String },
    #[error(
        "Creator {creator} is an API user and has no permission to create \
         API users."
    )]
    CreatorNotPermitted { creator: String },
    #[error(
        "There is no creator with username {creator}. Cannot create new API \
         user."
    )]
    UnknownCreator { creator: String },
    #[error("Database error: {0}")]
    Database(#[from] PgError),
    #[error("Database Pool error: {0}")]
    DatabasePool(#[from] PoolError),
    #[error("Password hashing failed: {0}")]
    PasswordHash(String),
    #[error("Internal error: {0}")]
    InternalError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ApiUserError::DuplicateUsername {
            username: "bob".to_string(),
        };
        assert_eq!(err.to_string(), "Username bob already in use.");

        let err = ApiUserError::DuplicateEmail {
            email: "bob@x.com".to_string(),
        };
        assert_eq!(err.to_string(), "Email bob@x.com already in use.");

        let err = ApiUserError::UnknownCreator {
            creator: "ghost".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "There is no creator with username ghost. Cannot create new API \
             user."
        );
    }
}
