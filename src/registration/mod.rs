// registration/mod.rs - sign-up workflow
//
// validate -> duplicate check -> avatar + password hash -> insert -> token.
// Each step gates the next; the first failure ends the request.

use thiserror::Error;

use crate::auth::password::PasswordError;
use crate::auth::JwtError;
use crate::database::DatabaseError;

pub mod service;
pub mod validation;

pub use service::{Registration, RegistrationService};
pub use validation::{validate, FieldError, RegistrationCandidate, RegistrationRequest};

#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("Validation failed for {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    #[error("User already exists")]
    AlreadyExists,

    #[error("Account store error: {0}")]
    Storage(DatabaseError),

    #[error("Token signing failed: {0}")]
    Signing(#[from] JwtError),

    #[error(transparent)]
    Hashing(#[from] PasswordError),

    #[error("Account store timed out during {0}")]
    Timeout(&'static str),
}

impl RegistrationError {
    /// True for failures caused by the request itself rather than the server.
    pub fn is_client_error(&self) -> bool {
        matches!(self, RegistrationError::Validation(_) | RegistrationError::AlreadyExists)
    }
}

impl From<DatabaseError> for RegistrationError {
    fn from(err: DatabaseError) -> Self {
        match err {
            // Lost a race with a concurrent sign-up; same answer as the fast-path check.
            DatabaseError::DuplicateEmail => RegistrationError::AlreadyExists,
            other => RegistrationError::Storage(other),
        }
    }
}
