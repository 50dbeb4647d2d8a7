use std::fmt;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("Password hashing task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Plaintext password as submitted by the client.
///
/// Never printed: `Debug` is redacted so the value cannot leak through
/// tracing fields or error chains.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub fn new(plaintext: impl Into<String>) -> Self {
        Self(plaintext.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// Salts and hashes `password` with bcrypt at the given cost.
///
/// bcrypt is deliberately slow, so the work runs on the blocking pool.
pub async fn hash_password(password: Password, cost: u32) -> Result<String, PasswordError> {
    let hashed = tokio::task::spawn_blocking(move || bcrypt::hash(password.expose(), cost)).await??;
    Ok(hashed)
}

/// Compares a plaintext password against a stored bcrypt hash.
pub fn verify_password(password: &Password, hash: &str) -> Result<bool, PasswordError> {
    Ok(bcrypt::verify(password.expose(), hash)?)
}
