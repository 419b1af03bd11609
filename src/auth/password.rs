use argon2::password_hash::{self, rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use error_stack::{Result, ResultExt};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("Failed to generate password hash")]
pub struct HashPasswordError;

#[derive(Debug, Error)]
#[error("Failed to verify password")]
pub struct VerifyPasswordError;

/// Hashes a password into an argon2id PHC string with a random salt.
///
/// This is CPU heavy, run it inside [`tokio::task::spawn_blocking`].
pub fn hash(password: &str) -> Result<String, HashPasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .change_context(HashPasswordError)
}

/// Returns `false` on mismatch. Errors are reserved for stored
/// hashes that cannot be parsed or checked.
pub fn verify(password: &str, stored: &str) -> Result<bool, VerifyPasswordError> {
    let stored = PasswordHash::new(stored)
        .change_context(VerifyPasswordError)
        .attach_printable("stored password hash is not a PHC string")?;

    // parameters come from the PHC string, not from `Argon2::default`
    match Argon2::default().verify_password(password.as_bytes(), &stored) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(error) => Err(error).change_context(VerifyPasswordError),
    }
}
