//! Password hashing and verification using Argon2
//!
//! Uses the argon2id variant with the crate's default parameters. The work
//! factor is fixed at build time; hashes carry their own salt and parameters
//! in PHC format.

use argon2::{
    password_hash::{
        rand_core::OsRng, Error as PasswordHashError, PasswordHash, PasswordHasher,
        PasswordVerifier, SaltString,
    },
    Argon2,
};

use crate::types::AuthError;

/// Hash a password using Argon2id
///
/// Returns the PHC-formatted hash string that includes the salt and parameters.
/// Password content is not validated here; an empty password hashes like any other.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hashing(format!("failed to hash password: {e}")))
}

/// Verify a password against a stored hash
///
/// `Ok(false)` means the hash is well formed but the password does not match.
/// A hash this module could not have produced is an error, not a mismatch.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AuthError::Hashing(format!("invalid password hash format: {e}")))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(PasswordHashError::Password) => Ok(false),
        Err(e) => Err(AuthError::Hashing(format!("password verification failed: {e}"))),
    }
}
