//! Password hashing and verification using Argon2id.
//!
//! Argon2id is the recommended memory-hard password hashing algorithm.
//! Hashes are stored in PHC string format, which embeds the salt and
//! parameters alongside the digest.

use argon2::password_hash::{rand_core::OsRng, Error, PasswordHasher, SaltString};
use argon2::{Argon2, PasswordHash, PasswordVerifier};

/// Hash a plaintext password with Argon2id and a random salt.
///
/// Returns the hash in PHC string format, suitable for storage.
pub fn hash_password(password: &str) -> Result<String, Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC-format hash.
///
/// Returns `Ok(false)` on mismatch rather than an error, so callers can
/// treat a wrong password as a normal authentication failure.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, Error> {
    let parsed = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}
