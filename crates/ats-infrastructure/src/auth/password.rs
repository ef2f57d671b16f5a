//! Password hashing with bcrypt
//!
//! Produces self-describing hash strings (algorithm parameters and salt
//! are embedded) using a computationally expensive, salted one-way
//! function. Verification delegates the comparison to the bcrypt
//! primitive; no separate comparison path exists.

use ats_domain::{Error, Result};

use crate::constants::BCRYPT_COST;

/// Hash a plaintext password
///
/// Returns the `$2b$...` hash string. Two hashes of the same plaintext
/// differ because of the embedded random salt.
pub fn hash_password(password: &str) -> Result<String> {
    bcrypt::hash(password, BCRYPT_COST)
        .map_err(|e| Error::password_hash(format!("hashing failed: {e}")))
}

/// Verify a plaintext password against a stored hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    bcrypt::verify(password, hash)
        .map_err(|e| Error::password_hash(format!("verification failed: {e}")))
}
