//! Password hashing and verification.
//!
//! Centralizes bcrypt handling for registration, login, and the seeded
//! admin account.

use bcrypt::{hash, verify, DEFAULT_COST};

/// Hash a password using the default bcrypt cost.
pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    hash(password, DEFAULT_COST)
}

/// Verify a password against a stored bcrypt hash.
pub fn verify_password(password: &str, hashed: &str) -> Result<bool, bcrypt::BcryptError> {
    verify(password, hashed)
}
