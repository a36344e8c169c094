//! Password hashing and verification
//!
//! Uses bcrypt for salted, slow password hashing. Every call to `hash`
//! draws a fresh salt, which is embedded in the resulting digest.

use crate::error::AppError;
use tracing::debug;

#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Hash a password using bcrypt
    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        bcrypt::hash(password, self.cost)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
    }

    /// Verify a password against a stored digest.
    ///
    /// A malformed digest counts as a mismatch so callers can only ever
    /// report "invalid credentials".
    pub fn verify(&self, password: &str, digest: &str) -> bool {
        bcrypt::verify(password, digest).unwrap_or_else(|e| {
            debug!("Password digest could not be checked: {}", e);
            false
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MIN_BCRYPT_COST;

    #[test]
    fn test_hash_then_verify() {
        let hasher = PasswordHasher::new(MIN_BCRYPT_COST);
        let digest = hasher.hash("correct horse").unwrap();
        assert_ne!(digest, "correct horse");
        assert!(hasher.verify("correct horse", &digest));
        assert!(!hasher.verify("battery staple", &digest));
    }

    #[test]
    fn test_salt_changes_every_time() {
        let hasher = PasswordHasher::new(MIN_BCRYPT_COST);
        let a = hasher.hash("x").unwrap();
        let b = hasher.hash("x").unwrap();
        assert_ne!(a, b);
        assert!(hasher.verify("x", &a) && hasher.verify("x", &b));
    }

    #[test]
    fn test_malformed_digest_is_a_mismatch() {
        let hasher = PasswordHasher::new(MIN_BCRYPT_COST);
        assert!(!hasher.verify("x", "not-a-bcrypt-digest"));
        assert!(!hasher.verify("x", ""));
    }
}
