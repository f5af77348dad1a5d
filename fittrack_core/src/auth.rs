//! Credential hashing for signup and login.
//!
//! Passwords are stored as unsalted hex-encoded SHA-256 digests. This is a
//! single fast hash with no per-user salt and no work factor; the scheme is
//! intentionally kept as-is and is not suitable for hardening-sensitive
//! deployments.

use sha2::{Digest, Sha256};

/// Hash a plaintext password into a 64-character lowercase hex digest
///
/// Deterministic: the same input always produces the same digest.
pub fn hash_password(password: &str) -> String {
    let digest = Sha256::digest(password.as_bytes());
    hex::encode(digest)
}

/// Check a candidate password against a stored digest
pub fn verify_password(stored_digest: &str, candidate: &str) -> bool {
    hash_password(candidate) == stored_digest
}
