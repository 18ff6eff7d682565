//! Password hashing via bcrypt.

use std::sync::OnceLock;

use super::AuthError;

/// bcrypt cost factor.
const BCRYPT_COST: u32 = 10;

/// Hash a password with bcrypt (cost 10).
///
/// Any password, including the empty string, is accepted. Length policy
/// belongs to the caller.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    bcrypt::hash(password, BCRYPT_COST).map_err(|e| AuthError::internal("password.hash", e))
}

/// Verify a password against a bcrypt hash.
///
/// A hash that cannot be parsed never matches.
pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

/// Plaintext behind [`dummy_hash`].
const DUMMY_PASSWORD: &str = "sso-unknown-user";

/// A real cost-10 hash, computed once, to verify against when no user exists.
fn dummy_hash() -> &'static str {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| hash_password(DUMMY_PASSWORD).unwrap_or_default())
}

/// Spend one bcrypt verification on a password for an account that does
/// not exist, so an unknown email costs as much as a wrong password.
/// Always returns `false`.
pub fn verify_unknown_user(password: &str) -> bool {
    let _ = verify_password(password, dummy_hash());
    false
}
