//! Password hashing via bcrypt, plus the input rules for credentials.

use super::AuthError;
use crate::models::PasswordHash;

/// bcrypt cost factor.
const BCRYPT_COST: u32 = 10;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Hash a password with bcrypt (cost 10, random salt).
pub fn hash_password(password: &str) -> Result<PasswordHash, AuthError> {
    bcrypt::hash(password, BCRYPT_COST)
        .map(PasswordHash::from_stored)
        .map_err(|e| AuthError::Internal(format!("bcrypt hash: {e}")))
}

/// Verify a password against a bcrypt hash.
pub fn verify_password(password: &str, hash: &PasswordHash) -> Result<bool, AuthError> {
    bcrypt::verify(password, hash.as_str())
        .map_err(|e| AuthError::Internal(format!("bcrypt verify: {e}")))
}

/// bcrypt of a throwaway password at [`BCRYPT_COST`]. Nothing hashes to it at
/// runtime, so the first unknown-email lookup costs the same as the rest.
const DUMMY_HASH: &str = "$2b$10$HqtmX.rGvVx4T.akchcgG.H6C9Z2grkHSRyw/XOgecdA22on5thke";

/// Burn the same bcrypt work as a real verification, for lookups that found
/// no user. Keeps "unknown email" and "wrong password" indistinguishable by
/// timing as well as by error.
pub(crate) fn verify_against_dummy(password: &str) {
    let _ = bcrypt::verify(password, DUMMY_HASH);
}

/// Minimal email shape check: something before and after a single `@`.
pub fn validate_email(email: &str) -> Result<(), AuthError> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@')
        }
        None => false,
    };
    if !valid || email.chars().any(char::is_whitespace) {
        return Err(AuthError::Validation("Email must be a valid address".into()));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.as_str().starts_with("$2"));
        assert!(verify_password("correct horse", &hash).unwrap());
        assert!(!verify_password("battery staple", &hash).unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_password("same").unwrap();
        let b = hash_password("same").unwrap();
        assert_ne!(a.as_str(), b.as_str());
    }

    #[test]
    fn dummy_hash_matches_the_real_cost() {
        let parts: Vec<&str> = DUMMY_HASH.split('$').collect();
        assert_eq!(parts[2].parse::<u32>().unwrap(), BCRYPT_COST);
        assert!(bcrypt::verify("quire-dummy-password", DUMMY_HASH).unwrap());
        assert!(!bcrypt::verify("anything else", DUMMY_HASH).unwrap());
    }

    #[test]
    fn email_rules() {
        assert!(validate_email("a@example.com").is_ok());
        assert!(validate_email("a@").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("a@b@c").is_err());
        assert!(validate_email("a b@example.com").is_err());
    }

    #[test]
    fn password_rules() {
        assert!(validate_password("123456").is_ok());
        assert!(validate_password("12345").is_err());
    }
}
