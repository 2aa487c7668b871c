//! Argon2id password hashing and verification.
//!
//! Every hash uses a freshly generated salt from [`OsRng`]. The PHC string
//! embeds the salt and parameters; the salt is also returned on its own so
//! the account row can record it.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// Result of hashing a plaintext password.
#[derive(Debug, Clone)]
pub struct HashedPassword {
    /// PHC-formatted hash (algorithm, params, salt, hash).
    pub hash: String,
    /// The B64-encoded salt used for this hash.
    pub salt: String,
}

/// Hash a plaintext password using Argon2id with a random salt.
pub fn hash_password(password: &str) -> Result<HashedPassword, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default(); // Argon2id with default params
    let hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(HashedPassword {
        hash: hash.to_string(),
        salt: salt.as_str().to_string(),
    })
}

/// Verify a plaintext password against a stored PHC-formatted Argon2id hash.
///
/// Returns `Ok(true)` if the password matches, `Ok(false)` if it does not.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let password = "correct-horse-battery-staple";
        let hashed = hash_password(password).expect("hashing should succeed");

        assert!(
            hashed.hash.starts_with("$argon2id$"),
            "expected argon2id PHC prefix"
        );
        assert!(
            hashed.hash.contains(&hashed.salt),
            "PHC string should embed the returned salt"
        );
        assert!(!hashed.hash.contains(password));

        let verified = verify_password(password, &hashed.hash).expect("verify should succeed");
        assert!(verified, "correct password should verify as true");
    }

    #[test]
    fn test_wrong_password_fails() {
        let hashed = hash_password("real-password").expect("hashing should succeed");
        let verified =
            verify_password("wrong-password", &hashed.hash).expect("verify should succeed");
        assert!(!verified, "wrong password should verify as false");
    }

    #[test]
    fn test_each_hash_gets_a_fresh_salt() {
        let a = hash_password("same-password").unwrap();
        let b = hash_password("same-password").unwrap();
        assert_ne!(a.salt, b.salt);
        assert_ne!(a.hash, b.hash);
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        assert!(verify_password("whatever", "not-a-phc-string").is_err());
    }
}
