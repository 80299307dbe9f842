//! Argon2 password hashing shared by the identity provider adapters.
//!
//! Hashing runs on the blocking pool so a burst of logins cannot stall the
//! async workers. Hashes are PHC strings carrying their own salt and
//! parameters.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use zeroize::Zeroizing;

use crate::domain::ports::IdentityProviderError;

fn join_error(error: tokio::task::JoinError) -> IdentityProviderError {
    IdentityProviderError::query(format!("password task failed: {error}"))
}

/// Hash `password` into a PHC string.
pub async fn hash_password(password: &str) -> Result<String, IdentityProviderError> {
    let password = Zeroizing::new(password.to_owned());
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|error| IdentityProviderError::query(format!("hashing failed: {error}")))
    })
    .await
    .map_err(join_error)?
}

/// Check `password` against a stored PHC hash.
///
/// A malformed stored hash counts as a mismatch rather than an error so a
/// corrupt row cannot be told apart from a wrong password.
pub async fn verify_password(password: &str, phc: &str) -> Result<bool, IdentityProviderError> {
    let password = Zeroizing::new(password.to_owned());
    let phc = phc.to_owned();
    tokio::task::spawn_blocking(move || {
        let Ok(parsed) = PasswordHash::new(&phc) else {
            tracing::warn!("stored password hash is malformed");
            return false;
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    })
    .await
    .map_err(join_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hash_verifies_only_the_original_password() {
        let hash = hash_password("secret1").await.expect("hash");
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("secret1", &hash).await.expect("verify"));
        assert!(!verify_password("secret2", &hash).await.expect("verify"));
    }

    #[tokio::test]
    async fn malformed_hash_is_a_mismatch() {
        assert!(!verify_password("secret1", "not-a-phc").await.expect("verify"));
    }
}
