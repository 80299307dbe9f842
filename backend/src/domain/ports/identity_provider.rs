//! Driven port for the account store behind registration and login.
//!
//! Adapters hash and verify passwords themselves; the domain only hands over
//! validated [`Credentials`] and receives an [`Identity`] back.

use async_trait::async_trait;

use crate::domain::{Credentials, Identity};

use super::define_port_error;

define_port_error! {
    /// Errors raised by identity provider adapters.
    pub enum IdentityProviderError {
        /// An account already exists for the email address.
        AlreadyExists { email: String } => "an account already exists for {email}",
        /// The password does not meet the provider's strength rule.
        WeakPassword { min: usize } => "password must be at least {min} characters",
        /// Email or password did not match a stored account.
        InvalidCredentials => "invalid email or password",
        /// The backing store could not be reached.
        Connection { message: String } => "identity store unavailable: {message}",
        /// The backing store rejected or failed the operation.
        Query { message: String } => "identity store error: {message}",
    }
}

/// Account registration and authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create an account and return its identity.
    async fn register(&self, credentials: &Credentials) -> Result<Identity, IdentityProviderError>;

    /// Verify credentials against a stored account.
    async fn login(&self, credentials: &Credentials) -> Result<Identity, IdentityProviderError>;

    /// End the provider-side session for `identity`, if the provider keeps one.
    async fn logout(&self, identity: &Identity) -> Result<(), IdentityProviderError>;
}
