//! In-process account store used when no database is configured.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{IdentityProvider, IdentityProviderError};
use crate::domain::{Credentials, Identity, PASSWORD_MIN_LEN, UserId};
use crate::outbound::password::{hash_password, verify_password};

struct Account {
    identity: Identity,
    password_hash: String,
}

/// Accounts keyed by normalised email.
#[derive(Default)]
pub struct MemoryIdentityProvider {
    accounts: RwLock<HashMap<String, Account>>,
}

impl MemoryIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    fn lookup(&self, email: &str) -> Option<(Identity, String)> {
        self.accounts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(email)
            .map(|account| (account.identity.clone(), account.password_hash.clone()))
    }
}

#[async_trait]
impl IdentityProvider for MemoryIdentityProvider {
    async fn register(&self, credentials: &Credentials) -> Result<Identity, IdentityProviderError> {
        if credentials.ensure_strong_password().is_err() {
            return Err(IdentityProviderError::weak_password(PASSWORD_MIN_LEN));
        }
        let email = credentials.email().as_ref();
        if self.lookup(email).is_some() {
            return Err(IdentityProviderError::already_exists(email));
        }
        let password_hash = hash_password(credentials.password()).await?;
        let identity = Identity::new(UserId::random(), credentials.email().clone());

        let mut accounts = self.accounts.write().unwrap_or_else(PoisonError::into_inner);
        // Re-check under the write lock; hashing ran without it.
        if accounts.contains_key(email) {
            return Err(IdentityProviderError::already_exists(email));
        }
        accounts.insert(
            email.to_owned(),
            Account {
                identity: identity.clone(),
                password_hash,
            },
        );
        debug!(user_id = %identity.user_id(), "account stored in memory");
        Ok(identity)
    }

    async fn login(&self, credentials: &Credentials) -> Result<Identity, IdentityProviderError> {
        let Some((identity, password_hash)) = self.lookup(credentials.email().as_ref()) else {
            return Err(IdentityProviderError::invalid_credentials());
        };
        if verify_password(credentials.password(), &password_hash).await? {
            Ok(identity)
        } else {
            Err(IdentityProviderError::invalid_credentials())
        }
    }

    async fn logout(&self, _identity: &Identity) -> Result<(), IdentityProviderError> {
        Ok(())
    }
}
