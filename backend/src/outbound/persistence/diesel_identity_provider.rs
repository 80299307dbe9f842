//! PostgreSQL-backed [`IdentityProvider`] storing Argon2 password hashes.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{IdentityProvider, IdentityProviderError};
use crate::domain::{Credentials, Identity, PASSWORD_MIN_LEN, UserId};
use crate::outbound::password::{hash_password, verify_password};

use super::error_mapping::DbFailure;
use super::models::{NewUserRow, UserRow};
use super::pool::DbPool;
use super::schema::users;

/// Accounts in the `users` table, unique by normalised email.
#[derive(Clone)]
pub struct DieselIdentityProvider {
    pool: DbPool,
}

impl DieselIdentityProvider {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<(Identity, String)>, IdentityProviderError> {
        let mut conn = self.pool.get().await.map_err(|err| map_failure(err.into(), email))?;
        let row = users::table
            .filter(users::email.eq(email))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_failure(err.into(), email))?;
        row.map(UserRow::into_parts)
            .transpose()
            .map_err(IdentityProviderError::query)
    }
}

fn map_failure(failure: DbFailure, email: &str) -> IdentityProviderError {
    match failure {
        DbFailure::Connection(message) => IdentityProviderError::connection(message),
        DbFailure::UniqueViolation(_) => IdentityProviderError::already_exists(email),
        DbFailure::Query(message) => IdentityProviderError::query(message),
    }
}

#[async_trait]
impl IdentityProvider for DieselIdentityProvider {
    async fn register(&self, credentials: &Credentials) -> Result<Identity, IdentityProviderError> {
        if credentials.ensure_strong_password().is_err() {
            return Err(IdentityProviderError::weak_password(PASSWORD_MIN_LEN));
        }
        let email = credentials.email().as_ref();
        let password_hash = hash_password(credentials.password()).await?;
        let identity = Identity::new(UserId::random(), credentials.email().clone());

        let mut conn = self.pool.get().await.map_err(|err| map_failure(err.into(), email))?;
        // The unique index on email decides races between concurrent signups.
        diesel::insert_into(users::table)
            .values(&NewUserRow {
                id: *identity.user_id().as_uuid(),
                email,
                password_hash: &password_hash,
            })
            .execute(&mut conn)
            .await
            .map_err(|err| map_failure(err.into(), email))?;

        debug!(user_id = %identity.user_id(), "account stored");
        Ok(identity)
    }

    async fn login(&self, credentials: &Credentials) -> Result<Identity, IdentityProviderError> {
        let Some((identity, password_hash)) =
            self.find_by_email(credentials.email().as_ref()).await?
        else {
            return Err(IdentityProviderError::invalid_credentials());
        };
        if verify_password(credentials.password(), &password_hash).await? {
            Ok(identity)
        } else {
            Err(IdentityProviderError::invalid_credentials())
        }
    }

    async fn logout(&self, _identity: &Identity) -> Result<(), IdentityProviderError> {
        // Sessions live in the client cookie; nothing is stored server-side.
        Ok(())
    }
}
