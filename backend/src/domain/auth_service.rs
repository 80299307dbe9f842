//! Registration, login, and logout use-cases.
//!
//! Wraps an [`IdentityProvider`] and publishes every auth-state transition
//! through the shared [`AuthStateNotifier`].

use std::sync::Arc;

use tracing::{info, warn};

use super::ports::{IdentityProvider, IdentityProviderError};
use super::{AuthStateNotifier, Credentials, Error, Identity, SessionId, Subscription, UserId};

/// Auth use-cases shared by HTTP and WebSocket adapters.
#[derive(Clone)]
pub struct AuthService {
    provider: Arc<dyn IdentityProvider>,
    notifier: AuthStateNotifier,
}

impl AuthService {
    pub fn new(provider: Arc<dyn IdentityProvider>, notifier: AuthStateNotifier) -> Self {
        Self { provider, notifier }
    }

    fn map_provider_error(error: IdentityProviderError) -> Error {
        match error {
            IdentityProviderError::AlreadyExists { .. } => {
                Error::conflict("An account with this email already exists")
                    .with_detail("field", "email")
            }
            IdentityProviderError::WeakPassword { min } => Error::invalid_request(format!(
                "Password must be at least {min} characters"
            ))
            .with_detail("field", "password"),
            IdentityProviderError::InvalidCredentials => {
                Error::unauthorized("Invalid email or password")
            }
            IdentityProviderError::Connection { message } => {
                Error::service_unavailable(format!("identity provider unavailable: {message}"))
                    .with_detail("retryable", true)
            }
            IdentityProviderError::Query { message } => {
                Error::internal(format!("identity provider error: {message}"))
            }
        }
    }

    /// Create an account, then announce the signed-in identity to `session`.
    pub async fn register(
        &self,
        credentials: &Credentials,
        session: SessionId,
    ) -> Result<Identity, Error> {
        if let Err(error) = credentials.ensure_strong_password() {
            return Err(Error::invalid_request(error.to_string()).with_detail("field", "password"));
        }
        let identity = self
            .provider
            .register(credentials)
            .await
            .map_err(Self::map_provider_error)?;
        info!(user_id = %identity.user_id(), %session, "account registered");
        self.notifier
            .publish(identity.user_id(), session, Some(identity.clone()));
        Ok(identity)
    }

    /// Verify credentials, then announce the signed-in identity to `session`.
    pub async fn login(
        &self,
        credentials: &Credentials,
        session: SessionId,
    ) -> Result<Identity, Error> {
        let identity = self
            .provider
            .login(credentials)
            .await
            .map_err(Self::map_provider_error)?;
        info!(user_id = %identity.user_id(), %session, "user logged in");
        self.notifier
            .publish(identity.user_id(), session, Some(identity.clone()));
        Ok(identity)
    }

    /// End `session` for `identity` and announce the sign-out to it.
    ///
    /// Provider failures are logged; the session's subscribers are notified
    /// regardless. Other sessions of the same user stay signed in.
    pub async fn logout(&self, identity: &Identity, session: SessionId) {
        if let Err(error) = self.provider.logout(identity).await {
            warn!(user_id = %identity.user_id(), %error, "identity provider logout failed");
        }
        info!(user_id = %identity.user_id(), %session, "user logged out");
        self.notifier.publish(identity.user_id(), session, None);
    }

    /// Observe auth-state transitions for `user` in `session`.
    pub fn subscribe<F>(&self, user: UserId, session: SessionId, on_change: F) -> Subscription
    where
        F: Fn(Option<Identity>) + Send + Sync + 'static,
    {
        self.notifier.subscribe(user, session, on_change)
    }

    pub fn notifier(&self) -> &AuthStateNotifier {
        &self.notifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockIdentityProvider;
    use crate::domain::{EmailAddress, ErrorCode};
    use rstest::{fixture, rstest};
    use std::sync::Mutex;

    #[fixture]
    fn identity() -> Identity {
        Identity::new(
            UserId::random(),
            EmailAddress::new("jane@example.com").expect("valid email"),
        )
    }

    fn credentials(password: &str) -> Credentials {
        Credentials::try_from_parts("jane@example.com", password).expect("credential shape")
    }

    fn service(provider: MockIdentityProvider) -> AuthService {
        AuthService::new(Arc::new(provider), AuthStateNotifier::new())
    }

    #[rstest]
    #[tokio::test]
    async fn register_publishes_signed_in_identity(identity: Identity) {
        let mut provider = MockIdentityProvider::new();
        let returned = identity.clone();
        provider
            .expect_register()
            .times(1)
            .returning(move |_| Ok(returned.clone()));
        let service = service(provider);
        let session = SessionId::random();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _subscription = service.subscribe(identity.user_id().clone(), session, move |state| {
            sink.lock().expect("sink").push(state);
        });

        let registered = service
            .register(&credentials("secret1"), session)
            .await
            .expect("registration succeeds");

        assert_eq!(registered, identity);
        assert_eq!(*seen.lock().expect("sink"), vec![Some(identity)]);
    }

    #[rstest]
    #[tokio::test]
    async fn weak_password_is_rejected_before_provider_call() {
        let mut provider = MockIdentityProvider::new();
        provider.expect_register().never();

        let error = service(provider)
            .register(&credentials("12345"), SessionId::random())
            .await
            .expect_err("weak password");

        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        assert_eq!(error.detail_str("field"), Some("password"));
    }

    #[rstest]
    #[case(IdentityProviderError::already_exists("jane@example.com"), ErrorCode::Conflict)]
    #[case(IdentityProviderError::invalid_credentials(), ErrorCode::Unauthorized)]
    #[case(IdentityProviderError::connection("timeout"), ErrorCode::ServiceUnavailable)]
    #[case(IdentityProviderError::query("syntax"), ErrorCode::InternalError)]
    #[tokio::test]
    async fn provider_errors_map_to_domain_codes(
        #[case] failure: IdentityProviderError,
        #[case] expected: ErrorCode,
    ) {
        let mut provider = MockIdentityProvider::new();
        provider
            .expect_login()
            .returning(move |_| Err(failure.clone()));

        let error = service(provider)
            .login(&credentials("secret1"), SessionId::random())
            .await
            .expect_err("login fails");

        assert_eq!(error.code(), expected);
    }

    #[rstest]
    #[tokio::test]
    async fn logout_notifies_even_when_provider_fails(identity: Identity) {
        let mut provider = MockIdentityProvider::new();
        provider
            .expect_logout()
            .returning(|_| Err(IdentityProviderError::connection("offline")));
        let service = service(provider);
        let session = SessionId::random();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _subscription = service.subscribe(identity.user_id().clone(), session, move |state| {
            sink.lock().expect("sink").push(state.is_some());
        });

        service.logout(&identity, session).await;

        assert_eq!(*seen.lock().expect("sink"), vec![false]);
    }

    #[rstest]
    #[tokio::test]
    async fn logout_leaves_other_sessions_signed_in(identity: Identity) {
        let mut provider = MockIdentityProvider::new();
        provider.expect_logout().times(1).returning(|_| Ok(()));
        let service = service(provider);
        let (signing_out, staying) = (SessionId::random(), SessionId::random());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _subscription = service.subscribe(identity.user_id().clone(), staying, move |state| {
            sink.lock().expect("sink").push(state.is_some());
        });

        service.logout(&identity, signing_out).await;

        assert!(seen.lock().expect("sink").is_empty());
    }
}
