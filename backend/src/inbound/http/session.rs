//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Provides a thin wrapper around Actix sessions so handlers only deal with
//! domain-friendly operations: the signed-in identity and the handoff slots
//! shared between views. Everything lives in the private session cookie.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::debug;

use crate::domain::navigation::login_required;
use crate::domain::ports::{HandoffStore, HandoffStoreError};
use crate::domain::{Error, Handoff, HandoffSlot, Identity, SessionId};

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Typed view over the handoff slots.
    pub fn handoff(&self) -> Handoff<'_, Self> {
        Handoff::new(self)
    }

    /// Persist a fresh sign-in, rotating the cookie session id.
    ///
    /// Handoff slots left by a previous sign-in in this browser are dropped.
    pub fn persist_identity(&self, identity: &Identity, session: SessionId) -> Result<(), Error> {
        self.0.renew();
        self.handoff().begin_sign_in(identity, session)
    }

    /// Fetch the signed-in identity, if any.
    pub fn identity(&self) -> Result<Option<Identity>, Error> {
        self.handoff().current_user()
    }

    /// Require a signed-in identity or return `401` with a login redirect.
    pub fn require_identity(&self) -> Result<Identity, Error> {
        self.identity()?.ok_or_else(login_required)
    }

    /// Require both the identity and the sign-in it belongs to.
    pub fn require_sign_in(&self) -> Result<(Identity, SessionId), Error> {
        let identity = self.require_identity()?;
        let session = self.handoff().auth_session()?.ok_or_else(login_required)?;
        Ok((identity, session))
    }
}

impl HandoffStore for SessionContext {
    fn get(&self, slot: HandoffSlot) -> Result<Option<String>, HandoffStoreError> {
        self.0
            .get::<String>(slot.key())
            .map_err(|error| HandoffStoreError::read(error.to_string()))
    }

    fn set(&self, slot: HandoffSlot, value: String) -> Result<(), HandoffStoreError> {
        self.0
            .insert(slot.key(), value)
            .map_err(|error| HandoffStoreError::write(error.to_string()))
    }

    fn clear(&self, slot: HandoffSlot) {
        self.0.remove(slot.key());
    }

    fn clear_all(&self) {
        debug!("purging session");
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
