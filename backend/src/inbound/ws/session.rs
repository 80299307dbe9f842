//! Per-connection auth-state push.
//!
//! The connection subscribes to the auth transitions of the sign-in that
//! opened it and forwards each one as an [`AuthStateMessage`]. A sign-out is sent and then
//! the socket closes. Pings go out every 5s; a client silent for 10s is
//! dropped. Tests shorten both intervals.

use std::time::{Duration, Instant};

use actix_ws::{CloseCode, CloseReason, Closed, Message, MessageStream, ProtocolError, Session};
use tokio::sync::mpsc;
use tokio::time;
use tracing::{debug, warn};

use crate::domain::{AuthService, Identity, SessionId};
use crate::inbound::ws::messages::AuthStateMessage;

#[cfg(not(test))]
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);
#[cfg(test)]
const HEARTBEAT_INTERVAL: Duration = Duration::from_millis(50);

#[cfg(not(test))]
const CLIENT_TIMEOUT: Duration = Duration::from_secs(10);
#[cfg(test)]
const CLIENT_TIMEOUT: Duration = Duration::from_millis(100);

pub(super) async fn handle_auth_session(
    auth: AuthService,
    identity: Identity,
    sign_in: SessionId,
    session: Session,
    stream: MessageStream,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    // Held for the lifetime of the connection; dropping it unsubscribes.
    let _subscription = auth.subscribe(identity.user_id().clone(), sign_in, move |state| {
        if tx.send(state).is_err() {
            debug!("auth-state receiver gone");
        }
    });
    AuthPush::new(rx).run(identity, session, stream).await;
}

enum SessionError {
    ClientClosed(Option<CloseReason>),
    StreamClosed,
    HeartbeatTimeout,
    SignedOut,
    Protocol(ProtocolError),
    Network(Closed),
}

struct AuthPush {
    updates: mpsc::UnboundedReceiver<Option<Identity>>,
}

impl AuthPush {
    fn new(updates: mpsc::UnboundedReceiver<Option<Identity>>) -> Self {
        Self { updates }
    }

    async fn run(mut self, identity: Identity, mut session: Session, mut stream: MessageStream) {
        if let Err(error) = send_state(&mut session, Some(&identity)).await {
            warn!(error = %error, "initial auth-state push failed");
            return;
        }

        let mut last_heartbeat = Instant::now();
        let mut heartbeat = time::interval(HEARTBEAT_INTERVAL);

        let error = loop {
            let result = tokio::select! {
                _ = heartbeat.tick() => {
                    handle_heartbeat_tick(&mut session, last_heartbeat).await
                }
                update = self.updates.recv() => {
                    handle_update(&mut session, update).await
                }
                message = stream.recv() => {
                    handle_stream_message(&mut session, &mut last_heartbeat, message).await
                }
            };
            if let Err(error) = result {
                break error;
            }
        };

        log_shutdown_reason(&error);
        if let Some(reason) = close_reason_for(error) {
            if let Err(error) = session.close(reason).await {
                warn!(error = %error, "failed to close auth-state socket");
            }
        }
    }
}

async fn send_state(session: &mut Session, identity: Option<&Identity>) -> Result<(), Closed> {
    match serde_json::to_string(&AuthStateMessage::from(identity)) {
        Ok(body) => session.text(body).await,
        Err(error) => {
            warn!(error = %error, "failed to serialise auth-state payload");
            Ok(())
        }
    }
}

async fn handle_heartbeat_tick(
    session: &mut Session,
    last_heartbeat: Instant,
) -> Result<(), SessionError> {
    if last_heartbeat.elapsed() > CLIENT_TIMEOUT {
        return Err(SessionError::HeartbeatTimeout);
    }
    session.ping(b"").await.map_err(SessionError::Network)
}

async fn handle_update(
    session: &mut Session,
    update: Option<Option<Identity>>,
) -> Result<(), SessionError> {
    // The sender lives in the subscription, which outlives this loop.
    let Some(state) = update else {
        return Err(SessionError::StreamClosed);
    };
    send_state(session, state.as_ref())
        .await
        .map_err(SessionError::Network)?;
    if state.is_none() {
        return Err(SessionError::SignedOut);
    }
    Ok(())
}

async fn handle_stream_message(
    session: &mut Session,
    last_heartbeat: &mut Instant,
    message: Option<Result<Message, ProtocolError>>,
) -> Result<(), SessionError> {
    match message {
        None => Err(SessionError::StreamClosed),
        Some(Err(error)) => Err(SessionError::Protocol(error)),
        Some(Ok(Message::Ping(payload))) => {
            *last_heartbeat = Instant::now();
            session.pong(&payload).await.map_err(SessionError::Network)
        }
        Some(Ok(Message::Close(reason))) => Err(SessionError::ClientClosed(reason)),
        // The channel is push-only; client frames just prove liveness.
        Some(Ok(_)) => {
            *last_heartbeat = Instant::now();
            Ok(())
        }
    }
}

fn log_shutdown_reason(error: &SessionError) {
    match error {
        SessionError::HeartbeatTimeout => warn!("auth-state heartbeat timeout; closing"),
        SessionError::Protocol(error) => warn!(error = %error, "auth-state protocol error"),
        SessionError::Network(error) => warn!(error = %error, "auth-state send failed"),
        SessionError::SignedOut => debug!("user signed out; closing auth-state socket"),
        SessionError::ClientClosed(_) | SessionError::StreamClosed => {}
    }
}

fn close_reason_for(error: SessionError) -> Option<Option<CloseReason>> {
    let reason = |code, description: &str| {
        Some(Some(CloseReason {
            code,
            description: Some(description.to_owned()),
        }))
    };
    match error {
        SessionError::HeartbeatTimeout => reason(CloseCode::Normal, "heartbeat timeout"),
        SessionError::SignedOut => reason(CloseCode::Normal, "signed out"),
        SessionError::Protocol(_) => reason(CloseCode::Protocol, "protocol error"),
        SessionError::ClientClosed(reason) => Some(reason),
        SessionError::StreamClosed | SessionError::Network(_) => None,
    }
}
