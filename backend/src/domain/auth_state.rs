//! Push-based auth-state notifications.
//!
//! Subscribers register for one browser session of one user and are called
//! with `Some(identity)` on login or registration and `None` on logout.
//! Transitions never cross sessions: signing out in one browser leaves the
//! same user's other sessions untouched. Callbacks for a single publish run
//! in subscription order, outside the registry lock. Dropping the returned
//! [`Subscription`] unsubscribes.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use super::{Identity, UserId};

/// Identifier minted for each sign-in and kept in the session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

type Callback = Arc<dyn Fn(Option<Identity>) + Send + Sync>;

struct Subscriber {
    user: UserId,
    session: SessionId,
    callback: Callback,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    subscribers: BTreeMap<u64, Subscriber>,
}

fn lock(registry: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Fan-out of auth-state transitions to per-session subscribers.
///
/// # Examples
/// ```
/// use std::sync::{Arc, Mutex};
///
/// use learnhub::domain::{AuthStateNotifier, SessionId, UserId};
///
/// let notifier = AuthStateNotifier::new();
/// let user = UserId::random();
/// let session = SessionId::random();
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink = Arc::clone(&seen);
/// let subscription = notifier.subscribe(user.clone(), session, move |state| {
///     sink.lock().expect("sink").push(state.is_some());
/// });
/// notifier.publish(&user, session, None);
/// drop(subscription);
/// notifier.publish(&user, session, None);
/// assert_eq!(*seen.lock().expect("sink"), vec![false]);
/// ```
#[derive(Clone, Default)]
pub struct AuthStateNotifier {
    registry: Arc<Mutex<Registry>>,
}

impl AuthStateNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `on_change` for transitions of `user` in `session`.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe<F>(&self, user: UserId, session: SessionId, on_change: F) -> Subscription
    where
        F: Fn(Option<Identity>) + Send + Sync + 'static,
    {
        let mut registry = lock(&self.registry);
        let id = registry.next_id;
        registry.next_id += 1;
        registry.subscribers.insert(
            id,
            Subscriber {
                user,
                session,
                callback: Arc::new(on_change),
            },
        );
        debug!(subscription = id, "auth-state subscriber registered");
        Subscription {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Deliver `state` to every subscriber of `user` in `session`.
    pub fn publish(&self, user: &UserId, session: SessionId, state: Option<Identity>) {
        let callbacks: Vec<Callback> = lock(&self.registry)
            .subscribers
            .values()
            .filter(|subscriber| subscriber.session == session && &subscriber.user == user)
            .map(|subscriber| Arc::clone(&subscriber.callback))
            .collect();
        debug!(
            user_id = %user,
            %session,
            subscribers = callbacks.len(),
            signed_in = state.is_some(),
            "publishing auth-state change"
        );
        for callback in callbacks {
            callback(state.clone());
        }
    }

    /// Number of live subscriptions across all users.
    pub fn subscriber_count(&self) -> usize {
        lock(&self.registry).subscribers.len()
    }
}

/// Guard returned by [`AuthStateNotifier::subscribe`].
pub struct Subscription {
    id: u64,
    registry: Weak<Mutex<Registry>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            lock(&registry).subscribers.remove(&self.id);
            debug!(subscription = self.id, "auth-state subscriber released");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EmailAddress;
    use rstest::{fixture, rstest};

    type Log = Arc<Mutex<Vec<Option<String>>>>;

    #[fixture]
    fn identity() -> Identity {
        Identity::new(
            UserId::random(),
            EmailAddress::new("jane@example.com").expect("valid email"),
        )
    }

    fn recorder(log: &Log) -> impl Fn(Option<Identity>) + Send + Sync + 'static {
        let log = Arc::clone(log);
        move |state: Option<Identity>| {
            log.lock()
                .expect("log lock")
                .push(state.map(|identity| identity.email().to_string()));
        }
    }

    #[rstest]
    fn delivers_transitions_in_emission_order(identity: Identity) {
        let notifier = AuthStateNotifier::new();
        let session = SessionId::random();
        let log: Log = Arc::default();
        let _subscription =
            notifier.subscribe(identity.user_id().clone(), session, recorder(&log));

        notifier.publish(identity.user_id(), session, Some(identity.clone()));
        notifier.publish(identity.user_id(), session, None);

        assert_eq!(
            *log.lock().expect("log lock"),
            vec![Some("jane@example.com".to_owned()), None]
        );
    }

    #[rstest]
    fn ignores_other_users(identity: Identity) {
        let notifier = AuthStateNotifier::new();
        let session = SessionId::random();
        let log: Log = Arc::default();
        let _subscription =
            notifier.subscribe(identity.user_id().clone(), session, recorder(&log));

        notifier.publish(&UserId::random(), session, None);

        assert!(log.lock().expect("log lock").is_empty());
    }

    #[rstest]
    fn sign_out_stays_within_its_session(identity: Identity) {
        let notifier = AuthStateNotifier::new();
        let laptop = SessionId::random();
        let phone = SessionId::random();
        let laptop_log: Log = Arc::default();
        let phone_log: Log = Arc::default();
        let _laptop =
            notifier.subscribe(identity.user_id().clone(), laptop, recorder(&laptop_log));
        let _phone = notifier.subscribe(identity.user_id().clone(), phone, recorder(&phone_log));

        notifier.publish(identity.user_id(), laptop, None);

        assert_eq!(*laptop_log.lock().expect("log lock"), vec![None]);
        assert!(phone_log.lock().expect("log lock").is_empty());
    }

    #[rstest]
    fn dropping_subscription_stops_delivery(identity: Identity) {
        let notifier = AuthStateNotifier::new();
        let session = SessionId::random();
        let log: Log = Arc::default();
        let subscription =
            notifier.subscribe(identity.user_id().clone(), session, recorder(&log));
        assert_eq!(notifier.subscriber_count(), 1);

        drop(subscription);
        notifier.publish(identity.user_id(), session, None);

        assert_eq!(notifier.subscriber_count(), 0);
        assert!(log.lock().expect("log lock").is_empty());
    }

    #[rstest]
    fn subscription_outliving_notifier_drops_cleanly(identity: Identity) {
        let notifier = AuthStateNotifier::new();
        let subscription =
            notifier.subscribe(identity.user_id().clone(), SessionId::random(), |_| {});
        drop(notifier);
        drop(subscription);
    }
}
