//! Typed access to the handoff slots shared between views.
//!
//! The catalog writes `selected_course`, a successful enrollment writes
//! `selected_course` and `enrolled_user`, and the confirmation view reads
//! both. Slots holding malformed JSON are treated as absent.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Serialize, de::DeserializeOwned};
use tracing::warn;

use super::navigation::back_to_catalog;
use super::ports::{HandoffStore, HandoffStoreError};
use super::{Course, EnrollmentConfirmation, Error, Identity, SessionId};

/// Named slot in the handoff store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandoffSlot {
    /// Snapshot of the authenticated identity.
    CurrentUser,
    /// Full snapshot of the course picked in the catalog.
    SelectedCourse,
    /// Display name of the last person enrolled from this browser.
    EnrolledUser,
    /// Sign-in the auth-state subscriptions of this browser are scoped to.
    AuthSession,
}

impl HandoffSlot {
    /// Every slot, in a stable order.
    pub const ALL: [HandoffSlot; 4] = [
        HandoffSlot::CurrentUser,
        HandoffSlot::SelectedCourse,
        HandoffSlot::EnrolledUser,
        HandoffSlot::AuthSession,
    ];

    /// Storage key for the slot.
    pub fn key(self) -> &'static str {
        match self {
            Self::CurrentUser => "current_user",
            Self::SelectedCourse => "selected_course",
            Self::EnrolledUser => "enrolled_user",
            Self::AuthSession => "auth_session",
        }
    }
}

/// Data shown on the confirmation page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WelcomeView {
    pub enrolled_user: String,
    pub course: Course,
}

/// Typed view over a [`HandoffStore`].
pub struct Handoff<'a, S: HandoffStore + ?Sized> {
    store: &'a S,
}

fn map_store_error(error: HandoffStoreError) -> Error {
    Error::internal(format!("handoff store failure: {error}"))
}

impl<'a, S: HandoffStore + ?Sized> Handoff<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    fn read<T: DeserializeOwned>(&self, slot: HandoffSlot) -> Result<Option<T>, Error> {
        let Some(raw) = self.store.get(slot).map_err(map_store_error)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(error) => {
                warn!(slot = slot.key(), %error, "discarding malformed handoff slot");
                Ok(None)
            }
        }
    }

    fn write<T: Serialize>(&self, slot: HandoffSlot, value: &T) -> Result<(), Error> {
        let raw = serde_json::to_string(value)
            .map_err(|error| Error::internal(format!("failed to encode handoff slot: {error}")))?;
        self.store.set(slot, raw).map_err(map_store_error)
    }

    pub fn current_user(&self) -> Result<Option<Identity>, Error> {
        self.read(HandoffSlot::CurrentUser)
    }

    pub fn set_current_user(&self, identity: &Identity) -> Result<(), Error> {
        self.write(HandoffSlot::CurrentUser, identity)
    }

    pub fn auth_session(&self) -> Result<Option<SessionId>, Error> {
        self.read(HandoffSlot::AuthSession)
    }

    /// Record a fresh sign-in. Slots written for whoever used this browser
    /// before are dropped first, so nothing carries over between people.
    pub fn begin_sign_in(&self, identity: &Identity, session: SessionId) -> Result<(), Error> {
        for slot in HandoffSlot::ALL {
            self.store.clear(slot);
        }
        self.set_current_user(identity)?;
        self.write(HandoffSlot::AuthSession, &session)
    }

    pub fn selected_course(&self) -> Result<Option<Course>, Error> {
        self.read(HandoffSlot::SelectedCourse)
    }

    pub fn set_selected_course(&self, course: &Course) -> Result<(), Error> {
        self.write(HandoffSlot::SelectedCourse, course)
    }

    pub fn enrolled_user(&self) -> Result<Option<String>, Error> {
        self.read(HandoffSlot::EnrolledUser)
    }

    /// Mirror a confirmation into the slots read by the welcome view.
    pub fn record_confirmation(&self, confirmation: &EnrollmentConfirmation) -> Result<(), Error> {
        self.set_selected_course(&confirmation.course)?;
        self.write(HandoffSlot::EnrolledUser, &confirmation.enrolled_user)
    }

    /// Build the confirmation view, or send the caller back to the catalog
    /// when either slot is missing.
    pub fn welcome(&self) -> Result<WelcomeView, Error> {
        match (self.enrolled_user()?, self.selected_course()?) {
            (Some(enrolled_user), Some(course)) => Ok(WelcomeView {
                enrolled_user,
                course,
            }),
            _ => Err(back_to_catalog("Enrollment information not found")),
        }
    }

    pub fn clear(&self, slot: HandoffSlot) {
        self.store.clear(slot);
    }

    /// Remove every slot.
    pub fn clear_all(&self) {
        self.store.clear_all();
    }
}

/// In-process [`HandoffStore`] used by domain tests and non-HTTP callers.
#[derive(Debug, Default)]
pub struct MemoryHandoffStore {
    slots: Mutex<HashMap<HandoffSlot, String>>,
}

impl MemoryHandoffStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<HandoffSlot, String>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl HandoffStore for MemoryHandoffStore {
    fn get(&self, slot: HandoffSlot) -> Result<Option<String>, HandoffStoreError> {
        Ok(self.lock().get(&slot).cloned())
    }

    fn set(&self, slot: HandoffSlot, value: String) -> Result<(), HandoffStoreError> {
        self.lock().insert(slot, value);
        Ok(())
    }

    fn clear(&self, slot: HandoffSlot) {
        self.lock().remove(&slot);
    }

    fn clear_all(&self) {
        self.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::navigation::{CATALOG_PATH, REDIRECT_DETAIL};
    use crate::domain::ports::MockHandoffStore;
    use crate::domain::{EmailAddress, ErrorCode, UserId, seed_courses};
    use rstest::{fixture, rstest};
    use uuid::Uuid;

    #[fixture]
    fn store() -> MemoryHandoffStore {
        MemoryHandoffStore::new()
    }

    #[fixture]
    fn advanced_react() -> Course {
        seed_courses().remove(1)
    }

    #[rstest]
    fn selected_course_round_trips_deep_equal(store: MemoryHandoffStore, advanced_react: Course) {
        let handoff = Handoff::new(&store);
        handoff
            .set_selected_course(&advanced_react)
            .expect("write slot");
        let restored = handoff.selected_course().expect("read slot");
        assert_eq!(restored, Some(advanced_react));
    }

    #[rstest]
    fn welcome_reads_confirmation(store: MemoryHandoffStore, advanced_react: Course) {
        let handoff = Handoff::new(&store);
        let confirmation = EnrollmentConfirmation {
            enrollment_id: Uuid::new_v4(),
            enrolled_user: "Jane Doe".to_owned(),
            course: advanced_react.clone(),
            replayed: false,
        };
        handoff
            .record_confirmation(&confirmation)
            .expect("record confirmation");

        let view = handoff.welcome().expect("welcome view");
        assert_eq!(view.enrolled_user, "Jane Doe");
        assert_eq!(view.course.title, "Advanced React Patterns");
    }

    #[rstest]
    fn welcome_without_slots_redirects_to_catalog(store: MemoryHandoffStore) {
        let error = Handoff::new(&store).welcome().expect_err("slots missing");
        assert_eq!(error.code(), ErrorCode::NotFound);
        assert_eq!(error.detail_str(REDIRECT_DETAIL), Some(CATALOG_PATH));
    }

    #[rstest]
    fn welcome_with_only_course_redirects(store: MemoryHandoffStore, advanced_react: Course) {
        let handoff = Handoff::new(&store);
        handoff
            .set_selected_course(&advanced_react)
            .expect("write slot");
        assert!(handoff.welcome().is_err());
    }

    #[rstest]
    fn malformed_slot_reads_as_absent(store: MemoryHandoffStore) {
        store
            .set(HandoffSlot::SelectedCourse, "{not json".to_owned())
            .expect("raw write");
        let course = Handoff::new(&store).selected_course().expect("read slot");
        assert!(course.is_none());
    }

    #[rstest]
    fn clear_all_empties_every_slot(store: MemoryHandoffStore, advanced_react: Course) {
        let handoff = Handoff::new(&store);
        handoff
            .set_selected_course(&advanced_react)
            .expect("write slot");
        store
            .set(HandoffSlot::EnrolledUser, "\"Jane\"".to_owned())
            .expect("raw write");
        handoff.clear_all();
        for slot in HandoffSlot::ALL {
            assert_eq!(store.get(slot).expect("read"), None);
        }
    }

    #[rstest]
    fn sign_in_drops_the_previous_person_slots(store: MemoryHandoffStore, advanced_react: Course) {
        let handoff = Handoff::new(&store);
        let confirmation = EnrollmentConfirmation {
            enrollment_id: Uuid::new_v4(),
            enrolled_user: "Jane Doe".to_owned(),
            course: advanced_react,
            replayed: false,
        };
        handoff
            .record_confirmation(&confirmation)
            .expect("record confirmation");

        let bob = Identity::new(
            UserId::new("9b2f1c1e-0c1a-4c4e-9a57-6a4f2d7e8b10").expect("fixture id"),
            EmailAddress::new("bob@example.com").expect("fixture email"),
        );
        let session = SessionId::random();
        handoff.begin_sign_in(&bob, session).expect("sign in");

        assert_eq!(handoff.enrolled_user().expect("read"), None);
        assert_eq!(handoff.selected_course().expect("read"), None);
        assert_eq!(handoff.current_user().expect("read"), Some(bob));
        assert_eq!(handoff.auth_session().expect("read"), Some(session));
        assert!(handoff.welcome().is_err());
    }

    #[rstest]
    fn store_failures_surface_as_internal_errors() {
        let mut store = MockHandoffStore::new();
        store
            .expect_get()
            .returning(|_| Err(HandoffStoreError::read("cookie unreadable")));
        let error = Handoff::new(&store)
            .selected_course()
            .expect_err("read failure");
        assert_eq!(error.code(), ErrorCode::InternalError);
    }
}
