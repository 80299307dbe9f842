//! Port for the browser-held key-value store that carries state between
//! views.
//!
//! Values are serialised JSON strings. Implementations must survive page
//! reloads and lose their contents only when cleared.

use crate::domain::HandoffSlot;

use super::define_port_error;

define_port_error! {
    /// Errors raised by handoff store adapters.
    pub enum HandoffStoreError {
        Read { message: String } => "failed to read handoff slot: {message}",
        Write { message: String } => "failed to write handoff slot: {message}",
    }
}

/// Named-slot storage. Calls are synchronous and local to one browser.
#[cfg_attr(test, mockall::automock)]
pub trait HandoffStore {
    fn get(&self, slot: HandoffSlot) -> Result<Option<String>, HandoffStoreError>;
    fn set(&self, slot: HandoffSlot, value: String) -> Result<(), HandoffStoreError>;
    fn clear(&self, slot: HandoffSlot);
    /// Drop every slot at once.
    fn clear_all(&self);
}
