// ============================================================
// UPLOAD SLOTS
// ============================================================
// Per-type validation status of the files picked in the upload
// form. A newer pick on the same slot supersedes older reads.

use std::collections::BTreeMap;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::csv::{TypeKey, ValidationStatus};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotState {
    pub status: ValidationStatus,
    pub file_name: Option<String>,

    /// Bumped on every pick and clear
    pub generation: u64,
}

/// Handle for one in-flight file read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotTicket {
    pub slot: TypeKey,
    pub generation: u64,
}

#[derive(Debug, Default)]
pub struct UploadSlots {
    slots: Mutex<BTreeMap<TypeKey, SlotState>>,
}

impl UploadSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new file pick. The slot goes back to `Unknown` until the
    /// returned ticket completes.
    pub fn begin(&self, slot: &TypeKey, file_name: Option<String>) -> SlotTicket {
        let mut slots = self.lock();
        let state = slots.entry(slot.clone()).or_default();
        state.generation += 1;
        state.status = ValidationStatus::Unknown;
        state.file_name = file_name;

        SlotTicket {
            slot: slot.clone(),
            generation: state.generation,
        }
    }

    /// Apply a finished check. Returns `false` and changes nothing when a
    /// later pick or clear has superseded the ticket.
    pub fn complete(&self, ticket: &SlotTicket, status: ValidationStatus) -> bool {
        let mut slots = self.lock();
        match slots.get_mut(&ticket.slot) {
            Some(state) if state.generation == ticket.generation => {
                state.status = status;
                true
            }
            _ => {
                debug!(
                    slot = %ticket.slot,
                    generation = ticket.generation,
                    "Discarding stale upload check"
                );
                false
            }
        }
    }

    /// Forget the file in a slot
    pub fn clear(&self, slot: &TypeKey) -> SlotState {
        let mut slots = self.lock();
        let state = slots.entry(slot.clone()).or_default();
        state.generation += 1;
        state.status = ValidationStatus::Unknown;
        state.file_name = None;
        state.clone()
    }

    /// Untouched slots report the default `Unknown` state
    pub fn get(&self, slot: &TypeKey) -> SlotState {
        self.lock().get(slot).cloned().unwrap_or_default()
    }

    /// All touched slots, ordered by key
    pub fn snapshot(&self) -> Vec<(TypeKey, SlotState)> {
        self.lock()
            .iter()
            .map(|(key, state)| (key.clone(), state.clone()))
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<TypeKey, SlotState>> {
        // Slot state stays consistent even if a holder panicked.
        self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untouched_slot_is_unknown() {
        let slots = UploadSlots::new();
        assert_eq!(slots.get(&TypeKey::from("yard")), SlotState::default());
        assert!(slots.snapshot().is_empty());
    }

    #[test]
    fn test_complete_applies_current_ticket() {
        let slots = UploadSlots::new();
        let yard = TypeKey::from("yard");

        let ticket = slots.begin(&yard, Some("yard.csv".to_string()));
        assert_eq!(slots.get(&yard).status, ValidationStatus::Unknown);

        assert!(slots.complete(&ticket, ValidationStatus::Valid));
        let state = slots.get(&yard);
        assert_eq!(state.status, ValidationStatus::Valid);
        assert_eq!(state.file_name.as_deref(), Some("yard.csv"));
    }

    #[test]
    fn test_newer_pick_supersedes_older_read() {
        let slots = UploadSlots::new();
        let yard = TypeKey::from("yard");

        let first = slots.begin(&yard, Some("old.csv".to_string()));
        let second = slots.begin(&yard, Some("new.csv".to_string()));

        assert!(slots.complete(&second, ValidationStatus::Invalid));
        assert!(!slots.complete(&first, ValidationStatus::Valid));

        let state = slots.get(&yard);
        assert_eq!(state.status, ValidationStatus::Invalid);
        assert_eq!(state.file_name.as_deref(), Some("new.csv"));
    }

    #[test]
    fn test_clear_discards_in_flight_read() {
        let slots = UploadSlots::new();
        let shipment = TypeKey::from("shipment");

        let ticket = slots.begin(&shipment, None);
        let cleared = slots.clear(&shipment);
        assert_eq!(cleared.status, ValidationStatus::Unknown);
        assert!(!slots.complete(&ticket, ValidationStatus::Valid));
        assert_eq!(slots.get(&shipment).status, ValidationStatus::Unknown);
    }

    #[test]
    fn test_slots_are_independent_and_ordered() {
        let slots = UploadSlots::new();
        let yard = slots.begin(&TypeKey::from("yard"), None);
        let shipment = slots.begin(&TypeKey::from("shipment"), None);

        assert!(slots.complete(&yard, ValidationStatus::Valid));
        assert!(slots.complete(&shipment, ValidationStatus::Invalid));

        let keys: Vec<String> = slots.snapshot().into_iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(keys, vec!["shipment", "yard"]);
    }
}
