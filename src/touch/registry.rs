use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::debug;

use super::{Contact, PointerSample, Position, TouchPhase, TouchPoint};

/// Concurrently mutable map from contact id to contact state.
///
/// The lock is private to the registry and only held for the duration of a
/// single operation, so producers and readers never wait on each other for
/// longer than one map access. Contacts are replaced whole, so a reader
/// never sees a position from one update paired with a phase from another.
#[derive(Debug, Default)]
pub struct TouchRegistry {
    contacts: RwLock<HashMap<i32, Contact>>,
}

impl TouchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites the contact for `id`.
    pub fn upsert(&self, id: i32, position: Position, phase: TouchPhase) {
        self.contacts.write().insert(id, Contact { position, phase });
    }

    /// Moves the contacts named in `samples`, skipping ids that are not live.
    ///
    /// Returns how many contacts were updated.
    pub fn apply_moves(&self, samples: &[PointerSample]) -> usize {
        let mut contacts = self.contacts.write();
        let mut updated = 0;
        for sample in samples {
            match contacts.get_mut(&sample.id) {
                Some(contact) => {
                    *contact = Contact {
                        position: sample.position,
                        phase: TouchPhase::Moved,
                    };
                    updated += 1;
                }
                None => debug!("Ignoring move for inactive pointer {}", sample.id),
            }
        }
        updated
    }

    /// Deletes the contact for `id`; returns whether one was present.
    pub fn remove(&self, id: i32) -> bool {
        self.contacts.write().remove(&id).is_some()
    }

    /// Drops every contact in one step.
    pub fn clear(&self) {
        self.contacts.write().clear();
    }

    pub fn get(&self, id: i32) -> Option<Contact> {
        self.contacts.read().get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.contacts.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.read().is_empty()
    }

    /// Copies out all live contacts. Order carries no meaning.
    pub fn snapshot(&self) -> Vec<TouchPoint> {
        self.contacts
            .read()
            .iter()
            .map(|(&id, contact)| TouchPoint {
                id,
                position: contact.position,
                phase: contact.phase,
            })
            .collect()
    }
}
