//! In-place patching of id-keyed entity lists.
//!
//! Lists keep server order for fetched entries and put created entries at
//! the front. Ids stay unique: inserting an id already present replaces the
//! old entry.

use cadence_api::{EntityId, Playlist, Task, TaskList, Track};

/// Entities identified by a backend id.
pub trait Keyed {
    /// The entity's id.
    fn key(&self) -> EntityId;
}

macro_rules! keyed {
    ($($entity:ty),+) => {
        $(impl Keyed for $entity {
            fn key(&self) -> EntityId {
                self.id
            }
        })+
    };
}

keyed!(Track, Playlist, Task, TaskList);

/// Insert `item` at the front, dropping any older entry with its id.
pub fn prepend<T: Keyed>(items: &mut Vec<T>, item: T) {
    let id = item.key();
    items.retain(|existing| existing.key() != id);
    items.insert(0, item);
}

/// Replace the entry with `item`'s id. Returns whether one was found.
pub fn replace<T: Keyed>(items: &mut [T], item: T) -> bool {
    match items.iter_mut().find(|existing| existing.key() == item.key()) {
        Some(slot) => {
            *slot = item;
            true
        },
        None => false,
    }
}

/// Remove the entry with `id`. Returns whether one was found.
pub fn remove<T: Keyed>(items: &mut Vec<T>, id: EntityId) -> bool {
    let before = items.len();
    items.retain(|existing| existing.key() != id);
    items.len() != before
}

/// The entry with `id`.
pub fn find<T: Keyed>(items: &[T], id: EntityId) -> Option<&T> {
    items.iter().find(|item| item.key() == id)
}

/// Replace `current` if it holds the entry with `item`'s id.
pub fn replace_current<T: Keyed + Clone>(current: &mut Option<T>, item: &T) {
    if current.as_ref().is_some_and(|held| held.key() == item.key()) {
        *current = Some(item.clone());
    }
}

/// Clear `current` if it holds the entry with `id`.
pub fn forget_current<T: Keyed>(current: &mut Option<T>, id: EntityId) {
    if current.as_ref().is_some_and(|held| held.key() == id) {
        *current = None;
    }
}
