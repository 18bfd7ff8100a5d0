//! Generation-checked handle table.

use remoting_abi::{Error, Handle, Result};

struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Maps issued [`Handle`]s to live values.
///
/// Freed slots are reused with a bumped generation, so a handle kept past
/// [`HandleTable::remove`] never resolves to the slot's next occupant.
pub(crate) struct HandleTable<T> {
    slots: Vec<Slot<T>>,
}

impl<T> HandleTable<T> {
    pub(crate) fn new() -> Self {
        Self { slots: Vec::new() }
    }

    pub(crate) fn insert(&mut self, value: T) -> Handle {
        if let Some((index, slot)) = self
            .slots
            .iter_mut()
            .enumerate()
            .find(|(_, slot)| slot.value.is_none())
        {
            slot.generation = slot.generation.wrapping_add(1);
            slot.value = Some(value);
            return Handle::new(index as u32, slot.generation);
        }
        self.slots.push(Slot {
            generation: 1,
            value: Some(value),
        });
        Handle::new((self.slots.len() - 1) as u32, 1)
    }

    pub(crate) fn get(&self, handle: Handle) -> Result<&T> {
        self.slots
            .get(handle.slot() as usize)
            .filter(|slot| slot.generation == handle.generation())
            .and_then(|slot| slot.value.as_ref())
            .ok_or(Error::InvalidHandle)
    }

    pub(crate) fn get_mut(&mut self, handle: Handle) -> Result<&mut T> {
        self.slots
            .get_mut(handle.slot() as usize)
            .filter(|slot| slot.generation == handle.generation())
            .and_then(|slot| slot.value.as_mut())
            .ok_or(Error::InvalidHandle)
    }

    pub(crate) fn remove(&mut self, handle: Handle) -> Result<T> {
        self.slots
            .get_mut(handle.slot() as usize)
            .filter(|slot| slot.generation == handle.generation())
            .and_then(|slot| slot.value.take())
            .ok_or(Error::InvalidHandle)
    }

    /// True for a handle this table issued and has since removed. The slot's
    /// generation only moves on insert, so every generation up to it was
    /// issued once.
    pub(crate) fn was_removed(&self, handle: Handle) -> bool {
        self.slots
            .get(handle.slot() as usize)
            .is_some_and(|slot| match handle.generation() {
                0 => false,
                generation if generation < slot.generation => true,
                generation => generation == slot.generation && slot.value.is_none(),
            })
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.slots.iter().all(|slot| slot.value.is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removed_handles_stay_invalid_after_reuse() {
        let mut table = HandleTable::new();
        let first = table.insert("a");
        assert_eq!(table.get(first), Ok(&"a"));
        assert_eq!(table.remove(first), Ok("a"));
        assert_eq!(table.remove(first), Err(Error::InvalidHandle));
        assert!(table.is_empty());

        let second = table.insert("b");
        assert_eq!(second.slot(), first.slot());
        assert_ne!(second, first);
        assert_eq!(table.get(first), Err(Error::InvalidHandle));
        assert_eq!(table.get_mut(second).map(|v| *v), Ok("b"));
    }

    #[test]
    fn removal_is_remembered_without_growing_the_table() {
        let mut table = HandleTable::new();
        let mut retired = Vec::new();
        for value in 0..100 {
            let handle = table.insert(value);
            assert!(!table.was_removed(handle));
            assert_eq!(table.remove(handle), Ok(value));
            retired.push(handle);
        }
        assert_eq!(table.slots.len(), 1);
        assert!(retired.iter().all(|&handle| table.was_removed(handle)));

        let live = table.insert(100);
        assert!(!table.was_removed(live));
        assert!(!table.was_removed(Handle::new(0, live.generation() + 1)));
        assert!(!table.was_removed(Handle::new(0, 0)));
        assert!(!table.was_removed(Handle::new(1, 1)));
    }

    #[test]
    fn never_issued_handles_are_invalid() {
        let table: HandleTable<u8> = HandleTable::new();
        assert_eq!(table.get(Handle::new(0, 1)), Err(Error::InvalidHandle));
        assert_eq!(table.get(Handle::new(9, 0)), Err(Error::InvalidHandle));
    }
}
