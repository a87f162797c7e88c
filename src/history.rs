use std::num::NonZeroUsize;

/// Fixed-capacity history that overwrites its oldest slot once full.
#[derive(Clone, Debug)]
pub struct History<T> {
    slots: Vec<Option<T>>,
    written: usize,
}

impl<T> History<T> {
    pub fn new(capacity: NonZeroUsize) -> History<T> {
        History {
            slots: std::iter::repeat_with(|| None).take(capacity.get()).collect(),
            written: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.written == 0
    }

    /// Store an entry, returning the slot it was written to.
    pub fn push(&mut self, entry: T) -> usize {
        let slot = self.written % self.capacity();
        self.slots[slot] = Some(entry);
        self.written += 1;
        slot
    }

    /// Iterate over stored entries in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().flatten()
    }
}
