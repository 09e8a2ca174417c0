use alloc::vec::Vec;

use super::handle::Handle;

/// A slot is either live or part of the vacant chain. Vacant slots thread the
/// free list through the arena itself, so freeing never allocates.
#[derive(Clone)]
enum Entry<T> {
    Occupied(T),
    Vacant(Option<Handle>),
}

/// Growable slot storage with handle recycling. Tree nodes are allocated here
/// on insert and returned to the vacant chain on delete.
#[derive(Clone)]
pub(crate) struct Arena<T> {
    entries: Vec<Entry<T>>,
    free_head: Option<Handle>,
    len: usize,
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Self {
        Self {
            entries: Vec::new(),
            free_head: None,
            len: 0,
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            free_head: None,
            len: 0,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn alloc(&mut self, element: T) -> Handle {
        self.len += 1;
        if let Some(handle) = self.free_head {
            // Reuse the most recently freed slot.
            let slot = &mut self.entries[handle.to_index()];
            self.free_head = match slot {
                Entry::Vacant(next) => *next,
                Entry::Occupied(_) => panic!("`Arena::alloc()` - occupied slot on the free list!"),
            };
            *slot = Entry::Occupied(element);
            handle
        } else {
            assert!(
                self.entries.len() <= Handle::MAX,
                "`Arena::alloc()` - arena is at maximum capacity ({})",
                Handle::MAX
            );
            self.entries.push(Entry::Occupied(element));
            Handle::from_index(self.entries.len() - 1)
        }
    }

    #[inline]
    pub(crate) fn get(&self, handle: Handle) -> &T {
        match &self.entries[handle.to_index()] {
            Entry::Occupied(element) => element,
            Entry::Vacant(_) => panic!("`Arena::get()` - `handle` is invalid!"),
        }
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, handle: Handle) -> &mut T {
        match &mut self.entries[handle.to_index()] {
            Entry::Occupied(element) => element,
            Entry::Vacant(_) => panic!("`Arena::get_mut()` - `handle` is invalid!"),
        }
    }

    /// Removes the element at `handle`, pushing the slot onto the vacant chain.
    pub(crate) fn take(&mut self, handle: Handle) -> T {
        let slot = &mut self.entries[handle.to_index()];
        assert!(matches!(slot, Entry::Occupied(_)), "`Arena::take()` - `handle` is invalid!");
        match core::mem::replace(slot, Entry::Vacant(self.free_head)) {
            Entry::Occupied(element) => {
                self.free_head = Some(handle);
                self.len -= 1;
                element
            }
            Entry::Vacant(_) => unreachable!(),
        }
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.free_head = None;
        self.len = 0;
    }
}
