//! Block arenas with stable handles.
//!
//! A [`BList`](crate::BList) never allocates blocks on its own. Every block
//! lives in a [`Storage`] and is addressed by a [`Key`]; links between blocks
//! are keys, so unlinking a block is a matter of rewriting two handles and
//! returning the slot to the arena.
//!
//! # Storage Traits
//!
//! ```text
//! Storage<T>               - base trait: try_insert, remove, get, len
//!     │
//!     ├── BoundedStorage<T>   - fixed capacity, try_insert may return Full
//!     │
//!     └── UnboundedStorage<T> - growable, try_insert never fails
//! ```
//!
//! Bounded storage is how a list is given a block budget: once the arena is
//! exhausted, insertions that need a fresh block fail with [`Full`] and hand
//! the value back. Unbounded storage unlocks the infallible list API
//! (`push_back`, `insert`, ...).

use crate::Key;

/// Slab-like storage with stable keys.
///
/// # Requirements
///
/// Implementations must provide:
/// - **Stable keys**: a key remains valid until explicitly removed
/// - **O(1)** insert, remove and get
/// - **Slot reuse**: removed slots can be handed out again
pub trait Storage<T> {
    /// Key type for this storage.
    type Key: Key;

    /// Inserts a value, returning its stable key.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(value))` if the storage cannot hold another value.
    fn try_insert(&mut self, value: T) -> Result<Self::Key, Full<T>>;

    /// Removes and returns the value at `key`, if present.
    fn remove(&mut self, key: Self::Key) -> Option<T>;

    /// Returns a reference to the value at `key`, if present.
    fn get(&self, key: Self::Key) -> Option<&T>;

    /// Returns a mutable reference to the value at `key`, if present.
    fn get_mut(&mut self, key: Self::Key) -> Option<&mut T>;

    /// Returns a reference without checking occupancy.
    ///
    /// # Safety
    ///
    /// `key` must be valid and occupied.
    unsafe fn get_unchecked(&self, key: Self::Key) -> &T;

    /// Returns a mutable reference without checking occupancy.
    ///
    /// # Safety
    ///
    /// `key` must be valid and occupied.
    unsafe fn get_unchecked_mut(&mut self, key: Self::Key) -> &mut T;

    /// Returns the number of occupied slots.
    fn len(&self) -> usize;

    /// Drops every value and frees every slot.
    ///
    /// All previously handed-out keys are invalidated.
    fn clear(&mut self);

    /// Returns `true` if no slots are occupied.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Storage with a fixed number of slots.
pub trait BoundedStorage<T>: Storage<T> {
    /// Returns the maximum number of values the storage can hold.
    fn capacity(&self) -> usize;

    /// Returns `true` if every slot is occupied.
    #[inline]
    fn is_full(&self) -> bool {
        self.len() >= self.capacity()
    }
}

/// Storage that grows on demand.
///
/// Implementors guarantee that [`Storage::try_insert`] never returns `Err`.
pub trait UnboundedStorage<T>: Storage<T> {}

/// Error returned when bounded storage has no free slot.
///
/// Carries the value that could not be stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Full<T>(pub T);

impl<T> Full<T> {
    /// Returns the value that could not be inserted.
    pub fn into_inner(self) -> T {
        self.0
    }

    /// Maps the carried value, keeping the error.
    pub(crate) fn map<U>(self, f: impl FnOnce(T) -> U) -> Full<U> {
        Full(f(self.0))
    }
}

impl<T> core::fmt::Display for Full<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "block storage is full")
    }
}

impl<T: core::fmt::Debug> std::error::Error for Full<T> {}

// =============================================================================
// BoxedStorage - fixed capacity, free-stack slot reuse
// =============================================================================

/// Fixed-capacity storage with runtime-determined size.
///
/// Slots are allocated once, up front. Freed slots go on a stack and are
/// reused last-in first-out.
///
/// # Example
///
/// ```
/// use nexus_blist::{BoundedStorage, BoxedStorage, Storage};
///
/// let mut storage: BoxedStorage<u64> = BoxedStorage::with_capacity(2);
/// let a = storage.try_insert(1).unwrap();
/// let _b = storage.try_insert(2).unwrap();
/// assert!(storage.is_full());
/// assert_eq!(storage.try_insert(3).unwrap_err().into_inner(), 3);
///
/// storage.remove(a);
/// assert_eq!(storage.try_insert(4).unwrap(), a);
/// ```
#[derive(Debug, Clone)]
pub struct BoxedStorage<T, K: Key = u32> {
    slots: Box<[Option<T>]>,
    /// Vacant slot keys; the top of the stack is handed out next.
    free: Vec<K>,
}

impl<T, K: Key> BoxedStorage<T, K> {
    /// Creates storage with exactly `capacity` slots.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0 or does not fit the key type (the key's
    /// `NONE` value is reserved).
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "capacity must be > 0");
        assert!(
            capacity <= K::NONE.as_usize(),
            "capacity exceeds key type maximum"
        );

        let slots = (0..capacity).map(|_| None).collect();
        // Reversed so slot 0 is handed out first.
        let free = (0..capacity).rev().map(K::from_usize).collect();

        Self { slots, free }
    }

    /// Returns the number of slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of occupied slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Returns `true` if no slots are occupied.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.free.len() == self.slots.len()
    }

    /// Drops every stored value and makes all slots available again.
    ///
    /// Any keys handed out before the call are invalidated.
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = None;
        }
        self.free.clear();
        self.free
            .extend((0..self.slots.len()).rev().map(K::from_usize));
    }
}

impl<T, K: Key> Storage<T> for BoxedStorage<T, K> {
    type Key = K;

    #[inline]
    fn try_insert(&mut self, value: T) -> Result<K, Full<T>> {
        let Some(key) = self.free.pop() else {
            return Err(Full(value));
        };

        let slot = &mut self.slots[key.as_usize()];
        debug_assert!(slot.is_none(), "free stack handed out an occupied slot");
        *slot = Some(value);
        Ok(key)
    }

    #[inline]
    fn remove(&mut self, key: K) -> Option<T> {
        let value = self.slots.get_mut(key.as_usize())?.take()?;
        self.free.push(key);
        Some(value)
    }

    #[inline]
    fn get(&self, key: K) -> Option<&T> {
        self.slots.get(key.as_usize())?.as_ref()
    }

    #[inline]
    fn get_mut(&mut self, key: K) -> Option<&mut T> {
        self.slots.get_mut(key.as_usize())?.as_mut()
    }

    #[inline]
    unsafe fn get_unchecked(&self, key: K) -> &T {
        // Safety: caller guarantees the slot exists and is occupied
        unsafe {
            self.slots
                .get_unchecked(key.as_usize())
                .as_ref()
                .unwrap_unchecked()
        }
    }

    #[inline]
    unsafe fn get_unchecked_mut(&mut self, key: K) -> &mut T {
        // Safety: caller guarantees the slot exists and is occupied
        unsafe {
            self.slots
                .get_unchecked_mut(key.as_usize())
                .as_mut()
                .unwrap_unchecked()
        }
    }

    #[inline]
    fn len(&self) -> usize {
        BoxedStorage::len(self)
    }

    #[inline]
    fn clear(&mut self) {
        BoxedStorage::clear(self);
    }
}

impl<T, K: Key> BoundedStorage<T> for BoxedStorage<T, K> {
    #[inline]
    fn capacity(&self) -> usize {
        BoxedStorage::capacity(self)
    }
}

// =============================================================================
// slab::Slab implementation
// =============================================================================

impl<T> Storage<T> for slab::Slab<T> {
    type Key = usize;

    #[inline]
    fn try_insert(&mut self, value: T) -> Result<usize, Full<T>> {
        Ok(self.insert(value))
    }

    #[inline]
    fn remove(&mut self, key: usize) -> Option<T> {
        self.try_remove(key)
    }

    #[inline]
    fn get(&self, key: usize) -> Option<&T> {
        slab::Slab::get(self, key)
    }

    #[inline]
    fn get_mut(&mut self, key: usize) -> Option<&mut T> {
        slab::Slab::get_mut(self, key)
    }

    #[inline]
    unsafe fn get_unchecked(&self, key: usize) -> &T {
        unsafe { slab::Slab::get_unchecked(self, key) }
    }

    #[inline]
    unsafe fn get_unchecked_mut(&mut self, key: usize) -> &mut T {
        unsafe { slab::Slab::get_unchecked_mut(self, key) }
    }

    #[inline]
    fn len(&self) -> usize {
        slab::Slab::len(self)
    }

    #[inline]
    fn clear(&mut self) {
        slab::Slab::clear(self);
    }
}

impl<T> UnboundedStorage<T> for slab::Slab<T> {}
