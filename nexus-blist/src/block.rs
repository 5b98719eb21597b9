//! Fixed-capacity node array.
//!
//! A [`Block`] is one link of a [`BList`](crate::BList) chain: an inline
//! array of up to `N` values plus handles to its neighbours.
//!
//! # Invariants
//! - `len <= N` at all times.
//! - Slots `0..len` are initialized; `len..N` are uninitialized and never
//!   read or dropped.
//! - A block linked into a list is never empty.

use core::fmt;
use core::mem::MaybeUninit;
use core::ptr;

use crate::Key;

/// A node of a [`BList`](crate::BList): up to `N` values stored inline.
///
/// Blocks are only handed out by reference. Use [`values`](Block::values) to
/// inspect the occupied slots.
pub struct Block<T, const N: usize, K: Key = usize> {
    values: [MaybeUninit<T>; N],
    len: usize,
    pub(crate) prev: K,
    pub(crate) next: K,
}

impl<T, const N: usize, K: Key> Block<T, N, K> {
    /// Creates an empty, unlinked block.
    #[inline]
    pub(crate) fn new() -> Self {
        const { assert!(N > 0, "block capacity must be at least 1") };

        Self {
            values: [const { MaybeUninit::uninit() }; N],
            len: 0,
            prev: K::NONE,
            next: K::NONE,
        }
    }

    /// Creates an unlinked block holding only `value`.
    #[inline]
    pub(crate) fn with_value(value: T) -> Self {
        let mut block = Self::new();
        block.values[0].write(value);
        block.len = 1;
        block
    }

    /// Number of occupied slots.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no slot is occupied.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` if every slot is occupied.
    #[inline]
    pub const fn is_full(&self) -> bool {
        self.len == N
    }

    /// Maximum number of values the block holds.
    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// The occupied slots, in order.
    #[inline]
    pub fn values(&self) -> &[T] {
        // Safety: `0..len` is initialized and contiguous
        unsafe { core::slice::from_raw_parts(self.values.as_ptr().cast::<T>(), self.len) }
    }

    #[inline]
    pub(crate) fn values_mut(&mut self) -> &mut [T] {
        // Safety: `0..len` is initialized and contiguous
        unsafe { core::slice::from_raw_parts_mut(self.values.as_mut_ptr().cast::<T>(), self.len) }
    }

    /// First occupied slot.
    #[inline]
    pub fn first(&self) -> Option<&T> {
        self.values().first()
    }

    /// Last occupied slot.
    #[inline]
    pub fn last(&self) -> Option<&T> {
        self.values().last()
    }

    /// Appends `value` after the last occupied slot.
    ///
    /// # Panics
    ///
    /// Panics if the block is full.
    #[inline]
    pub(crate) fn push(&mut self, value: T) {
        assert!(!self.is_full(), "push into a full block");
        self.values[self.len].write(value);
        self.len += 1;
    }

    /// Inserts `value` at `pos`, shifting later values one slot right.
    ///
    /// # Panics
    ///
    /// Panics if the block is full or `pos > len`.
    pub(crate) fn insert(&mut self, pos: usize, value: T) {
        assert!(!self.is_full(), "insert into a full block");
        assert!(pos <= self.len, "insert position {pos} past len {}", self.len);

        // Safety: `len < N`, so slot `len` exists; `pos..len` is initialized
        // and moves one slot right before `pos` is overwritten.
        unsafe {
            let at = self.values.as_mut_ptr().cast::<T>().add(pos);
            ptr::copy(at, at.add(1), self.len - pos);
            ptr::write(at, value);
        }
        self.len += 1;
    }

    /// Inserts `value` after every element that compares less than or equal
    /// to it. Returns the slot it landed in.
    pub(crate) fn insert_sorted(&mut self, value: T) -> usize
    where
        T: Ord,
    {
        let pos = self.values().partition_point(|v| v <= &value);
        self.insert(pos, value);
        pos
    }

    /// Removes and returns the value at `pos`, shifting later values left.
    ///
    /// # Panics
    ///
    /// Panics if `pos >= len`.
    pub(crate) fn remove(&mut self, pos: usize) -> T {
        assert!(pos < self.len, "remove position {pos} past len {}", self.len);

        // Safety: `pos` is initialized; it is read out before `pos+1..len`
        // moves down over it, and `len` shrinks so the stale last slot is
        // never touched again.
        let value = unsafe {
            let at = self.values.as_mut_ptr().cast::<T>().add(pos);
            let value = ptr::read(at);
            ptr::copy(at.add(1), at, self.len - pos - 1);
            value
        };
        self.len -= 1;
        value
    }

    /// Moves the upper `N / 2` values into a new unlinked block.
    ///
    /// `N - N / 2` values stay behind, relative order is preserved in both.
    ///
    /// # Panics
    ///
    /// Panics if the block is not full; splitting a partial block means the
    /// list's bookkeeping is broken.
    pub(crate) fn split_upper(&mut self) -> Self {
        assert!(
            self.is_full(),
            "split of a block that is not full ({} of {N} slots)",
            self.len
        );

        let moved = N / 2;
        let keep = N - moved;
        let mut upper = Self::new();

        // Safety: `keep..N` is initialized; ownership transfers to `upper`
        // and `self.len` drops to `keep` so nothing is dropped twice.
        unsafe {
            let src = self.values.as_ptr().cast::<T>().add(keep);
            ptr::copy_nonoverlapping(src, upper.values.as_mut_ptr().cast::<T>(), moved);
        }
        upper.len = moved;
        self.len = keep;
        upper
    }
}

impl<T, const N: usize, K: Key> Drop for Block<T, N, K> {
    fn drop(&mut self) {
        if core::mem::needs_drop::<T>() {
            // Safety: only `0..len` is initialized
            unsafe { ptr::drop_in_place(self.values_mut() as *mut [T]) };
        }
    }
}

impl<T: Clone, const N: usize, K: Key> Clone for Block<T, N, K> {
    fn clone(&self) -> Self {
        let mut out = Self::new();
        for value in self.values() {
            out.push(value.clone());
        }
        out.prev = self.prev;
        out.next = self.next;
        out
    }
}

impl<T: fmt::Debug, const N: usize, K: Key> fmt::Debug for Block<T, N, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Block")
            .field("values", &self.values())
            .field("prev", &self.prev)
            .field("next", &self.next)
            .finish()
    }
}
