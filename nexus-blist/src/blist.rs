//! Sorted list of arrays.
//!
//! A [`BList`] is a doubly-linked chain of [`Block`]s, each holding up to `N`
//! values inline. Compared to a plain linked list, a chain of blocks needs
//! `N` times fewer nodes, so traversals touch fewer cache lines.
//!
//! Blocks live in a [`Storage`] owned by the list and link to each other by
//! [`Key`]. Splicing a block in or out rewrites two handles; no block is ever
//! aliased outside the list.
//!
//! # Sorted Insertion
//!
//! [`insert`](BList::insert) keeps the whole chain non-decreasing. When the
//! block a value belongs to is full, that block is split in two (the left
//! block keeps `N - N/2` values, the right one receives `N/2`) and the value
//! goes into whichever half keeps the order. Removal never merges blocks; a
//! block is released as soon as it becomes empty.
//!
//! [`push_back`](BList::push_back) and [`push_front`](BList::push_front) are
//! positional and ignore ordering.
//!
//! # Example
//!
//! ```
//! use nexus_blist::BList;
//!
//! let mut list: BList<u32, 3> = BList::new();
//! for v in [5, 1, 4, 2, 8] {
//!     list.insert(v);
//! }
//!
//! assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![1, 2, 4, 5, 8]);
//! assert_eq!(list.block_count(), 2);
//! assert_eq!(list.find(&4), Some(2));
//!
//! assert_eq!(list.remove(0), Ok(1));
//! assert_eq!(list.remove_by_value(&8), Some(8));
//! assert_eq!(list[0], 2);
//! ```
//!
//! # Bounded Storage
//!
//! A list over [`BoxedStorage`] has a fixed block budget. Operations that need
//! a new block fail with [`Full`], leaving the list untouched and handing the
//! value back:
//!
//! ```
//! use nexus_blist::BoundedBList;
//!
//! let mut list: BoundedBList<u32, 2> = BoundedBList::with_block_limit(1);
//! list.try_insert(1).unwrap();
//! list.try_insert(2).unwrap();
//!
//! let err = list.try_insert(3).unwrap_err();
//! assert_eq!(err.into_inner(), 3);
//! assert_eq!(list.len(), 2);
//! ```

use core::fmt;
use core::marker::PhantomData;
use core::ops::{Index, IndexMut};

use crate::iter::{Blocks, Iter};
use crate::{
    BListStats, Block, BoxedStorage, Full, Key, OutOfRange, Storage, UnboundedStorage,
};

/// Growable block storage backed by `slab::Slab`. The default for [`BList`].
pub type SlabStorage<T, const N: usize> = slab::Slab<Block<T, N, usize>>;

/// Fixed-capacity block storage.
pub type BoxedBlockStorage<T, const N: usize, K = u32> = BoxedStorage<Block<T, N, K>, K>;

/// A [`BList`] with a fixed block budget.
pub type BoundedBList<T, const N: usize, K = u32> = BList<T, N, BoxedBlockStorage<T, N, K>, K>;

/// A sorted chain of fixed-capacity blocks.
///
/// # Type Parameters
///
/// - `T`: Element type
/// - `N`: Values per block (at least 1, checked at compile time)
/// - `S`: Block storage (default [`SlabStorage<T, N>`])
/// - `K`: Block key type, dictated by the storage (default `usize`)
///
/// # Element Requirements
///
/// Sorted insertion needs `T: Ord`, lookup by value needs `T: PartialEq`,
/// cloning the list needs `T: Clone`. Positional operations need nothing.
pub struct BList<T, const N: usize, S = SlabStorage<T, N>, K: Key = usize>
where
    S: Storage<Block<T, N, K>, Key = K>,
{
    storage: S,
    head: K,
    tail: K,
    len: usize,
    _marker: PhantomData<T>,
}

impl<T, const N: usize, S, K: Key> Default for BList<T, N, S, K>
where
    S: Storage<Block<T, N, K>, Key = K> + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Base impl - construction, access, removal
// =============================================================================

impl<T, const N: usize, S, K: Key> BList<T, N, S, K>
where
    S: Storage<Block<T, N, K>, Key = K>,
{
    /// Values each block holds.
    pub const BLOCK_CAPACITY: usize = N;

    /// Creates an empty list with default storage.
    #[inline]
    pub fn new() -> Self
    where
        S: Default,
    {
        Self::with_storage(S::default())
    }

    /// Creates an empty list over `storage`.
    ///
    /// # Panics
    ///
    /// Panics if `storage` already holds blocks.
    #[inline]
    pub fn with_storage(storage: S) -> Self {
        assert!(storage.is_empty(), "storage must be empty");
        Self {
            storage,
            head: K::NONE,
            tail: K::NONE,
            len: 0,
            _marker: PhantomData,
        }
    }

    /// Returns the number of elements.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the list holds no elements.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of blocks in the chain.
    #[inline]
    pub fn block_count(&self) -> usize {
        self.storage.len()
    }

    /// Returns the in-memory size of one block.
    #[inline]
    pub const fn node_size() -> usize {
        core::mem::size_of::<Block<T, N, K>>()
    }

    /// Returns a snapshot of the list's shape.
    pub fn stats(&self) -> BListStats {
        BListStats {
            node_size: Self::node_size(),
            node_count: self.block_count(),
            array_size: N,
            item_count: self.len,
        }
    }

    /// Returns the first block, or `None` if the list is empty.
    #[inline]
    pub fn head(&self) -> Option<&Block<T, N, K>> {
        self.head.is_some().then(|| self.block(self.head))
    }

    /// Returns the last block, or `None` if the list is empty.
    #[inline]
    pub fn tail(&self) -> Option<&Block<T, N, K>> {
        self.tail.is_some().then(|| self.block(self.tail))
    }

    /// Returns the first element.
    #[inline]
    pub fn front(&self) -> Option<&T> {
        self.head()?.first()
    }

    /// Returns the last element.
    #[inline]
    pub fn back(&self) -> Option<&T> {
        self.tail()?.last()
    }

    /// Returns the element at logical position `index`.
    ///
    /// O(blocks): the chain is walked from the head.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRange`] if `index >= len`.
    pub fn get(&self, index: usize) -> Result<&T, OutOfRange> {
        let (key, slot) = self.locate(index)?;
        Ok(&self.block(key).values()[slot])
    }

    /// Returns a mutable reference to the element at `index`.
    ///
    /// Writing through the reference can break the sort order that
    /// [`insert`](Self::insert) relies on; that is the caller's concern.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRange`] if `index >= len`.
    pub fn get_mut(&mut self, index: usize) -> Result<&mut T, OutOfRange> {
        let (key, slot) = self.locate(index)?;
        Ok(&mut self.block_mut(key).values_mut()[slot])
    }

    /// Removes and returns the element at `index`.
    ///
    /// Later elements of the same block shift down one slot. A block left
    /// empty is unlinked and released.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRange`] if `index >= len`; the list is not modified.
    pub fn remove(&mut self, index: usize) -> Result<T, OutOfRange> {
        let (key, slot) = self.locate(index)?;
        Ok(self.take(key, slot))
    }

    /// Removes all elements and releases every block.
    pub fn clear(&mut self) {
        if self.head.is_some() {
            log::trace!("releasing all {} blocks", self.storage.len());
        }
        self.storage.clear();

        self.head = K::NONE;
        self.tail = K::NONE;
        self.len = 0;
    }

    /// Returns an iterator over the elements, front to back.
    #[inline]
    pub fn iter(&self) -> Iter<'_, T, N, S, K> {
        Iter::new(self.blocks(), self.len)
    }

    /// Returns an iterator over the blocks, front to back.
    #[inline]
    pub fn blocks(&self) -> Blocks<'_, T, N, S, K> {
        Blocks::new(&self.storage, self.head, self.tail, self.block_count())
    }

    // ========================================================================
    // Positional insertion
    // ========================================================================

    /// Appends `value` after the last element.
    ///
    /// Fills the tail block if it has room, otherwise links a new tail
    /// block holding only `value`.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(value))` if a block was needed and the storage is
    /// full. The list is not modified.
    pub fn try_push_back(&mut self, value: T) -> Result<(), Full<T>> {
        let tail = self.tail;
        if tail.is_some() && !self.block(tail).is_full() {
            self.block_mut(tail).push(value);
        } else {
            let key = self.alloc_with(value)?;
            self.link_back(key);
        }

        self.len += 1;
        Ok(())
    }

    /// Prepends `value` before the first element.
    ///
    /// Shifts the head block right if it has room, otherwise links a new
    /// head block holding only `value`.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(value))` if a block was needed and the storage is
    /// full. The list is not modified.
    pub fn try_push_front(&mut self, value: T) -> Result<(), Full<T>> {
        let head = self.head;
        if head.is_some() && !self.block(head).is_full() {
            self.block_mut(head).insert(0, value);
        } else {
            let key = self.alloc_with(value)?;
            self.link_front(key);
        }

        self.len += 1;
        Ok(())
    }

    // ========================================================================
    // Internals
    // ========================================================================

    #[inline]
    fn block(&self, key: K) -> &Block<T, N, K> {
        debug_assert!(key.is_some());
        // Safety: every key reachable from head/tail names an occupied slot
        unsafe { self.storage.get_unchecked(key) }
    }

    #[inline]
    fn block_mut(&mut self, key: K) -> &mut Block<T, N, K> {
        debug_assert!(key.is_some());
        // Safety: every key reachable from head/tail names an occupied slot
        unsafe { self.storage.get_unchecked_mut(key) }
    }

    /// Allocates an unlinked block holding `value`.
    fn alloc_with(&mut self, value: T) -> Result<K, Full<T>> {
        match self.storage.try_insert(Block::with_value(value)) {
            Ok(key) => {
                log::trace!("allocated block {:?}", key);
                Ok(key)
            }
            Err(full) => {
                log::debug!("block storage exhausted at {} blocks", self.storage.len());
                Err(full.map(|mut block| block.remove(0)))
            }
        }
    }

    /// Splits the full block `key`, linking the new upper half right after
    /// it. Returns `key` (now the left half), or `None` if no block could be
    /// allocated, in which case nothing changed.
    fn split(&mut self, key: K) -> Option<K> {
        assert!(
            self.block(key).is_full(),
            "split of block {:?} that is not full",
            key
        );

        let upper = match self.storage.try_insert(Block::new()) {
            Ok(upper) => upper,
            Err(_) => {
                log::debug!("block storage exhausted at {} blocks", self.storage.len());
                return None;
            }
        };

        let moved = self.block_mut(key).split_upper();
        *self.block_mut(upper) = moved;
        self.link_after(key, upper);

        log::trace!(
            "split block {:?}: kept {}, moved {} to {:?}",
            key,
            N - N / 2,
            N / 2,
            upper
        );
        Some(key)
    }

    fn link_back(&mut self, key: K) {
        if self.tail.is_some() {
            self.link_after(self.tail, key);
        } else {
            self.head = key;
            self.tail = key;
        }
    }

    fn link_front(&mut self, key: K) {
        if self.head.is_some() {
            self.link_before(self.head, key);
        } else {
            self.head = key;
            self.tail = key;
        }
    }

    fn link_after(&mut self, after: K, key: K) {
        let next = self.block(after).next;
        let node = self.block_mut(key);
        node.prev = after;
        node.next = next;

        self.block_mut(after).next = key;
        if next.is_some() {
            self.block_mut(next).prev = key;
        } else {
            self.tail = key;
        }
    }

    fn link_before(&mut self, before: K, key: K) {
        let prev = self.block(before).prev;
        let node = self.block_mut(key);
        node.next = before;
        node.prev = prev;

        self.block_mut(before).prev = key;
        if prev.is_some() {
            self.block_mut(prev).next = key;
        } else {
            self.head = key;
        }
    }

    /// Unlinks and frees an empty block.
    fn release(&mut self, key: K) {
        let (prev, next) = {
            let node = self.block(key);
            debug_assert!(node.is_empty());
            (node.prev, node.next)
        };

        if prev.is_some() {
            self.block_mut(prev).next = next;
        } else {
            self.head = next;
        }

        if next.is_some() {
            self.block_mut(next).prev = prev;
        } else {
            self.tail = prev;
        }

        self.storage.remove(key);
        log::trace!("released block {:?}", key);
    }

    /// Removes the value in `slot` of block `key`, releasing the block if it
    /// empties.
    fn take(&mut self, key: K, slot: usize) -> T {
        let node = self.block_mut(key);
        let value = node.remove(slot);
        let emptied = node.is_empty();

        self.len -= 1;
        if emptied {
            self.release(key);
        }
        value
    }

    /// Maps a logical index to its block and slot.
    fn locate(&self, index: usize) -> Result<(K, usize), OutOfRange> {
        if index >= self.len {
            return Err(OutOfRange {
                index,
                len: self.len,
            });
        }

        let mut remaining = index;
        let mut key = self.head;
        while key.is_some() {
            let node = self.block(key);
            if remaining < node.len() {
                return Ok((key, remaining));
            }
            remaining -= node.len();
            key = node.next;
        }

        unreachable!("item count {} exceeds the block chain", self.len)
    }

    /// Finds the first element equal to `value`: block, slot and logical index.
    fn position(&self, value: &T) -> Option<(K, usize, usize)>
    where
        T: PartialEq,
    {
        let mut index = 0;
        let mut key = self.head;
        while key.is_some() {
            let node = self.block(key);
            if let Some(slot) = node.values().iter().position(|v| v == value) {
                return Some((key, slot, index + slot));
            }
            index += node.len();
            key = node.next;
        }
        None
    }
}

// =============================================================================
// Lookup by value
// =============================================================================

impl<T: PartialEq, const N: usize, S, K: Key> BList<T, N, S, K>
where
    S: Storage<Block<T, N, K>, Key = K>,
{
    /// Returns the logical index of the first element equal to `value`.
    ///
    /// Linear in the number of elements.
    #[inline]
    pub fn find(&self, value: &T) -> Option<usize> {
        self.position(value).map(|(_, _, index)| index)
    }

    /// Returns `true` if an element equals `value`.
    #[inline]
    pub fn contains(&self, value: &T) -> bool {
        self.position(value).is_some()
    }

    /// Removes the first element equal to `value`.
    ///
    /// Returns `None`, leaving the list unchanged, if there is no such
    /// element.
    pub fn remove_by_value(&mut self, value: &T) -> Option<T> {
        let (key, slot, _) = self.position(value)?;
        Some(self.take(key, slot))
    }
}

// =============================================================================
// Sorted insertion
// =============================================================================

impl<T: Ord, const N: usize, S, K: Key> BList<T, N, S, K>
where
    S: Storage<Block<T, N, K>, Key = K>,
{
    /// Inserts `value` keeping the list non-decreasing.
    ///
    /// Equal values keep insertion order. Only meaningful if every element
    /// got in through `insert`/`try_insert`.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(value))` if a block was needed (new block or split)
    /// and the storage is full. The list is not modified.
    pub fn try_insert(&mut self, value: T) -> Result<(), Full<T>> {
        if self.head.is_none() {
            return self.try_push_front(value);
        }
        if N == 1 {
            return self.insert_single(value);
        }

        let mut key = self.head;
        while key.is_some() {
            let node = self.block(key);
            if value < node.values()[0] {
                if key != self.head {
                    let prev = node.prev;
                    return self.insert_between(prev, key, value);
                }
                if !node.is_full() {
                    self.insert_into(key, value);
                    return Ok(());
                }
                let Some(left) = self.split(key) else {
                    return Err(Full(value));
                };
                self.insert_split(left, value);
                return Ok(());
            }
            key = node.next;
        }

        // At least every block's first element: the value belongs in the tail.
        let tail = self.tail;
        if !self.block(tail).is_full() {
            self.insert_into(tail, value);
            return Ok(());
        }
        let Some(left) = self.split(tail) else {
            return Err(Full(value));
        };
        self.insert_split(left, value);
        Ok(())
    }

    /// One value per block: splice a new block before the first greater
    /// value, or append.
    fn insert_single(&mut self, value: T) -> Result<(), Full<T>> {
        let mut key = self.head;
        while key.is_some() {
            let node = self.block(key);
            if value < node.values()[0] {
                let new = self.alloc_with(value)?;
                self.link_before(key, new);
                self.len += 1;
                return Ok(());
            }
            key = node.next;
        }

        self.try_push_back(value)
    }

    /// `value` sorts before `cur`'s first element and at or after `prev`'s.
    fn insert_between(&mut self, prev: K, cur: K, value: T) -> Result<(), Full<T>> {
        let prev_full = self.block(prev).is_full();
        let cur_full = self.block(cur).is_full();

        match (prev_full, cur_full) {
            (false, _) => self.insert_into(prev, value),
            (true, true) => {
                let Some(left) = self.split(prev) else {
                    return Err(Full(value));
                };
                self.insert_split(left, value);
            }
            (true, false) => {
                let prev_last = &self.block(prev).values()[N - 1];
                if *prev_last < value {
                    self.insert_into(cur, value);
                    return Ok(());
                }

                let Some(left) = self.split(prev) else {
                    return Err(Full(value));
                };
                let right = self.block(left).next;
                if value < self.block(right).values()[0] {
                    self.insert_into(left, value);
                } else {
                    self.insert_into(right, value);
                }
            }
        }
        Ok(())
    }

    /// Places `value` into the left block of a fresh split or its new right
    /// sibling, whichever keeps the order. Both have room.
    fn insert_split(&mut self, left: K, value: T) {
        let right = self.block(left).next;
        let left_node = self.block(left);
        let left_last = &left_node.values()[left_node.len() - 1];
        let right_first = &self.block(right).values()[0];

        let goes_left =
            (*left_last < value && value < *right_first) || value < *left_last;
        if goes_left {
            self.insert_into(left, value);
        } else {
            self.insert_into(right, value);
        }
    }

    #[inline]
    fn insert_into(&mut self, key: K, value: T) {
        self.block_mut(key).insert_sorted(value);
        self.len += 1;
    }
}

// =============================================================================
// Unbounded storage - infallible insertion
// =============================================================================

impl<T, const N: usize, S, K: Key> BList<T, N, S, K>
where
    S: UnboundedStorage<Block<T, N, K>, Key = K>,
{
    /// Appends `value` after the last element.
    #[inline]
    pub fn push_back(&mut self, value: T) {
        let Ok(()) = self.try_push_back(value) else {
            unreachable!("unbounded storage refused a block")
        };
    }

    /// Prepends `value` before the first element.
    #[inline]
    pub fn push_front(&mut self, value: T) {
        let Ok(()) = self.try_push_front(value) else {
            unreachable!("unbounded storage refused a block")
        };
    }

    /// Inserts `value` keeping the list non-decreasing.
    ///
    /// See [`try_insert`](Self::try_insert).
    #[inline]
    pub fn insert(&mut self, value: T)
    where
        T: Ord,
    {
        let Ok(()) = self.try_insert(value) else {
            unreachable!("unbounded storage refused a block")
        };
    }
}

// =============================================================================
// Bounded storage
// =============================================================================

impl<T, const N: usize, K: Key> BList<T, N, BoxedBlockStorage<T, N, K>, K> {
    /// Creates an empty list that may use at most `max_blocks` blocks.
    ///
    /// # Panics
    ///
    /// Panics if `max_blocks` is 0 or does not fit `K`.
    pub fn with_block_limit(max_blocks: usize) -> Self {
        Self::with_storage(BoxedStorage::with_capacity(max_blocks))
    }

    /// Returns the maximum number of blocks.
    #[inline]
    pub fn block_limit(&self) -> usize {
        self.storage.capacity()
    }
}

// =============================================================================
// Trait impls
// =============================================================================

impl<T: Clone, const N: usize, S, K: Key> Clone for BList<T, N, S, K>
where
    S: Storage<Block<T, N, K>, Key = K> + Clone,
{
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            head: self.head,
            tail: self.tail,
            len: self.len,
            _marker: PhantomData,
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.storage.clone_from(&source.storage);
        self.head = source.head;
        self.tail = source.tail;
        self.len = source.len;
    }
}

impl<T: fmt::Debug, const N: usize, S, K: Key> fmt::Debug for BList<T, N, S, K>
where
    S: Storage<Block<T, N, K>, Key = K>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq, const N: usize, S, K: Key> PartialEq for BList<T, N, S, K>
where
    S: Storage<Block<T, N, K>, Key = K>,
{
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq, const N: usize, S, K: Key> Eq for BList<T, N, S, K> where
    S: Storage<Block<T, N, K>, Key = K>
{
}

impl<T, const N: usize, S, K: Key> Index<usize> for BList<T, N, S, K>
where
    S: Storage<Block<T, N, K>, Key = K>,
{
    type Output = T;

    /// # Panics
    ///
    /// Panics if `index >= len`.
    fn index(&self, index: usize) -> &T {
        match self.get(index) {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<T, const N: usize, S, K: Key> IndexMut<usize> for BList<T, N, S, K>
where
    S: Storage<Block<T, N, K>, Key = K>,
{
    /// # Panics
    ///
    /// Panics if `index >= len`.
    fn index_mut(&mut self, index: usize) -> &mut T {
        match self.get_mut(index) {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<'a, T, const N: usize, S, K: Key> IntoIterator for &'a BList<T, N, S, K>
where
    S: Storage<Block<T, N, K>, Key = K>,
{
    type Item = &'a T;
    type IntoIter = Iter<'a, T, N, S, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, const N: usize, S, K: Key> Extend<T> for BList<T, N, S, K>
where
    S: UnboundedStorage<Block<T, N, K>, Key = K>,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push_back(value);
        }
    }
}

impl<T, const N: usize, S, K: Key> FromIterator<T> for BList<T, N, S, K>
where
    S: UnboundedStorage<Block<T, N, K>, Key = K> + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}
