//! Iterators over a [`BList`](crate::BList).

use core::iter::FusedIterator;
use core::marker::PhantomData;

use crate::{Block, Key, Storage};

/// Iterator over the blocks of a list, front to back.
///
/// Created by [`BList::blocks`](crate::BList::blocks).
pub struct Blocks<'a, T, const N: usize, S, K: Key> {
    storage: &'a S,
    front: K,
    back: K,
    remaining: usize,
    _marker: PhantomData<T>,
}

impl<'a, T, const N: usize, S, K: Key> Blocks<'a, T, N, S, K>
where
    S: Storage<Block<T, N, K>, Key = K>,
{
    pub(crate) fn new(storage: &'a S, head: K, tail: K, count: usize) -> Self {
        Self {
            storage,
            front: head,
            back: tail,
            remaining: count,
            _marker: PhantomData,
        }
    }
}

impl<'a, T: 'a, const N: usize, S, K: Key + 'a> Iterator for Blocks<'a, T, N, S, K>
where
    S: Storage<Block<T, N, K>, Key = K>,
{
    type Item = &'a Block<T, N, K>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        // Safety: front stays on the chain while blocks remain
        let block = unsafe { self.storage.get_unchecked(self.front) };
        self.front = block.next;
        self.remaining -= 1;
        Some(block)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T: 'a, const N: usize, S, K: Key + 'a> DoubleEndedIterator for Blocks<'a, T, N, S, K>
where
    S: Storage<Block<T, N, K>, Key = K>,
{
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        // Safety: back stays on the chain while blocks remain
        let block = unsafe { self.storage.get_unchecked(self.back) };
        self.back = block.prev;
        self.remaining -= 1;
        Some(block)
    }
}

impl<'a, T: 'a, const N: usize, S, K: Key + 'a> ExactSizeIterator for Blocks<'a, T, N, S, K> where
    S: Storage<Block<T, N, K>, Key = K>
{
}

impl<'a, T: 'a, const N: usize, S, K: Key + 'a> FusedIterator for Blocks<'a, T, N, S, K> where
    S: Storage<Block<T, N, K>, Key = K>
{
}

/// Iterator over the elements of a list, front to back.
///
/// Created by [`BList::iter`](crate::BList::iter).
pub struct Iter<'a, T, const N: usize, S, K: Key> {
    blocks: Blocks<'a, T, N, S, K>,
    front: core::slice::Iter<'a, T>,
    back: core::slice::Iter<'a, T>,
    remaining: usize,
}

impl<'a, T, const N: usize, S, K: Key> Iter<'a, T, N, S, K>
where
    S: Storage<Block<T, N, K>, Key = K>,
{
    pub(crate) fn new(blocks: Blocks<'a, T, N, S, K>, len: usize) -> Self {
        Self {
            blocks,
            front: Default::default(),
            back: Default::default(),
            remaining: len,
        }
    }
}

impl<'a, T: 'a, const N: usize, S, K: Key + 'a> Iterator for Iter<'a, T, N, S, K>
where
    S: Storage<Block<T, N, K>, Key = K>,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(value) = self.front.next() {
                self.remaining -= 1;
                return Some(value);
            }
            match self.blocks.next() {
                Some(block) => self.front = block.values().iter(),
                None => {
                    // The back cursor may have already claimed the last block.
                    let value = self.back.next()?;
                    self.remaining -= 1;
                    return Some(value);
                }
            }
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T: 'a, const N: usize, S, K: Key + 'a> DoubleEndedIterator for Iter<'a, T, N, S, K>
where
    S: Storage<Block<T, N, K>, Key = K>,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(value) = self.back.next_back() {
                self.remaining -= 1;
                return Some(value);
            }
            match self.blocks.next_back() {
                Some(block) => self.back = block.values().iter(),
                None => {
                    let value = self.front.next_back()?;
                    self.remaining -= 1;
                    return Some(value);
                }
            }
        }
    }
}

impl<'a, T: 'a, const N: usize, S, K: Key + 'a> ExactSizeIterator for Iter<'a, T, N, S, K> where
    S: Storage<Block<T, N, K>, Key = K>
{
}

impl<'a, T: 'a, const N: usize, S, K: Key + 'a> FusedIterator for Iter<'a, T, N, S, K> where
    S: Storage<Block<T, N, K>, Key = K>
{
}
