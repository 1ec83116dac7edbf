// Copyright 2016 spatial-rs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Fixed-capacity, inline storage for node and leaf entries

use generic_array::{ArrayLength, GenericArray};
use std::fmt;
use std::ops::{Index, IndexMut};
use typenum::Unsigned;

/// A vector holding at most `N` elements without ever reallocating.
///
/// Slots `[0, len)` are always occupied and slots `[len, N)` are always empty.
pub struct StaticVec<T, N: ArrayLength> {
    slots: GenericArray<Option<T>, N>,
    len: usize,
}

impl<T, N: ArrayLength> StaticVec<T, N> {
    /// An empty container
    pub fn new() -> StaticVec<T, N> {
        StaticVec {
            slots: GenericArray::default(),
            len: 0,
        }
    }

    /// Maximum number of elements
    pub fn capacity(&self) -> usize {
        N::to_usize()
    }

    /// Number of live elements
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// Append `value`. Pushing into a full container is a contract violation
    pub fn push(&mut self, value: T) {
        debug_assert!(
            !self.is_full(),
            "push into a full StaticVec with capacity {}",
            self.capacity()
        );
        self.slots[self.len] = Some(value);
        self.len += 1;
    }

    /// Remove and return the last element
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        self.slots[self.len].take()
    }

    /// Remove the element at `index`, shifting every later element down by one
    pub fn erase(&mut self, index: usize) -> T {
        assert!(
            index < self.len,
            "erase index({}) out of bounds for len {}",
            index,
            self.len
        );
        let removed = self.slots[index].take();
        self.slots[index..self.len].rotate_left(1);
        self.len -= 1;
        match removed {
            Some(value) => value,
            None => unreachable!("live slot {} was empty", index),
        }
    }

    /// Exchange two elements. Every other element keeps its index
    pub fn swap(&mut self, a: usize, b: usize) {
        assert!(
            a < self.len && b < self.len,
            "swap({}, {}) out of bounds for len {}",
            a,
            b,
            self.len
        );
        self.slots.swap(a, b);
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        if index < self.len {
            self.slots[index].as_ref()
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index < self.len {
            self.slots[index].as_mut()
        } else {
            None
        }
    }

    pub fn first(&self) -> Option<&T> {
        self.get(0)
    }

    pub fn last(&self) -> Option<&T> {
        self.len.checked_sub(1).and_then(|index| self.get(index))
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> {
        self.slots[..self.len].iter().flatten()
    }

    pub fn iter_mut(&mut self) -> impl DoubleEndedIterator<Item = &mut T> {
        self.slots[..self.len].iter_mut().flatten()
    }

    /// Drop every element
    pub fn clear(&mut self) {
        for slot in &mut self.slots[..self.len] {
            *slot = None;
        }
        self.len = 0;
    }
}

impl<T, N: ArrayLength> Default for StaticVec<T, N> {
    fn default() -> StaticVec<T, N> {
        StaticVec::new()
    }
}

impl<T: Clone, N: ArrayLength> Clone for StaticVec<T, N> {
    fn clone(&self) -> StaticVec<T, N> {
        let mut copy = StaticVec::new();
        for value in self.iter() {
            copy.push(value.clone());
        }
        copy
    }
}

impl<T: fmt::Debug, N: ArrayLength> fmt::Debug for StaticVec<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T, N: ArrayLength> Index<usize> for StaticVec<T, N> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        let len = self.len;
        self.get(index)
            .unwrap_or_else(|| panic!("index({}) out of bounds for len {}", index, len))
    }
}

impl<T, N: ArrayLength> IndexMut<usize> for StaticVec<T, N> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        let len = self.len;
        self.get_mut(index)
            .unwrap_or_else(|| panic!("index({}) out of bounds for len {}", index, len))
    }
}

impl<T, N: ArrayLength> IntoIterator for StaticVec<T, N> {
    type Item = T;
    type IntoIter = IntoIter<T, N>;

    fn into_iter(self) -> IntoIter<T, N> {
        IntoIter { vec: self, next: 0 }
    }
}

/// By-value iterator over a `StaticVec`
pub struct IntoIter<T, N: ArrayLength> {
    vec: StaticVec<T, N>,
    next: usize,
}

impl<T, N: ArrayLength> Iterator for IntoIter<T, N> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.next >= self.vec.len {
            return None;
        }
        self.next += 1;
        self.vec.slots[self.next - 1].take()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.vec.len - self.next;
        (remaining, Some(remaining))
    }
}

impl<T, N: ArrayLength> ExactSizeIterator for IntoIter<T, N> {}
