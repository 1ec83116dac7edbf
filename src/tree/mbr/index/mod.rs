// Copyright 2016 spatial-rs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Structural algorithms: node splitting, insertion and condensing after removal

use crate::staticvec::StaticVec;
use crate::tree::mbr::{LevelEntry, MbrLeaf, MbrLeafGeometry};
use generic_array::ArrayLength;

pub mod quadratic;
pub mod r;

pub const AT_ROOT: bool = true;
pub const NOT_AT_ROOT: bool = false;

/// Divide an overflowing node
pub trait IndexSplit {
    /// `children` is full and `pending` does not fit. Leaves one group in `children` and
    /// returns the other. Both groups hold at least `min` entries.
    fn split<E, N>(&self, children: &mut StaticVec<E, N>, pending: E, min: usize) -> StaticVec<E, N>
        where E: MbrLeafGeometry,
              N: ArrayLength;
}

/// Something to place in the tree at a known height.
///
/// Heights count up from the leaf level: a node of leaves has height 0.
pub enum Reinsert<K, T, MAX>
    where K: MbrLeafGeometry,
          MAX: ArrayLength,
{
    /// A stored entry, placed in a node of height 0
    Leaf(MbrLeaf<K, T>),
    /// A whole subtree whose child has height `height`, placed in a node of height `height + 1`
    Level {
        entry: LevelEntry<K, T, MAX>,
        height: usize,
    },
}

impl<K, T, MAX> Reinsert<K, T, MAX>
    where K: MbrLeafGeometry,
          MAX: ArrayLength,
{
/// Height of the node that must receive this entry
    pub fn target_height(&self) -> usize {
        match *self {
            Reinsert::Leaf(_) => 0,
            Reinsert::Level { height, .. } => height + 1,
        }
    }

    pub fn mbr(&self) -> K::Mbr {
        match *self {
            Reinsert::Leaf(ref leaf) => leaf.mbr(),
            Reinsert::Level { ref entry, .. } => entry.mbr(),
        }
    }
}
