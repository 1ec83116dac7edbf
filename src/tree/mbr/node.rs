// Copyright 2016 spatial-rs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use crate::geometry::Mbr;
use crate::staticvec::StaticVec;
use crate::tree::mbr::{mbr_of, MbrLeaf, MbrLeafGeometry};
use generic_array::ArrayLength;

/// An internal entry: a child node and the tight region bounding it
#[derive(Debug, Clone)]
pub struct MbrEntry<B, N> {
    pub mbr: B,
    pub child: Box<N>,
}

impl<B: Mbr, N> MbrLeafGeometry for MbrEntry<B, N> {
    type Mbr = B;

    fn mbr(&self) -> B {
        self.mbr.clone()
    }

    fn contained_by_mbr(&self, mbr: &B) -> bool {
        mbr.contains(&self.mbr)
    }

    fn overlapped_by_mbr(&self, mbr: &B) -> bool {
        mbr.overlaps(&self.mbr)
    }

    fn expand_mbr_to_fit(&self, mbr: &B) -> B {
        mbr.merge(&self.mbr)
    }
}

/// Entry type held by `MbrNode::Level`
pub type LevelEntry<K, T, MAX> = MbrEntry<<K as MbrLeafGeometry>::Mbr, MbrNode<K, T, MAX>>;

/// Level node of a tree. Either contains other levels or leaves
#[derive(Debug, Clone)]
pub enum MbrNode<K, T, MAX>
    where K: MbrLeafGeometry,
          MAX: ArrayLength,
{
    /// Contains only other levels
    Level {
        children: StaticVec<LevelEntry<K, T, MAX>, MAX>,
    },
    /// Contains only leaves
    Leaves {
        children: StaticVec<MbrLeaf<K, T>, MAX>,
    },
}

impl<K, T, MAX> MbrNode<K, T, MAX>
    where K: MbrLeafGeometry,
          MAX: ArrayLength,
{
/// Create an empty leaf level
    pub fn new_leaves() -> MbrNode<K, T, MAX> {
        MbrNode::Leaves { children: StaticVec::new() }
    }

/// Create an empty level of levels
    pub fn new_level() -> MbrNode<K, T, MAX> {
        MbrNode::Level { children: StaticVec::new() }
    }

/// Does the level point to leaves?
    pub fn has_leaves(&self) -> bool {
        match *self {
            MbrNode::Level { .. } => false,
            MbrNode::Leaves { .. } => true,
        }
    }

/// Does the level point to other levels?
    pub fn has_levels(&self) -> bool {
        !self.has_leaves()
    }

/// Number of level's children
    pub fn len(&self) -> usize {
        match *self {
            MbrNode::Level { ref children } => children.len(),
            MbrNode::Leaves { ref children } => children.len(),
        }
    }

/// Does the level have children?
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

/// Tight bound of every child. `None` for an empty level
    pub fn mbr(&self) -> Option<K::Mbr> {
        match *self {
            MbrNode::Level { ref children } => mbr_of(children.iter()),
            MbrNode::Leaves { ref children } => mbr_of(children.iter()),
        }
    }

/// Child entries of a level of levels
    pub fn level_children(&self) -> Option<&StaticVec<LevelEntry<K, T, MAX>, MAX>> {
        match *self {
            MbrNode::Level { ref children } => Some(children),
            MbrNode::Leaves { .. } => None,
        }
    }

/// Stored entries of a leaf level
    pub fn leaf_children(&self) -> Option<&StaticVec<MbrLeaf<K, T>, MAX>> {
        match *self {
            MbrNode::Level { .. } => None,
            MbrNode::Leaves { ref children } => Some(children),
        }
    }

    pub(crate) fn tight_mbr(&self) -> K::Mbr {
        self.mbr().expect("only non-empty levels are bounded")
    }
}

impl<K, T, MAX> MbrEntry<K::Mbr, MbrNode<K, T, MAX>>
    where K: MbrLeafGeometry,
          MAX: ArrayLength,
{
/// Wrap a non-empty node in an entry bounded by the node's tight region
    pub fn from_node(node: MbrNode<K, T, MAX>) -> LevelEntry<K, T, MAX> {
        MbrEntry {
            mbr: node.tight_mbr(),
            child: Box::new(node),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Interval;
    use typenum::U4;

    type Node = MbrNode<Interval<i32>, u8, U4>;

    #[test]
    fn bounds_follow_children() {
        let mut node = Node::new_leaves();
        assert!(node.has_leaves());
        assert_eq!(None, node.mbr());
        if let MbrNode::Leaves { ref mut children } = node {
            children.push(MbrLeaf::new(Interval::new(3, 4), 0));
            children.push(MbrLeaf::new(Interval::new(-1, 0), 1));
        }
        assert_eq!(Some(Interval::new(-1, 4)), node.mbr());
        assert_eq!(2, node.leaf_children().map_or(0, |c| c.len()));

        let entry = MbrEntry::from_node(node);
        assert_eq!(Interval::new(-1, 4), entry.mbr);
        let mut parent = Node::new_level();
        if let MbrNode::Level { ref mut children } = parent {
            children.push(entry);
        }
        assert!(parent.has_levels());
        assert_eq!(1, parent.len());
        assert_eq!(Some(Interval::new(-1, 4)), parent.mbr());
        assert!(parent.leaf_children().is_none());
    }
}
