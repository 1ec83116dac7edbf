// Copyright 2016 spatial-rs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use crate::tree::mbr::{EntryHandle, MbrLeaf, MbrLeafGeometry, MbrNode, MbrQuery};
use generic_array::ArrayLength;

/// Depth-first walk over the stored entries accepted by an optional query.
///
/// Each frame is a node and the index of the next child to visit in it.
struct EntryCursor<'tree, K, T, MAX>
    where K: MbrLeafGeometry,
          MAX: ArrayLength,
{
    query: Option<MbrQuery<K::Mbr>>,
    stack: Vec<(&'tree MbrNode<K, T, MAX>, usize)>,
}

impl<'tree, K, T, MAX> EntryCursor<'tree, K, T, MAX>
    where K: MbrLeafGeometry,
          MAX: ArrayLength,
{
    fn new(root: &'tree MbrNode<K, T, MAX>, query: Option<MbrQuery<K::Mbr>>) -> EntryCursor<'tree, K, T, MAX> {
        let mut stack = Vec::new();
        if !root.is_empty() {
            stack.push((root, 0));
        }
        EntryCursor { query, stack }
    }

    fn accept_leaf(&self, leaf: &MbrLeaf<K, T>) -> bool {
        self.query.as_ref().map_or(true, |query| query.accept_leaf(leaf))
    }

    fn accept_level(&self, mbr: &K::Mbr) -> bool {
        self.query.as_ref().map_or(true, |query| query.accept_level(mbr))
    }

    fn next_leaf(&mut self) -> Option<&'tree MbrLeaf<K, T>> {
        loop {
            let (node, index) = {
                let frame = self.stack.last_mut()?;
                frame.1 += 1;
                (frame.0, frame.1 - 1)
            };
            match *node {
                MbrNode::Leaves { ref children } => match children.get(index) {
                    Some(leaf) => {
                        if self.accept_leaf(leaf) {
                            return Some(leaf);
                        }
                    }
                    None => {
                        self.stack.pop();
                    }
                },
                MbrNode::Level { ref children } => match children.get(index) {
                    Some(entry) => {
                        if self.accept_level(&entry.mbr) {
                            self.stack.push((&*entry.child, 0));
                        }
                    }
                    None => {
                        self.stack.pop();
                    }
                },
            }
        }
    }

    /// Handle for the leaf most recently returned by `next_leaf`
    fn handle(&self, stamp: u64) -> EntryHandle {
        let levels = self.stack.len().saturating_sub(1);
        EntryHandle {
            path: self.stack[..levels].iter().map(|frame| frame.1 - 1).collect(),
            slot: self.stack.last().map_or(0, |frame| frame.1 - 1),
            stamp,
        }
    }
}

/// Iterate all `MbrLeaf` entries matching a query
pub struct Iter<'tree, K, T, MAX>
    where K: MbrLeafGeometry,
          MAX: ArrayLength,
{
    cursor: EntryCursor<'tree, K, T, MAX>,
}

impl<'tree, K, T, MAX> Iter<'tree, K, T, MAX>
    where K: MbrLeafGeometry,
          MAX: ArrayLength,
{
    pub(crate) fn new(root: &'tree MbrNode<K, T, MAX>, query: Option<MbrQuery<K::Mbr>>) -> Iter<'tree, K, T, MAX> {
        Iter { cursor: EntryCursor::new(root, query) }
    }
}

impl<'tree, K, T, MAX> Iterator for Iter<'tree, K, T, MAX>
    where K: MbrLeafGeometry,
          MAX: ArrayLength,
{
    type Item = (&'tree K, &'tree T);

    fn next(&mut self) -> Option<(&'tree K, &'tree T)> {
        self.cursor.next_leaf().map(MbrLeaf::as_tuple)
    }
}

/// Iterate the `MbrLeaf` entries matching a query along with a handle for erasing each.
///
/// Handles stay valid until the tree is next mutated.
pub struct Handles<'tree, K, T, MAX>
    where K: MbrLeafGeometry,
          MAX: ArrayLength,
{
    cursor: EntryCursor<'tree, K, T, MAX>,
    stamp: u64,
}

impl<'tree, K, T, MAX> Handles<'tree, K, T, MAX>
    where K: MbrLeafGeometry,
          MAX: ArrayLength,
{
    pub(crate) fn new(root: &'tree MbrNode<K, T, MAX>, query: Option<MbrQuery<K::Mbr>>, stamp: u64) -> Handles<'tree, K, T, MAX> {
        Handles { cursor: EntryCursor::new(root, query), stamp }
    }
}

impl<'tree, K, T, MAX> Iterator for Handles<'tree, K, T, MAX>
    where K: MbrLeafGeometry,
          MAX: ArrayLength,
{
    type Item = (EntryHandle, &'tree K, &'tree T);

    fn next(&mut self) -> Option<(EntryHandle, &'tree K, &'tree T)> {
        let leaf = self.cursor.next_leaf()?;
        Some((self.cursor.handle(self.stamp), &leaf.geometry, &leaf.item))
    }
}

/// Iterate every node at a given depth, the root being depth 0
pub struct LevelIter<'tree, K, T, MAX>
    where K: MbrLeafGeometry,
          MAX: ArrayLength,
{
    level: usize,
    stack: Vec<(&'tree MbrNode<K, T, MAX>, usize)>,
}

impl<'tree, K, T, MAX> LevelIter<'tree, K, T, MAX>
    where K: MbrLeafGeometry,
          MAX: ArrayLength,
{
    pub(crate) fn new(root: &'tree MbrNode<K, T, MAX>, level: usize) -> LevelIter<'tree, K, T, MAX> {
        LevelIter { level, stack: vec![(root, 0)] }
    }
}

impl<'tree, K, T, MAX> Iterator for LevelIter<'tree, K, T, MAX>
    where K: MbrLeafGeometry,
          MAX: ArrayLength,
{
    type Item = &'tree MbrNode<K, T, MAX>;

    fn next(&mut self) -> Option<&'tree MbrNode<K, T, MAX>> {
        while let Some((node, depth)) = self.stack.pop() {
            if depth == self.level {
                return Some(node);
            }
            if let MbrNode::Level { ref children } = *node {
                for entry in children.iter().rev() {
                    self.stack.push((&*entry.child, depth + 1));
                }
            }
        }
        None
    }
}
