// Copyright 2016 spatial-rs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Guttman R-tree insertion and condense-and-reinsert removal

use crate::geometry::Mbr;
use crate::staticvec::StaticVec;
use crate::tree::mbr::index::{IndexSplit, Reinsert, AT_ROOT, NOT_AT_ROOT};
use crate::tree::mbr::{LevelEntry, MbrEntry, MbrLeaf, MbrLeafGeometry, MbrNode, MbrQuery};
use generic_array::ArrayLength;
use itertools::Itertools;
use std::cmp::Ordering;
use std::mem;

/// Insertion and removal for a tree whose nodes are divided by `S`
#[derive(Debug, Clone)]
pub struct RIndex<S> {
    split: S,
    min: usize,
}

impl<S: IndexSplit> RIndex<S> {
    pub fn new(split: S, min: usize) -> RIndex<S> {
        assert!(min > 0, "min({:?}) must be at least 1.", min);
        RIndex { split, min }
    }

    /// Minimum fan-out of every non-root node
    pub fn min(&self) -> usize {
        self.min
    }

    /// Push `entry`, or split when `children` is already full. Returns the split-off group
    fn push_or_split<E, N>(&self, children: &mut StaticVec<E, N>, entry: E) -> Option<StaticVec<E, N>>
        where E: MbrLeafGeometry,
              N: ArrayLength,
    {
        if children.is_full() {
            Some(self.split.split(children, entry, self.min))
        } else {
            children.push(entry);
            None
        }
    }

    /// Child needing the least enlargement to hold `mbr`. Ties go to the smaller resulting
    /// area, then the child with fewer entries, then the nearer center.
    fn choose_subtree<K, T, MAX>(&self, children: &StaticVec<LevelEntry<K, T, MAX>, MAX>, mbr: &K::Mbr) -> usize
        where K: MbrLeafGeometry,
              MAX: ArrayLength,
    {
        children
            .iter()
            .map(|entry| {
                let area = entry.mbr.merge(mbr).area();
                (area - entry.mbr.area(), area, entry.child.len(), entry.mbr.distance_center(mbr))
            })
            .position_min_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal))
            .unwrap_or(0)
    }

    /// Insert `item` into the subtree rooted at `node`, whose height is `height`.
    /// Returns the new sibling of `node` if it had to be split.
    fn insert_into_node<K, T, MAX>(&self,
                                   node: &mut MbrNode<K, T, MAX>,
                                   height: usize,
                                   item: Reinsert<K, T, MAX>)
                                   -> Option<MbrNode<K, T, MAX>>
        where K: MbrLeafGeometry,
              MAX: ArrayLength,
    {
        debug_assert!(item.target_height() <= height,
                      "entry for height {} cannot be placed under height {}",
                      item.target_height(),
                      height);
        match (node, item) {
            //I2
            (&mut MbrNode::Leaves { ref mut children }, Reinsert::Leaf(leaf)) => {
                self.push_or_split(children, leaf).map(|children| MbrNode::Leaves { children })
            }
            (&mut MbrNode::Level { ref mut children }, Reinsert::Level { entry, height: child_height })
                if child_height + 1 == height => {
                self.push_or_split(children, entry).map(|children| MbrNode::Level { children })
            }
            //CL3
            (&mut MbrNode::Level { ref mut children }, item) => {
                let mbr = item.mbr();
                let index = self.choose_subtree(children, &mbr);
                let sibling = {
                    let entry = &mut children[index];
                    let sibling = self.insert_into_node(&mut entry.child, height - 1, item);
                    //AT3
                    entry.mbr = match sibling {
                        None => entry.mbr.merge(&mbr),
                        Some(_) => entry.child.tight_mbr(),
                    };
                    sibling
                };
                //AT4
                sibling.and_then(|sibling| {
                    self.push_or_split(children, MbrEntry::from_node(sibling))
                        .map(|children| MbrNode::Level { children })
                })
            }
            (&mut MbrNode::Leaves { .. }, Reinsert::Level { height: child_height, .. }) => {
                unreachable!("subtree of height {} reached a leaf level", child_height)
            }
        }
    }

    /// Insert `item` starting from the root, growing the tree by one level when the root splits
    pub fn insert_into_root<K, T, MAX>(&self,
                                       root: &mut MbrNode<K, T, MAX>,
                                       leaf_level: &mut usize,
                                       item: Reinsert<K, T, MAX>)
        where K: MbrLeafGeometry,
              MAX: ArrayLength,
    {
        //I1
        if let Some(sibling) = self.insert_into_node(root, *leaf_level, item) {
            //I4
            let old_root = mem::replace(root, MbrNode::new_leaves());
            let mut children = StaticVec::new();
            children.push(MbrEntry::from_node(old_root));
            children.push(MbrEntry::from_node(sibling));
            *root = MbrNode::Level { children };
            *leaf_level += 1;
            debug!("root split, leaf level is now {}", leaf_level);
        }
    }

    /// Remove the leaf at `slot` of the node reached by following `path` from `node`.
    /// Underfull nodes below the root are emptied into `orphans`.
    /// Returns the removed leaf and whether `node` should be retained by its parent.
    fn remove_from_node<K, T, MAX>(&self,
                                   node: &mut MbrNode<K, T, MAX>,
                                   height: usize,
                                   path: &[usize],
                                   slot: usize,
                                   at_root: bool,
                                   orphans: &mut Vec<Reinsert<K, T, MAX>>)
                                   -> (MbrLeaf<K, T>, bool)
        where K: MbrLeafGeometry,
              MAX: ArrayLength,
    {
        match *node {
            //D2
            MbrNode::Leaves { ref mut children } => {
                let removed = children.erase(slot);
                //CT2
                if !at_root && children.len() < self.min {
                    orphans.extend(mem::take(children).into_iter().map(Reinsert::Leaf));
                    return (removed, false);
                }
                (removed, true)
            }
            MbrNode::Level { ref mut children } => {
                let (index, rest) = match path.split_first() {
                    Some((&index, rest)) => (index, rest),
                    None => unreachable!("path ended above the leaf level"),
                };
                let (removed, retain) = {
                    let entry = &mut children[index];
                    let (removed, retain) = self.remove_from_node(&mut entry.child, height - 1, rest, slot, NOT_AT_ROOT, orphans);
                    //CT4
                    if retain {
                        entry.mbr = entry.child.tight_mbr();
                    }
                    (removed, retain)
                };
                //CT3
                if !retain {
                    children.erase(index);
                }
                if !at_root && children.len() < self.min {
                    orphans.extend(mem::take(children)
                        .into_iter()
                        .map(|entry| Reinsert::Level { entry, height: height - 1 }));
                    return (removed, false);
                }
                (removed, true)
            }
        }
    }

    /// Remove the leaf addressed by `path` and `slot`, reinsert everything orphaned by
    /// condensing, then shorten the tree while the root has a single child
    pub fn remove_from_root<K, T, MAX>(&self,
                                       root: &mut MbrNode<K, T, MAX>,
                                       leaf_level: &mut usize,
                                       path: &[usize],
                                       slot: usize)
                                       -> MbrLeaf<K, T>
        where K: MbrLeafGeometry,
              MAX: ArrayLength,
    {
        let mut orphans = Vec::new();
        let (removed, _) = self.remove_from_node(root, *leaf_level, path, slot, AT_ROOT, &mut orphans);
        self.reinsert_and_shorten(root, leaf_level, orphans);
        removed
    }

    /// Drop every leaf accepted by `query` for which `keep` returns false. `keep` sees each
    /// accepted leaf once. Underfull nodes below the root are emptied into `orphans`.
    /// Returns whether `node` should be retained by its parent.
    fn retain_in_node<K, T, MAX, F>(&self,
                                    node: &mut MbrNode<K, T, MAX>,
                                    height: usize,
                                    query: &MbrQuery<K::Mbr>,
                                    keep: &mut F,
                                    at_root: bool,
                                    removed: &mut Vec<MbrLeaf<K, T>>,
                                    orphans: &mut Vec<Reinsert<K, T, MAX>>)
                                    -> bool
        where K: MbrLeafGeometry,
              MAX: ArrayLength,
              F: FnMut(&T) -> bool,
    {
        match *node {
            MbrNode::Leaves { ref mut children } => {
                let mut index = 0;
                while index < children.len() {
                    if query.accept_leaf(&children[index]) && !keep(&children[index].item) {
                        removed.push(children.erase(index));
                    } else {
                        index += 1;
                    }
                }
                if !at_root && children.len() < self.min {
                    orphans.extend(mem::take(children).into_iter().map(Reinsert::Leaf));
                    return false;
                }
                true
            }
            MbrNode::Level { ref mut children } => {
                let mut index = 0;
                while index < children.len() {
                    let retain = {
                        let entry = &mut children[index];
                        if !query.accept_level(&entry.mbr) {
                            true
                        } else if self.retain_in_node(&mut entry.child, height - 1, query, keep, NOT_AT_ROOT, removed, orphans) {
                            entry.mbr = entry.child.tight_mbr();
                            true
                        } else {
                            false
                        }
                    };
                    if retain {
                        index += 1;
                    } else {
                        children.erase(index);
                    }
                }
                if !at_root && children.len() < self.min {
                    orphans.extend(mem::take(children)
                        .into_iter()
                        .map(|entry| Reinsert::Level { entry, height: height - 1 }));
                    return false;
                }
                true
            }
        }
    }

    /// Remove every leaf accepted by `query` that `keep` rejects, in one descent. The
    /// orphaned entries are reinserted once the descent is done.
    pub fn retain_from_root<K, T, MAX, F>(&self,
                                          root: &mut MbrNode<K, T, MAX>,
                                          leaf_level: &mut usize,
                                          query: &MbrQuery<K::Mbr>,
                                          mut keep: F)
                                          -> Vec<MbrLeaf<K, T>>
        where K: MbrLeafGeometry,
              MAX: ArrayLength,
              F: FnMut(&T) -> bool,
    {
        let mut removed = Vec::new();
        let mut orphans = Vec::new();
        self.retain_in_node(root, *leaf_level, query, &mut keep, AT_ROOT, &mut removed, &mut orphans);

        // insertion needs an empty root to hold leaves
        if root.is_empty() && root.has_levels() {
            *root = MbrNode::new_leaves();
            *leaf_level = 0;
            let mut leaves = Vec::new();
            for orphan in orphans {
                match orphan {
                    Reinsert::Leaf(_) => leaves.push(orphan),
                    Reinsert::Level { entry, .. } => collect_leaves(*entry.child, &mut leaves),
                }
            }
            orphans = leaves;
        }
        if !removed.is_empty() {
            debug!("removed {} entries matching {:?}", removed.len(), query);
        }
        self.reinsert_and_shorten(root, leaf_level, orphans);
        removed
    }

    /// Reinsert everything orphaned by condensing, then shorten the tree while the root has
    /// a single child
    fn reinsert_and_shorten<K, T, MAX>(&self,
                                       root: &mut MbrNode<K, T, MAX>,
                                       leaf_level: &mut usize,
                                       orphans: Vec<Reinsert<K, T, MAX>>)
        where K: MbrLeafGeometry,
              MAX: ArrayLength,
    {
        //CT6
        if !orphans.is_empty() {
            debug!("condensed tree, reinserting {} orphaned entries", orphans.len());
        }
        for orphan in orphans {
            self.insert_into_root(root, leaf_level, orphan);
        }

        //D4
        loop {
            let only_child = match *root {
                MbrNode::Level { ref mut children } if children.len() == 1 => children.pop(),
                _ => None,
            };
            match only_child {
                Some(entry) => {
                    *root = *entry.child;
                    *leaf_level -= 1;
                    debug!("root collapsed, leaf level is now {}", leaf_level);
                }
                None => break,
            }
        }
    }
}

/// Move every stored entry below `node` into `leaves`
fn collect_leaves<K, T, MAX>(node: MbrNode<K, T, MAX>, leaves: &mut Vec<Reinsert<K, T, MAX>>)
    where K: MbrLeafGeometry,
          MAX: ArrayLength,
{
    match node {
        MbrNode::Leaves { children } => leaves.extend(children.into_iter().map(Reinsert::Leaf)),
        MbrNode::Level { children } => {
            for entry in children {
                collect_leaves(*entry.child, leaves);
            }
        }
    }
}
