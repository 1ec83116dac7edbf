// Copyright 2016 spatial-rs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use crate::errors::{RTreeError, Result};
use crate::tree::mbr::index::r::RIndex;
use crate::tree::mbr::index::{IndexSplit, Reinsert};
use crate::tree::mbr::{Handles, Iter, LevelIter, MbrLeaf, MbrLeafGeometry, MbrNode, MbrQuery};
use generic_array::ArrayLength;
use std::fmt;
use std::marker::PhantomData;
use typenum::Unsigned;

/// Opaque reference to one stored entry, obtained from `MbrMap::handles` or `MbrMap::find`.
///
/// A handle records the child index taken at every level on the way down plus the slot in
/// the leaf level. Any insert or erase invalidates every outstanding handle.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryHandle {
    pub(crate) path: Vec<usize>,
    pub(crate) slot: usize,
    pub(crate) stamp: u64,
}

/// The spatial map. Fan-out is bounded by `MIN` and `MAX`, and overflowing nodes are
/// divided by `S`.
pub struct MbrMap<K, T, MIN, MAX, S>
    where K: MbrLeafGeometry,
          MAX: ArrayLength,
{
    index: RIndex<S>,
    root: MbrNode<K, T, MAX>,
    leaf_level: usize,
    len: usize,
    stamp: u64,
    _min: PhantomData<MIN>,
}

impl<K, T, MIN, MAX, S> MbrMap<K, T, MIN, MAX, S>
    where K: MbrLeafGeometry,
          MIN: Unsigned,
          MAX: ArrayLength,
          S: IndexSplit,
{
/// Create a new MbrMap with the given split strategy.
/// Panics unless `MIN` is at least 1 and at most half of `MAX`
    pub fn new(split: S) -> MbrMap<K, T, MIN, MAX, S> {
        let min = MIN::to_usize();
        let max = MAX::to_usize();
        assert!(min > 0, "MIN({:?}) must be at least 1.", min);
        assert!(2 * min <= max, "MIN({:?}) must be no more than half of MAX({:?}).", min, max);
        MbrMap {
            index: RIndex::new(split, min),
            root: MbrNode::new_leaves(),
            leaf_level: 0,
            len: 0,
            stamp: 0,
            _min: PhantomData,
        }
    }

    fn mutated(&mut self) {
        self.stamp = self.stamp.wrapping_add(1);
    }

/// Insert an item
    pub fn insert(&mut self, geometry: K, item: T) {
        let leaf = Reinsert::Leaf(MbrLeaf::new(geometry, item));
        self.index.insert_into_root(&mut self.root, &mut self.leaf_level, leaf);
        self.len += 1;
        self.mutated();
    }

/// Remove the entry behind `handle`, returning its geometry and item.
/// Panics if the handle is stale or does not address an entry
    pub fn erase(&mut self, handle: EntryHandle) -> (K, T) {
        match self.try_erase(handle) {
            Ok(removed) => removed,
            Err(err) => panic!("cannot erase: {}", err),
        }
    }

/// Remove the entry behind `handle`, reporting stale or invalid handles instead of panicking
    pub fn try_erase(&mut self, handle: EntryHandle) -> Result<(K, T)> {
        self.resolve(&handle)?;
        let removed = self.index.remove_from_root(&mut self.root, &mut self.leaf_level, &handle.path, handle.slot);
        self.len -= 1;
        self.mutated();
        Ok(removed.extract())
    }

    fn check_stamp(&self, handle: &EntryHandle) -> Result<()> {
        if handle.stamp != self.stamp {
            return Err(RTreeError::StaleHandle { issued: handle.stamp, current: self.stamp });
        }
        Ok(())
    }

    fn invalid(handle: &EntryHandle) -> RTreeError {
        RTreeError::InvalidHandle { path: handle.path.clone(), slot: handle.slot }
    }

    fn resolve(&self, handle: &EntryHandle) -> Result<&MbrLeaf<K, T>> {
        self.check_stamp(handle)?;
        let mut node = &self.root;
        for &index in &handle.path {
            node = match *node {
                MbrNode::Level { ref children } => children.get(index)
                    .map(|entry| &*entry.child)
                    .ok_or_else(|| Self::invalid(handle))?,
                MbrNode::Leaves { .. } => return Err(Self::invalid(handle)),
            };
        }
        match *node {
            MbrNode::Leaves { ref children } => children.get(handle.slot).ok_or_else(|| Self::invalid(handle)),
            MbrNode::Level { .. } => Err(Self::invalid(handle)),
        }
    }

    fn resolve_mut(&mut self, handle: &EntryHandle) -> Result<&mut MbrLeaf<K, T>> {
        self.check_stamp(handle)?;
        let mut node = &mut self.root;
        for &index in &handle.path {
            node = match *node {
                MbrNode::Level { ref mut children } => children.get_mut(index)
                    .map(|entry| &mut *entry.child)
                    .ok_or_else(|| Self::invalid(handle))?,
                MbrNode::Leaves { .. } => return Err(Self::invalid(handle)),
            };
        }
        match *node {
            MbrNode::Leaves { ref mut children } => children.get_mut(handle.slot).ok_or_else(|| Self::invalid(handle)),
            MbrNode::Level { .. } => Err(Self::invalid(handle)),
        }
    }

/// Borrow the entry behind `handle`. `None` if the handle is stale or invalid
    pub fn get(&self, handle: &EntryHandle) -> Option<(&K, &T)> {
        self.resolve(handle).ok().map(MbrLeaf::as_tuple)
    }

/// Mutably borrow the item behind `handle`. Editing the item does not invalidate handles
    pub fn get_mut(&mut self, handle: &EntryHandle) -> Option<(&K, &mut T)> {
        self.resolve_mut(handle).ok().map(MbrLeaf::as_mut_tuple)
    }

/// Handle of the first entry whose geometry has exactly the bounds of `geometry` and whose
/// item satisfies `pred`
    pub fn find<F: FnMut(&T) -> bool>(&self, geometry: &K, mut pred: F) -> Option<EntryHandle> {
        self.handles_query(MbrQuery::Exact(geometry.mbr()))
            .find(|&(_, _, item)| pred(item))
            .map(|(handle, _, _)| handle)
    }

/// Remove one entry matching both `geometry` and `item`
    pub fn remove_entry(&mut self, geometry: &K, item: &T) -> Option<(K, T)>
        where T: PartialEq
    {
        self.find(geometry, |stored| stored == item).map(|handle| self.erase(handle))
    }

/// Remove all items whose geometry is accepted by the query. Returns removed entries.
    pub fn remove(&mut self, query: MbrQuery<K::Mbr>) -> Vec<(K, T)> {
        self.retain(query, |_| false)
    }

/// Remove all items whose geometry is accepted by the query and where `keep` returns false.
/// Returns removed entries. `keep` is called once for every accepted item
    pub fn retain<F: FnMut(&T) -> bool>(&mut self, query: MbrQuery<K::Mbr>, keep: F) -> Vec<(K, T)> {
        let removed = self.index.retain_from_root(&mut self.root, &mut self.leaf_level, &query, keep);
        if !removed.is_empty() {
            self.len -= removed.len();
            self.mutated();
        }
        removed.into_iter().map(MbrLeaf::extract).collect()
    }

/// Visit every entry overlapping `mbr` until `visit` returns true. Returns whether the
/// search was stopped early
    pub fn search_overlap<F>(&self, mbr: &K::Mbr, visit: F) -> bool
        where F: FnMut(&K, &T) -> bool
    {
        self.search(MbrQuery::Overlaps(mbr.clone()), visit)
    }

/// Visit every entry accepted by `query` until `visit` returns true. Returns whether the
/// search was stopped early
    pub fn search<F>(&self, query: MbrQuery<K::Mbr>, mut visit: F) -> bool
        where F: FnMut(&K, &T) -> bool
    {
        self.iter_query(query).any(|(geometry, item)| visit(geometry, item))
    }

/// Whether the map is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

/// Length of the map
    pub fn len(&self) -> usize {
        self.len
    }

/// Clear the map
    pub fn clear(&mut self) {
        self.root = MbrNode::new_leaves();
        self.leaf_level = 0;
        self.len = 0;
        self.mutated();
    }

/// Depth of the leaf level. The root is depth 0
    pub fn leaf_level(&self) -> usize {
        self.leaf_level
    }

/// Borrow the root node
    pub fn root(&self) -> &MbrNode<K, T, MAX> {
        &self.root
    }

/// Iter for the map
    pub fn iter(&self) -> Iter<K, T, MAX> {
        Iter::new(&self.root, None)
    }

/// Iter for the map with a given query
    pub fn iter_query(&self, query: MbrQuery<K::Mbr>) -> Iter<K, T, MAX> {
        Iter::new(&self.root, Some(query))
    }

/// Every entry with a handle usable by `erase`
    pub fn handles(&self) -> Handles<K, T, MAX> {
        Handles::new(&self.root, None, self.stamp)
    }

/// Entries accepted by the query, each with a handle usable by `erase`
    pub fn handles_query(&self, query: MbrQuery<K::Mbr>) -> Handles<K, T, MAX> {
        Handles::new(&self.root, Some(query), self.stamp)
    }

/// Every node at depth `level`
    pub fn level_iter(&self, level: usize) -> LevelIter<K, T, MAX> {
        LevelIter::new(&self.root, level)
    }

/// Every node holding stored entries
    pub fn leaf_iter(&self) -> LevelIter<K, T, MAX> {
        self.level_iter(self.leaf_level)
    }

/// Check balance, fan-out, bound tightness and the entry count
    pub fn validate(&self) -> Result<()> {
        let mut found = 0;
        self.validate_node(&self.root, 0, &mut found)?;
        if found != self.len {
            return Err(RTreeError::CountMismatch { expected: self.len, found });
        }
        Ok(())
    }

    fn validate_node(&self, node: &MbrNode<K, T, MAX>, depth: usize, found: &mut usize) -> Result<()> {
        let (min, max) = (self.index.min(), MAX::to_usize());
        if depth > 0 && (node.len() < min || node.len() > max) {
            return Err(RTreeError::FanOut { depth, len: node.len(), min, max });
        }
        match *node {
            MbrNode::Leaves { ref children } => {
                if depth != self.leaf_level {
                    return Err(RTreeError::Unbalanced { depth, leaf_level: self.leaf_level });
                }
                *found += children.len();
            }
            MbrNode::Level { ref children } => {
                if depth >= self.leaf_level {
                    return Err(RTreeError::Unbalanced { depth, leaf_level: self.leaf_level });
                }
                for entry in children.iter() {
                    if entry.child.mbr().as_ref() != Some(&entry.mbr) {
                        return Err(RTreeError::LooseBound { depth });
                    }
                    self.validate_node(&entry.child, depth + 1, found)?;
                }
            }
        }
        Ok(())
    }
}

impl<K, T, MIN, MAX, S> Default for MbrMap<K, T, MIN, MAX, S>
    where K: MbrLeafGeometry,
          MIN: Unsigned,
          MAX: ArrayLength,
          S: IndexSplit + Default,
{
    fn default() -> MbrMap<K, T, MIN, MAX, S> {
        MbrMap::new(S::default())
    }
}

impl<K, T, MIN, MAX, S> Clone for MbrMap<K, T, MIN, MAX, S>
    where K: MbrLeafGeometry + Clone,
          T: Clone,
          MAX: ArrayLength + Clone,
          S: Clone,
{
    fn clone(&self) -> MbrMap<K, T, MIN, MAX, S> {
        MbrMap {
            index: self.index.clone(),
            root: self.root.clone(),
            leaf_level: self.leaf_level,
            len: self.len,
            stamp: self.stamp,
            _min: PhantomData,
        }
    }
}

impl<K, T, MIN, MAX, S> fmt::Debug for MbrMap<K, T, MIN, MAX, S>
    where K: MbrLeafGeometry + fmt::Debug,
          T: fmt::Debug,
          MAX: ArrayLength + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("MbrMap")
            .field("len", &self.len)
            .field("leaf_level", &self.leaf_level)
            .field("root", &self.root)
            .finish()
    }
}

impl<K, T, MIN, MAX, S> Extend<(K, T)> for MbrMap<K, T, MIN, MAX, S>
    where K: MbrLeafGeometry,
          MIN: Unsigned,
          MAX: ArrayLength,
          S: IndexSplit,
{
    fn extend<I: IntoIterator<Item = (K, T)>>(&mut self, iter: I) {
        for (geometry, item) in iter {
            self.insert(geometry, item);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Interval, Rect};
    use crate::tree::mbr::index::quadratic::QuadraticSplit;
    use typenum::{U2, U4};

    type Map = MbrMap<Interval<i32>, &'static str, U2, U4, QuadraticSplit>;

    fn five() -> Map {
        let mut map = Map::default();
        map.extend(vec![
            (Interval::new(0, 1), "a"),
            (Interval::new(2, 3), "b"),
            (Interval::new(4, 5), "c"),
            (Interval::new(6, 7), "d"),
            (Interval::new(8, 9), "e"),
        ]);
        map
    }

    #[test]
    fn handles_resolve_until_mutation() {
        let mut map = five();
        let (handle, _, _) = map.handles().find(|&(_, _, item)| *item == "c").expect("c is stored");
        assert_eq!(Some((&Interval::new(4, 5), &"c")), map.get(&handle));

        if let Some((_, item)) = map.get_mut(&handle) {
            *item = "C";
        }
        assert_eq!(Some((&Interval::new(4, 5), &"C")), map.get(&handle));

        map.insert(Interval::new(10, 11), "f");
        assert_eq!(None, map.get(&handle));
        assert_eq!(Err(RTreeError::StaleHandle { issued: handle.stamp, current: map.stamp }),
                   map.try_erase(handle).map(|_| ()));
    }

    #[test]
    fn invalid_handle_is_reported() {
        let mut map = five();
        let handle = EntryHandle { path: vec![7], slot: 0, stamp: map.stamp };
        assert_eq!(Err(RTreeError::InvalidHandle { path: vec![7], slot: 0 }),
                   map.try_erase(handle.clone()).map(|_| ()));
        assert_eq!(5, map.len());
    }

    #[test]
    #[should_panic]
    fn erase_twice_panics() {
        let mut map = five();
        let handle = map.find(&Interval::new(0, 1), |_| true).expect("stored");
        map.erase(handle.clone());
        map.erase(handle);
    }

    #[test]
    fn find_and_remove_by_value() {
        let mut map = five();
        map.insert(Interval::new(2, 3), "b2");
        assert!(map.find(&Interval::new(2, 4), |_| true).is_none());
        assert_eq!(Some((Interval::new(2, 3), "b2")), map.remove_entry(&Interval::new(2, 3), &"b2"));
        assert_eq!(None, map.remove_entry(&Interval::new(2, 3), &"b2"));
        assert_eq!(5, map.len());
        assert!(map.validate().is_ok());
    }

    #[test]
    fn search_stops_early() {
        let map = five();
        let mut visited = 0;
        let stopped = map.search_overlap(&Interval::new(0, 9), |_, _| {
            visited += 1;
            visited == 2
        });
        assert!(stopped);
        assert_eq!(2, visited);
        assert!(!map.search_overlap(&Interval::new(20, 30), |_, _| true));
    }

    #[test]
    fn levels_and_leaves() {
        let map = five();
        assert_eq!(1, map.leaf_level());
        assert_eq!(1, map.level_iter(0).count());
        let leaves: Vec<_> = map.leaf_iter().collect();
        assert_eq!(2, leaves.len());
        assert!(leaves.iter().all(|node| node.has_leaves()));
        assert_eq!(5, leaves.iter().map(|node| node.len()).sum::<usize>());
        assert_eq!(0, map.level_iter(2).count());
    }

    #[test]
    fn clear_and_clone() {
        let mut map = five();
        let copy = map.clone();
        map.clear();
        assert!(map.is_empty());
        assert_eq!(0, map.leaf_level());
        assert_eq!(5, copy.len());
        assert_eq!(5, copy.iter().count());
        assert!(copy.validate().is_ok());
    }

    #[test]
    fn retain_asks_once_per_entry() {
        let mut map: MbrMap<Interval<i32>, i32, U2, U4, QuadraticSplit> = MbrMap::default();
        for i in 0..200 {
            map.insert(Interval::new(i, i), i);
        }
        let mut calls = 0;
        let removed = map.retain(MbrQuery::Overlaps(Interval::new(0, 1000)), |item| {
            calls += 1;
            item % 2 == 0
        });
        assert_eq!(200, calls);
        assert_eq!(100, removed.len());
        assert!(removed.iter().all(|&(_, item)| item % 2 == 1));
        assert_eq!(100, map.len());
        assert!(map.iter().all(|(_, item)| item % 2 == 0));
        assert!(map.validate().is_ok());
    }

    #[test]
    fn retain_with_stateful_predicate() {
        let mut map: MbrMap<Interval<i32>, i32, U2, U4, QuadraticSplit> = MbrMap::default();
        for i in 0..20 {
            map.insert(Interval::new(i, i + 1), i);
        }
        let mut seen = 0;
        let removed = map.retain(MbrQuery::Overlaps(Interval::new(-5, 50)), |_| {
            seen += 1;
            seen <= 5
        });
        assert_eq!(15, removed.len());
        assert_eq!(5, map.len());
        assert!(map.validate().is_ok());
    }

    #[test]
    fn retain_only_visits_accepted_entries() {
        let mut map: MbrMap<Interval<i32>, i32, U2, U4, QuadraticSplit> = MbrMap::default();
        for i in 0..50 {
            map.insert(Interval::new(i * 10, i * 10 + 1), i);
        }
        let mut calls = 0;
        let removed = map.retain(MbrQuery::ContainedBy(Interval::new(95, 200)), |_| {
            calls += 1;
            false
        });
        assert_eq!(10, calls);
        let mut items: Vec<i32> = removed.into_iter().map(|(_, item)| item).collect();
        items.sort();
        assert_eq!((10..20).collect::<Vec<_>>(), items);
        assert_eq!(40, map.len());
        assert!(map.validate().is_ok());
    }

    #[test]
    fn retain_everything_removed_resets_root() {
        let mut map = five();
        let handle = map.find(&Interval::new(0, 1), |_| true).expect("stored");
        let removed = map.remove(MbrQuery::Overlaps(Interval::new(0, 9)));
        assert_eq!(5, removed.len());
        assert!(map.is_empty());
        assert_eq!(0, map.leaf_level());
        assert!(map.root().has_leaves());
        assert_eq!(None, map.get(&handle));
        assert!(map.validate().is_ok());

        // nothing matched, so handles stay valid
        map.insert(Interval::new(3, 4), "x");
        let handle = map.find(&Interval::new(3, 4), |_| true).expect("stored");
        assert!(map.remove(MbrQuery::Overlaps(Interval::new(10, 20))).is_empty());
        assert_eq!(Some((&Interval::new(3, 4), &"x")), map.get(&handle));
    }

    #[test]
    fn validate_reports_broken_bounds() {
        let mut map: MbrMap<Rect<i32, 2>, u32, U2, U4, QuadraticSplit> = MbrMap::new(QuadraticSplit);
        for i in 0..9 {
            map.insert(Rect::new([i, i], [i + 1, i + 1]), i as u32);
        }
        assert!(map.validate().is_ok());
        if let MbrNode::Level { ref mut children } = map.root {
            children[0].mbr = Rect::new([-50, -50], [50, 50]);
        }
        assert_eq!(Err(RTreeError::LooseBound { depth: 0 }), map.validate());
        map.clear();
        assert!(map.validate().is_ok());
        map.len = 3;
        assert_eq!(Err(RTreeError::CountMismatch { expected: 3, found: 0 }), map.validate());
    }
}
