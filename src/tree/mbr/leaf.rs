// Copyright 2016 spatial-rs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use crate::tree::mbr::MbrLeafGeometry;

/// A tree leaf
#[derive(Debug, Clone, PartialEq)]
pub struct MbrLeaf<K, T> {
    pub geometry: K,
    pub item: T,
}

impl<K: MbrLeafGeometry, T> MbrLeaf<K, T> {
/// New leaf from geometry and item
    pub fn new(geometry: K, item: T) -> MbrLeaf<K, T> {
        MbrLeaf { geometry, item }
    }

/// Consumes self, returning the geometry and item
    pub fn extract(self) -> (K, T) {
        (self.geometry, self.item)
    }

    pub fn as_tuple(&self) -> (&K, &T) {
        (&self.geometry, &self.item)
    }

    pub fn as_mut_tuple(&mut self) -> (&K, &mut T) {
        (&self.geometry, &mut self.item)
    }
}

impl<K: MbrLeafGeometry, T> MbrLeafGeometry for MbrLeaf<K, T> {
    type Mbr = K::Mbr;

    fn mbr(&self) -> K::Mbr {
        self.geometry.mbr()
    }

    fn contained_by_mbr(&self, mbr: &K::Mbr) -> bool {
        self.geometry.contained_by_mbr(mbr)
    }

    fn overlapped_by_mbr(&self, mbr: &K::Mbr) -> bool {
        self.geometry.overlapped_by_mbr(mbr)
    }

    fn expand_mbr_to_fit(&self, mbr: &K::Mbr) -> K::Mbr {
        self.geometry.expand_mbr_to_fit(mbr)
    }
}
