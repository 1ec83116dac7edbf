// Copyright 2016 spatial-rs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use crate::geometry::Mbr;
use crate::tree::mbr::MbrLeafGeometry;

/// Region based query for navigating the tree
#[derive(Debug, Clone, PartialEq)]
pub enum MbrQuery<B> {
    /// Matching leaves are ones that are completely contained by this region
    ContainedBy(B),
    /// Matching leaves are ones that overlap this region
    Overlaps(B),
    /// Matching leaves are ones bounded by exactly this region
    Exact(B),
}

impl<B: Mbr> MbrQuery<B> {
/// Does this query accept the given leaf?
    pub fn accept_leaf<G: MbrLeafGeometry<Mbr = B>>(&self, leaf: &G) -> bool {
        match *self {
            MbrQuery::ContainedBy(ref query) => leaf.contained_by_mbr(query),
            MbrQuery::Overlaps(ref query) => leaf.overlapped_by_mbr(query),
            MbrQuery::Exact(ref query) => leaf.mbr() == *query,
        }
    }

/// Could a level bounded by `mbr` hold an accepted leaf?
    pub fn accept_level(&self, mbr: &B) -> bool {
        match *self {
            MbrQuery::ContainedBy(ref query) => mbr.overlaps(query),
            MbrQuery::Overlaps(ref query) => mbr.overlaps(query),
            MbrQuery::Exact(ref query) => mbr.contains(query),
        }
    }
}
