// Copyright 2016 spatial-rs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! An in-memory, N-dimensional R-tree.
//!
//! Entries are `(geometry, item)` pairs. Geometry can be a `Rect`, an `Interval`, a `Point`
//! or a bare scalar; the tree bounds it with the matching region type and keeps every
//! internal region tight. Overflowing nodes are divided with Guttman's quadratic split and
//! underfull nodes left behind by a removal are detached and their entries reinserted.
//!
//! Fan-out is fixed at compile time with `typenum` unsigneds:
//!
//! ```
//! use quadratic_rtree::{Interval, RQuadratic};
//! use typenum::{U2, U4};
//!
//! let mut tree = RQuadratic::<Interval<i32>, &str, U2, U4>::new();
//! tree.insert(Interval::new(0, 1), "a");
//! tree.insert(Interval::new(5, 6), "b");
//!
//! let mut found = Vec::new();
//! tree.search_overlap(&Interval::new(1, 2), |_, item| {
//!     found.push(*item);
//!     false
//! });
//! assert_eq!(vec!["a"], found);
//! ```

#[macro_use]
extern crate itertools;
#[macro_use]
extern crate log;

#[cfg(test)]
#[macro_use]
extern crate approx;

pub mod errors;
pub mod geometry;
pub mod staticvec;
pub mod tree;

pub use errors::{RTreeError, Result};
pub use geometry::{Interval, Mbr, Point, Rect};
pub use tree::mbr::index::quadratic::QuadraticSplit;
pub use tree::mbr::{EntryHandle, MbrLeaf, MbrLeafGeometry, MbrMap, MbrNode, MbrQuery};

use num::{Bounded, Num, Signed, ToPrimitive};
use std::fmt::Debug;
use std::marker::PhantomData;

/// Coordinate types the tree can index: signed integers and floats
pub trait Scalar: Num + Signed + Bounded + ToPrimitive + PartialOrd + Copy + Debug {}

impl<P> Scalar for P where P: Num + Signed + Bounded + ToPrimitive + PartialOrd + Copy + Debug {}

/// An R-tree using the quadratic split
pub type RTree<K, T, MIN, MAX> = MbrMap<K, T, MIN, MAX, QuadraticSplit>;

/// Convenience struct for creating a new quadratic R-tree
pub struct RQuadratic<K, T, MIN, MAX> {
    _k: PhantomData<K>,
    _t: PhantomData<T>,
    _min: PhantomData<MIN>,
    _max: PhantomData<MAX>,
}

impl<K, T, MIN, MAX> RQuadratic<K, T, MIN, MAX>
    where K: MbrLeafGeometry,
          MIN: typenum::Unsigned,
          MAX: generic_array::ArrayLength,
{
/// Create a new, empty tree. Panics unless `1 <= MIN <= MAX / 2`
    pub fn new() -> RTree<K, T, MIN, MAX> {
        MbrMap::new(QuadraticSplit)
    }
}
