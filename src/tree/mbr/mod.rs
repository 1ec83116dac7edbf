// Copyright 2016 spatial-rs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Minimum bounding region trees

pub mod index;
mod iter;
mod leaf;
mod leafgeometry;
mod map;
mod node;
mod query;

pub use self::iter::{Handles, Iter, LevelIter};
pub use self::leaf::MbrLeaf;
pub use self::leafgeometry::{mbr_of, MbrLeafGeometry};
pub use self::map::{EntryHandle, MbrMap};
pub use self::node::{LevelEntry, MbrEntry, MbrNode};
pub use self::query::MbrQuery;
