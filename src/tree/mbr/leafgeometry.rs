// Copyright 2016 spatial-rs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use crate::geometry::{Interval, Mbr, Point, Rect};
use crate::Scalar;

/// The minimum functionality required to insert leaf geometry into `MbrMap`.
///
/// Leaf geometry does not have to be a region itself. It only has to name the region type
/// that bounds it and produce its tight bound; points and bare scalars are stored this way.
pub trait MbrLeafGeometry {
    /// Region type bounding this geometry
    type Mbr: Mbr;

    /// Tight bounding region
    fn mbr(&self) -> Self::Mbr;

    /// Determine if the leaf is completely contained in the mbr
    fn contained_by_mbr(&self, mbr: &Self::Mbr) -> bool {
        mbr.contains(&self.mbr())
    }

    /// Determine if the leaf overlaps the mbr
    fn overlapped_by_mbr(&self, mbr: &Self::Mbr) -> bool {
        mbr.overlaps(&self.mbr())
    }

    /// The mbr minimally expanded to fit the leaf
    fn expand_mbr_to_fit(&self, mbr: &Self::Mbr) -> Self::Mbr {
        mbr.merge(&self.mbr())
    }
}

impl<P: Scalar, const DIM: usize> MbrLeafGeometry for Rect<P, DIM> {
    type Mbr = Rect<P, DIM>;

    fn mbr(&self) -> Rect<P, DIM> {
        *self
    }
}

impl<P: Scalar> MbrLeafGeometry for Interval<P> {
    type Mbr = Interval<P>;

    fn mbr(&self) -> Interval<P> {
        *self
    }
}

impl<P: Scalar, const DIM: usize> MbrLeafGeometry for Point<P, DIM> {
    type Mbr = Rect<P, DIM>;

    fn mbr(&self) -> Rect<P, DIM> {
        Rect::from_point(self)
    }

    fn contained_by_mbr(&self, mbr: &Rect<P, DIM>) -> bool {
        mbr.contains_point(self)
    }

    fn overlapped_by_mbr(&self, mbr: &Rect<P, DIM>) -> bool {
        mbr.overlaps_point(self)
    }

    fn expand_mbr_to_fit(&self, mbr: &Rect<P, DIM>) -> Rect<P, DIM> {
        mbr.merge_point(self)
    }
}

macro_rules! scalar_leaf_geometry {
    ($($t:ty),*) => {
        $(
            impl MbrLeafGeometry for $t {
                type Mbr = Interval<$t>;

                fn mbr(&self) -> Interval<$t> {
                    Interval::from_point(*self)
                }

                fn contained_by_mbr(&self, mbr: &Interval<$t>) -> bool {
                    mbr.contains_point(self)
                }

                fn overlapped_by_mbr(&self, mbr: &Interval<$t>) -> bool {
                    mbr.overlaps_point(self)
                }

                fn expand_mbr_to_fit(&self, mbr: &Interval<$t>) -> Interval<$t> {
                    mbr.merge_point(self)
                }
            }
        )*
    };
}

scalar_leaf_geometry!(f32, f64, i8, i16, i32, i64, i128, isize);

/// Tight bound of a collection of leaf geometries. `None` when the collection is empty
pub fn mbr_of<'a, G, I>(geometries: I) -> Option<G::Mbr>
    where G: MbrLeafGeometry + 'a,
          I: IntoIterator<Item = &'a G>,
{
    geometries.into_iter().fold(None, |mbr, geometry| match mbr {
        None => Some(geometry.mbr()),
        Some(mbr) => Some(geometry.expand_mbr_to_fit(&mbr)),
    })
}
