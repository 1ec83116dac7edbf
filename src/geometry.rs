// Copyright 2016 spatial-rs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Points and axis-aligned bounding regions, plus the region algebra the tree is built on

use num::ToPrimitive;
use std::cmp::Ordering;
use std::fmt::Debug;
use std::ops::{Deref, DerefMut};
use crate::Scalar;

/// The smaller of two scalars. `a` wins ties.
#[inline]
pub fn min_of<P: PartialOrd>(a: P, b: P) -> P {
    if b < a {
        b
    } else {
        a
    }
}

/// A scalar as `f64` for the area heuristics. Every primitive `Scalar` converts.
#[inline]
pub fn widen<P: Scalar>(value: P) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

/// The larger of two scalars. `a` wins ties.
#[inline]
pub fn max_of<P: PartialOrd>(a: P, b: P) -> P {
    if b > a {
        b
    } else {
        a
    }
}

/// An n-dimensional point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point<P, const DIM: usize> {
    pub coords: [P; DIM],
}

impl<P: Scalar, const DIM: usize> Point<P, DIM> {
    /// New Point from an array of coordinates
    pub fn new(coords: [P; DIM]) -> Point<P, DIM> {
        Point { coords }
    }

    /// New Point from a slice. The slice length must match `DIM`
    pub fn from_slice(slice: &[P]) -> Point<P, DIM> {
        let coords: [P; DIM] = slice.try_into().unwrap_or_else(|_| {
            panic!("slice length {} does not match dimension {}", slice.len(), DIM)
        });
        Point { coords }
    }
}

impl<P, const DIM: usize> Deref for Point<P, DIM> {
    type Target = [P];

    fn deref(&self) -> &[P] {
        &self.coords
    }
}

impl<P, const DIM: usize> DerefMut for Point<P, DIM> {
    fn deref_mut(&mut self) -> &mut [P] {
        &mut self.coords
    }
}

impl<P, const DIM: usize> AsRef<[P]> for Point<P, DIM> {
    fn as_ref(&self) -> &[P] {
        self.deref()
    }
}

impl<P, const DIM: usize> AsMut<[P]> for Point<P, DIM> {
    fn as_mut(&mut self) -> &mut [P] {
        self.deref_mut()
    }
}

/// Product order: `a <= b` only when every coordinate of `a` is `<=` the matching one in `b`.
/// Points that disagree across axes are incomparable.
impl<P: PartialOrd, const DIM: usize> PartialOrd for Point<P, DIM> {
    fn partial_cmp(&self, other: &Point<P, DIM>) -> Option<Ordering> {
        let mut ord = Ordering::Equal;
        for (a, b) in izip!(self.coords.iter(), other.coords.iter()) {
            match (ord, a.partial_cmp(b)?) {
                (_, Ordering::Equal) => {}
                (Ordering::Equal, axis) => ord = axis,
                (so_far, axis) if so_far == axis => {}
                _ => return None,
            }
        }
        Some(ord)
    }
}

/// Operations every bounding region supports. The tree is written against this trait only,
/// so the same insert, split and search code serves 1-D intervals and N-D boxes.
///
/// All operations are pure; regions are never edited in place by the tree.
pub trait Mbr: Clone + PartialEq + Debug {
    /// Coordinate type
    type Scalar: Scalar;
    /// Point type the region is made of
    type Point: Clone + Debug;

    /// Number of axes
    fn dim(&self) -> usize;

    /// Lower bound on `axis`
    fn min_for_axis(&self, axis: usize) -> Self::Scalar;

    /// Upper bound on `axis`
    fn max_for_axis(&self, axis: usize) -> Self::Scalar;

    /// Degenerate region covering a single point
    fn from_point(point: &Self::Point) -> Self;

    /// Is the point inside (or on the boundary of) the region?
    fn contains_point(&self, point: &Self::Point) -> bool;

    /// Smallest region holding both `self` and `other`
    fn merge(&self, other: &Self) -> Self;

    /// Axis-wise `(max(min1, min2), max(that, min(max1, max2)))`.
    ///
    /// Disjoint inputs produce a zero-width slice on the offending axes rather than an
    /// error, so a result does not imply the inputs overlap.
    fn intersection(&self, other: &Self) -> Self;

    /// Points are inside a region exactly when they overlap it
    fn overlaps_point(&self, point: &Self::Point) -> bool {
        self.contains_point(point)
    }

    /// Smallest region holding both `self` and `point`
    fn merge_point(&self, point: &Self::Point) -> Self {
        self.merge(&Self::from_point(point))
    }

    /// Is `other` fully inside `self`?
    fn contains(&self, other: &Self) -> bool {
        (0..self.dim()).all(|axis| {
            self.min_for_axis(axis) <= other.min_for_axis(axis)
                && self.max_for_axis(axis) >= other.max_for_axis(axis)
        })
    }

    /// Do the regions share any space? Touching boundaries count.
    fn overlaps(&self, other: &Self) -> bool {
        (0..self.dim()).all(|axis| {
            !(self.min_for_axis(axis) > other.max_for_axis(axis)
                || other.min_for_axis(axis) > self.max_for_axis(axis))
        })
    }

    /// Length of the region along `axis`, widened so integer extents cannot overflow
    fn extent(&self, axis: usize) -> f64 {
        widen(self.max_for_axis(axis)) - widen(self.min_for_axis(axis))
    }

    /// Product of the per-axis extents
    fn area(&self) -> f64 {
        (0..self.dim()).map(|axis| self.extent(axis)).product()
    }

    /// Sum of the per-axis extents
    fn margin(&self) -> f64 {
        (0..self.dim()).map(|axis| self.extent(axis)).sum()
    }

    /// Squared distance between the two centers, scaled by 4 so no division is needed
    fn distance_center(&self, other: &Self) -> f64 {
        (0..self.dim())
            .map(|axis| {
                let d = widen(self.min_for_axis(axis)) + widen(self.max_for_axis(axis))
                    - widen(other.min_for_axis(axis))
                    - widen(other.max_for_axis(axis));
                d * d
            })
            .sum()
    }
}

/// An n-dimensional axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect<P, const DIM: usize> {
    pub min: Point<P, DIM>,
    pub max: Point<P, DIM>,
}

impl<P: Scalar, const DIM: usize> Rect<P, DIM> {
    /// New Rect from its minimum and maximum corners. Panics if `min > max` on any axis
    pub fn new(min: [P; DIM], max: [P; DIM]) -> Rect<P, DIM> {
        for (axis, (lo, hi)) in izip!(min.iter(), max.iter()).enumerate() {
            assert!(
                lo <= hi,
                "min({:?}) must not exceed max({:?}) on axis {}",
                lo,
                hi,
                axis
            );
        }
        Rect {
            min: Point::new(min),
            max: Point::new(max),
        }
    }

    /// New Rect from any two opposite corners
    pub fn from_corners(x: [P; DIM], y: [P; DIM]) -> Rect<P, DIM> {
        let mut min = x;
        let mut max = y;
        for axis in 0..DIM {
            match x[axis].partial_cmp(&y[axis]) {
                Some(Ordering::Greater) => {
                    min[axis] = y[axis];
                    max[axis] = x[axis];
                }
                Some(_) => {}
                None => panic!("corners {:?} and {:?} are not comparable on axis {}", x[axis], y[axis], axis),
            }
        }
        Rect {
            min: Point::new(min),
            max: Point::new(max),
        }
    }

    /// Degenerate Rect covering a single point
    pub fn from_point(point: &Point<P, DIM>) -> Rect<P, DIM> {
        Rect::new(point.coords, point.coords)
    }
}

impl<P: Scalar, const DIM: usize> Mbr for Rect<P, DIM> {
    type Scalar = P;
    type Point = Point<P, DIM>;

    fn dim(&self) -> usize {
        DIM
    }

    fn min_for_axis(&self, axis: usize) -> P {
        self.min[axis]
    }

    fn max_for_axis(&self, axis: usize) -> P {
        self.max[axis]
    }

    fn from_point(point: &Point<P, DIM>) -> Rect<P, DIM> {
        Rect::from_point(point)
    }

    fn contains_point(&self, point: &Point<P, DIM>) -> bool {
        izip!(self.min.iter(), self.max.iter(), point.iter()).all(|(lo, hi, p)| lo <= p && p <= hi)
    }

    fn merge(&self, other: &Rect<P, DIM>) -> Rect<P, DIM> {
        let mut merged = *self;
        for (lo, hi, other_lo, other_hi) in izip!(
            merged.min.iter_mut(),
            merged.max.iter_mut(),
            other.min.iter(),
            other.max.iter()
        ) {
            *lo = min_of(*lo, *other_lo);
            *hi = max_of(*hi, *other_hi);
        }
        merged
    }

    fn merge_point(&self, point: &Point<P, DIM>) -> Rect<P, DIM> {
        let mut merged = *self;
        for (lo, hi, p) in izip!(merged.min.iter_mut(), merged.max.iter_mut(), point.iter()) {
            *lo = min_of(*lo, *p);
            *hi = max_of(*hi, *p);
        }
        merged
    }

    fn intersection(&self, other: &Rect<P, DIM>) -> Rect<P, DIM> {
        let mut clipped = *self;
        for (lo, hi, other_lo, other_hi) in izip!(
            clipped.min.iter_mut(),
            clipped.max.iter_mut(),
            other.min.iter(),
            other.max.iter()
        ) {
            *lo = max_of(*lo, *other_lo);
            *hi = max_of(*lo, min_of(*hi, *other_hi));
        }
        clipped
    }
}

/// A closed 1-D interval `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval<P> {
    pub min: P,
    pub max: P,
}

impl<P: Scalar> Interval<P> {
    /// New Interval. Panics if `min > max`
    pub fn new(min: P, max: P) -> Interval<P> {
        assert!(min <= max, "min({:?}) must not exceed max({:?})", min, max);
        Interval { min, max }
    }

    /// New Interval from two bounds in either order
    pub fn from_bounds(x: P, y: P) -> Interval<P> {
        match x.partial_cmp(&y) {
            Some(Ordering::Greater) => Interval { min: y, max: x },
            Some(_) => Interval { min: x, max: y },
            None => panic!("bounds {:?} and {:?} are not comparable", x, y),
        }
    }

    /// Degenerate Interval covering a single value
    pub fn from_point(point: P) -> Interval<P> {
        Interval::new(point, point)
    }
}

impl<P: Scalar> Mbr for Interval<P> {
    type Scalar = P;
    type Point = P;

    fn dim(&self) -> usize {
        1
    }

    fn min_for_axis(&self, axis: usize) -> P {
        debug_assert_eq!(0, axis, "an interval has a single axis");
        self.min
    }

    fn max_for_axis(&self, axis: usize) -> P {
        debug_assert_eq!(0, axis, "an interval has a single axis");
        self.max
    }

    fn from_point(point: &P) -> Interval<P> {
        Interval::from_point(*point)
    }

    fn contains_point(&self, point: &P) -> bool {
        self.min <= *point && *point <= self.max
    }

    fn merge(&self, other: &Interval<P>) -> Interval<P> {
        Interval {
            min: min_of(self.min, other.min),
            max: max_of(self.max, other.max),
        }
    }

    fn intersection(&self, other: &Interval<P>) -> Interval<P> {
        let min = max_of(self.min, other.min);
        Interval {
            min,
            max: max_of(min, min_of(self.max, other.max)),
        }
    }

    fn contains(&self, other: &Interval<P>) -> bool {
        self.min <= other.min && other.max <= self.max
    }

    fn overlaps(&self, other: &Interval<P>) -> bool {
        !(self.min > other.max || other.min > self.max)
    }

    fn area(&self) -> f64 {
        self.extent(0)
    }

    fn margin(&self) -> f64 {
        self.extent(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE: [f64; 3] = [1.0f64, 1.0f64, 1.0f64];
    const ZERO: [f64; 3] = [0.0f64, 0.0f64, 0.0f64];
    const NEG_ONE: [f64; 3] = [-1.0f64, -1.0f64, -1.0f64];

    #[test]
    fn point_product_order() {
        let a = Point::new([0, 0]);
        let b = Point::new([1, 2]);
        let c = Point::new([2, 1]);
        assert!(a < b);
        assert!(a <= a);
        assert_eq!(None, b.partial_cmp(&c));
        assert_eq!(Some(Ordering::Greater), b.partial_cmp(&a));
        assert_eq!(Point::new([1, 2]), Point::from_slice(&[1, 2]));
    }

    #[test]
    #[should_panic]
    fn point_from_short_slice() {
        let _: Point<i32, 3> = Point::from_slice(&[1, 2]);
    }

    #[test]
    #[should_panic]
    fn inverted_rect_is_rejected() {
        Rect::new(ONE, ZERO);
    }

    #[test]
    #[should_panic]
    fn nan_rect_is_rejected() {
        Rect::new([0.0f64, f64::NAN], [1.0f64, 1.0f64]);
    }

    #[test]
    fn from_corners_orders_axes() {
        let rect = Rect::from_corners([2.0f64, 0.0f64], [0.0f64, 3.0f64]);
        assert_eq!(Rect::new([0.0f64, 0.0f64], [2.0f64, 3.0f64]), rect);
    }

    #[test]
    fn rect_algebra() {
        let a = Rect::new(ZERO, ONE);
        let b = Rect::new(NEG_ONE, ZERO);
        let wide = Rect::new(NEG_ONE, ONE);

        assert_relative_eq!(1.0f64, a.area());
        assert_relative_eq!(3.0f64, a.margin());
        assert_relative_eq!(8.0f64, wide.area());
        assert_eq!(wide, a.merge(&b));
        assert!(wide.contains(&a));
        assert!(!a.contains(&wide));

        // sharing only the origin still overlaps
        assert!(a.overlaps(&b));
        assert_eq!(Rect::new(ZERO, ZERO), a.intersection(&b));
        assert_relative_eq!(0.0f64, a.intersection(&b).area());

        // centers at 0.5 and -0.5 on each axis: (1 - -1)^2 * 3
        assert_relative_eq!(12.0f64, a.distance_center(&b));
        assert_relative_eq!(0.0f64, a.distance_center(&a));
    }

    #[test]
    fn disjoint_intersection_degenerates() {
        let a = Rect::new([0.0f64, 0.0f64], [1.0f64, 1.0f64]);
        let b = Rect::new([3.0f64, 0.5f64], [4.0f64, 2.0f64]);
        assert!(!a.overlaps(&b));
        let clipped = a.intersection(&b);
        assert_relative_eq!(clipped.min[0], clipped.max[0]);
        assert_relative_eq!(3.0f64, clipped.min[0]);
        assert_relative_eq!(0.5f64, clipped.min[1]);
        assert_relative_eq!(1.0f64, clipped.max[1]);
        assert_relative_eq!(0.0f64, clipped.area());
    }

    #[test]
    fn rect_points() {
        let a = Rect::new([0, 0], [2, 2]);
        assert!(a.contains_point(&Point::new([2, 0])));
        assert!(a.overlaps_point(&Point::new([1, 1])));
        assert!(!a.contains_point(&Point::new([3, 1])));
        assert_eq!(Rect::new([0, -1], [2, 2]), a.merge_point(&Point::new([1, -1])));
        assert_relative_eq!(0.0f64, Rect::from_point(&Point::new([5, 5])).area());
    }

    #[test]
    fn interval_algebra() {
        let a = Interval::new(0, 1);
        let b = Interval::new(2, 3);
        assert!(!a.overlaps(&b));
        assert!(Interval::new(0, 2).overlaps(&b));
        assert_eq!(Interval::new(0, 3), a.merge(&b));
        assert_eq!(Interval::new(2, 2), a.intersection(&b));
        assert_relative_eq!(3.0f64, a.merge(&b).area());
        assert_relative_eq!(1.0f64, b.margin());
        // centers 0.5 and 2.5, scaled by 2 then squared
        assert_relative_eq!(16.0f64, a.distance_center(&b));
        assert_eq!(Interval::new(-1, 1), a.merge_point(&-1));
        assert_eq!(Interval::new(1, 4), Interval::from_bounds(4, 1));
        assert!(Interval::new(0, 3).contains(&b));
        assert!(b.contains_point(&3));
    }

    #[test]
    fn wide_integer_heuristics() {
        let far = Rect::new([i32::MIN, i32::MIN], [i32::MAX, i32::MAX]);
        let unit = Rect::new([80_000, 80_000], [80_001, 80_001]);
        let side = f64::from(i32::MAX) - f64::from(i32::MIN);
        assert_relative_eq!(side * side, far.area());
        assert_relative_eq!(2.0 * side, far.margin());
        assert_relative_eq!(1.0f64, unit.area());
        assert_relative_eq!(80_001.0f64 * 80_001.0f64, Rect::new([0, 0], [1, 1]).merge(&unit).area());
        // doubled centers differ by 160_000 on both axes
        assert_relative_eq!(2.0 * 160_000.0f64 * 160_000.0f64,
                            Rect::new([0, 0], [1, 1]).distance_center(&unit));
        assert_relative_eq!(side, Interval::new(i32::MIN, i32::MAX).area());
    }
}
