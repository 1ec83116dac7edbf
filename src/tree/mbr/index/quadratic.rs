// Copyright 2016 spatial-rs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Guttman's quadratic-cost split

use crate::geometry::Mbr;
use crate::staticvec::StaticVec;
use crate::tree::mbr::index::IndexSplit;
use crate::tree::mbr::MbrLeafGeometry;
use generic_array::ArrayLength;
use itertools::Itertools;

/// Quadratic split. Seeds are the pair wasting the most area when merged; the rest are
/// assigned one at a time, strongest preference first.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuadraticSplit;

fn wasted_area<B: Mbr>(a: &B, b: &B) -> f64 {
    a.merge(b).area() - a.area() - b.area()
}

fn intersection_area<B: Mbr>(a: &B, b: &B) -> f64 {
    a.intersection(b).area()
}

impl QuadraticSplit {
    /// Returns the seed pair `(n1, n2)` as indexes into `children`. `n1 == None` stands for
    /// the pending entry.
    fn pick_seeds<E, N>(&self, children: &StaticVec<E, N>, pending: &E) -> (Option<usize>, usize)
        where E: MbrLeafGeometry,
              N: ArrayLength,
    {
        let mbrs: Vec<E::Mbr> = children.iter().map(|child| child.mbr()).collect();
        let pending_mbr = pending.mbr();
        let mut n1 = 0;
        let mut n2 = 0;
        let mut max_wasted = f64::NEG_INFINITY;

        //PS1 existing pairs
        for (i, j) in (0..mbrs.len()).tuple_combinations() {
            let wasted = wasted_area(&mbrs[i], &mbrs[j]);
            if wasted > max_wasted {
                max_wasted = wasted;
                n1 = i;
                n2 = j;
            } else if wasted == max_wasted
                && intersection_area(&mbrs[i], &mbrs[j]) < intersection_area(&mbrs[n1], &mbrs[n2])
            {
                n1 = i;
                n2 = j;
            }
        }

        //PS1 pairs with the pending entry. Existing pairs keep equal-cost ties.
        let mut seed1 = Some(n1);
        for (j, mbr) in mbrs.iter().enumerate() {
            let wasted = wasted_area(&pending_mbr, mbr);
            if wasted > max_wasted {
                max_wasted = wasted;
                seed1 = None;
                n2 = j;
            } else if wasted == max_wasted {
                let incumbent = match seed1 {
                    None => intersection_area(&pending_mbr, &mbrs[n2]),
                    Some(n1) => intersection_area(&mbrs[n1], &mbrs[n2]),
                };
                if intersection_area(&pending_mbr, mbr) < incumbent {
                    seed1 = None;
                    n2 = j;
                }
            }
        }
        trace!("quadratic split seeds {:?} and {}", seed1, n2);
        (seed1, n2)
    }

    /// Pick the unassigned entry (index `selected` onwards) with the strongest preference
    /// for one group. Returns its index and whether it belongs with the first group.
    fn pick_next<E, N>(&self,
                       children: &StaticVec<E, N>,
                       selected: usize,
                       split_len: usize,
                       bound1: &E::Mbr,
                       bound2: &E::Mbr)
                       -> (usize, bool)
        where E: MbrLeafGeometry,
              N: ArrayLength,
    {
        let area1 = bound1.area();
        let area2 = bound2.area();
        let mut picked = selected;
        let mut to_first = true;
        let mut max_diff = f64::NEG_INFINITY;
        for (i, child) in children.iter().enumerate().skip(selected) {
            //PN1
            let d1 = child.expand_mbr_to_fit(bound1).area() - area1;
            let d2 = child.expand_mbr_to_fit(bound2).area() - area2;
            //PN2
            let diff = (d1 - d2).abs();
            if diff > max_diff {
                max_diff = diff;
                picked = i;
                to_first = if d1 != d2 {
                    d1 < d2
                } else if area1 != area2 {
                    area1 < area2
                } else {
                    selected < split_len
                };
            }
        }
        (picked, to_first)
    }
}

impl IndexSplit for QuadraticSplit {
    // Group one is `children[..selected]`, group two is the returned split. Entries from
    // `selected` onwards are still unassigned.
    fn split<E, N>(&self, children: &mut StaticVec<E, N>, pending: E, min: usize) -> StaticVec<E, N>
        where E: MbrLeafGeometry,
              N: ArrayLength,
    {
        debug_assert!(children.is_full(), "only full nodes are split");
        let mut split = StaticVec::new();

        //QS1
        match self.pick_seeds(children, &pending) {
            (None, n2) => {
                split.push(pending);
                children.swap(0, n2);
            }
            (Some(n1), n2) => {
                // n1 < n2, so n1 still addresses the same entry after the erase
                split.push(children.erase(n2));
                children.swap(0, n1);
                children.push(pending);
            }
        }

        let total = children.len() + split.len();
        let mut selected = 1;
        let mut bound1 = children[0].mbr();
        let mut bound2 = split[0].mbr();

        //QS2
        while selected + split.len() < total {
            let remaining = total - selected - split.len();
            if selected + remaining <= min {
                // everything unassigned is already in place for group one
                break;
            }
            if split.len() + remaining <= min {
                while children.len() > selected {
                    if let Some(child) = children.pop() {
                        split.push(child);
                    }
                }
                break;
            }
            //QS3
            let (picked, to_first) = self.pick_next(children, selected, split.len(), &bound1, &bound2);
            if to_first {
                bound1 = children[picked].expand_mbr_to_fit(&bound1);
                children.swap(selected, picked);
                selected += 1;
            } else {
                let child = children.erase(picked);
                bound2 = child.expand_mbr_to_fit(&bound2);
                split.push(child);
            }
        }
        debug!("quadratic split into groups of {} and {}", children.len(), split.len());
        split
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Interval, Rect};
    use typenum::{U4, U6};

    fn full<N: ArrayLength>(intervals: &[(i32, i32)]) -> StaticVec<Interval<i32>, N> {
        let mut children = StaticVec::new();
        for &(min, max) in intervals {
            children.push(Interval::new(min, max));
        }
        children
    }

    fn sorted(values: &StaticVec<Interval<i32>, U4>) -> Vec<(i32, i32)> {
        let mut out: Vec<_> = values.iter().map(|i| (i.min, i.max)).collect();
        out.sort();
        out
    }

    #[test]
    fn five_intervals() {
        let mut children = full::<U4>(&[(0, 1), (2, 3), (4, 5), (6, 7)]);
        let split = QuadraticSplit.split(&mut children, Interval::new(8, 9), 2);
        assert_eq!(vec![(0, 1), (2, 3), (4, 5)], sorted(&children));
        assert_eq!(vec![(6, 7), (8, 9)], sorted(&split));
    }

    #[test]
    fn existing_pair_seeds() {
        // [0,1] and [20,21] waste the most, the pending entry sits in the middle
        let mut children = full::<U4>(&[(0, 1), (1, 2), (19, 20), (20, 21)]);
        let split = QuadraticSplit.split(&mut children, Interval::new(10, 11), 2);
        assert_eq!(Interval::new(0, 1), children[0]);
        assert_eq!(Interval::new(20, 21), split[0]);
        assert_eq!(5, children.len() + split.len());
        assert!(children.len() >= 2 && split.len() >= 2);
    }

    #[test]
    fn equal_cost_tie_keeps_existing_seeds() {
        // [0,1]+[25,26] and [-1,1]+[25,26] both waste 24 and neither pair intersects
        let mut children = full::<U4>(&[(0, 1), (5, 6), (20, 21), (25, 26)]);
        let pending = Interval::new(-1, 1);
        assert_eq!((Some(0), 3), QuadraticSplit.pick_seeds(&children, &pending));

        let split = QuadraticSplit.split(&mut children, pending, 2);
        assert_eq!(Interval::new(0, 1), children[0]);
        assert_eq!(Interval::new(25, 26), split[0]);
    }

    #[test]
    fn smaller_intersection_breaks_waste_tie() {
        let a = Rect::new([0, 4], [10, 6]);
        let b = Rect::new([4, 0], [6, 10]);
        let mut children: StaticVec<Rect<i32, 2>, U4> = StaticVec::new();
        children.push(a);
        children.push(b);
        children.push(Rect::new([4, 4], [6, 6]));
        children.push(Rect::new([3, 3], [7, 7]));
        // crossing `a` wastes 60 like `a`+`b`, but shares no area with it
        let pending = Rect::new([5, 1], [5, 9]);
        assert_eq!((None, 0), QuadraticSplit.pick_seeds(&children, &pending));

        let split = QuadraticSplit.split(&mut children, pending, 2);
        assert_eq!(a, children[0]);
        assert_eq!(pending, split[0]);
        assert_eq!(5, children.len() + split.len());
    }

    #[test]
    fn equal_growth_goes_to_smaller_group() {
        // [6,6] grows both bounds by 4
        let children = full::<U4>(&[(0, 2), (6, 6)]);
        let (bound1, bound2) = (Interval::new(0, 2), Interval::new(10, 11));
        assert_eq!((1, false), QuadraticSplit.pick_next(&children, 1, 1, &bound1, &bound2));
        assert_eq!((1, true), QuadraticSplit.pick_next(&children, 1, 1, &bound2, &bound1));
    }

    #[test]
    fn equal_growth_and_area_goes_to_fewer_entries() {
        // [5,6] grows both bounds by 5
        let (bound1, bound2) = (Interval::new(0, 1), Interval::new(10, 11));
        let children = full::<U4>(&[(0, 1), (5, 6)]);
        assert_eq!((1, true), QuadraticSplit.pick_next(&children, 1, 2, &bound1, &bound2));
        let children = full::<U4>(&[(0, 1), (1, 1), (5, 6)]);
        assert_eq!((2, false), QuadraticSplit.pick_next(&children, 2, 1, &bound1, &bound2));
    }

    #[test]
    fn minimum_is_honoured() {
        // one far outlier would otherwise take a group of its own
        let mut children: StaticVec<Interval<i32>, U6> =
            full(&[(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 6)]);
        let split = QuadraticSplit.split(&mut children, Interval::new(100, 101), 3);
        assert_eq!(7, children.len() + split.len());
        assert!(children.len() >= 3, "{:?}", children);
        assert!(split.len() >= 3, "{:?}", split);
    }

    #[test]
    fn boxes_split_by_cluster() {
        let mut children: StaticVec<Rect<f64, 2>, U4> = StaticVec::new();
        children.push(Rect::new([0.0, 0.0], [1.0, 1.0]));
        children.push(Rect::new([10.0, 10.0], [11.0, 11.0]));
        children.push(Rect::new([0.5, 0.5], [1.5, 1.5]));
        children.push(Rect::new([10.5, 10.5], [11.5, 11.5]));
        let split = QuadraticSplit.split(&mut children, Rect::new([0.2, 0.2], [0.8, 0.8]), 2);

        let low = |r: &Rect<f64, 2>| r.max[0] < 5.0;
        let children_low = children.iter().all(low);
        let split_low = split.iter().all(low);
        assert!(children_low != split_low);
        assert!(children.iter().all(|r| low(r) == children_low));
        assert!(split.iter().all(|r| low(r) == split_low));
        assert_eq!(5, children.len() + split.len());
    }
}
