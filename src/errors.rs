// Copyright 2016 spatial-rs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Error types reported by tree handle resolution and structural validation

use thiserror::Error;

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, RTreeError>;

/// Failures a tree can report instead of silently misbehaving.
///
/// Contract violations on the mutating API (erasing through a stale handle, overfilling
/// a node) still panic; this type carries the message so the panic names what went wrong.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RTreeError {
    #[error("handle was issued at mutation stamp {issued} but the tree is at stamp {current}")]
    StaleHandle { issued: u64, current: u64 },

    #[error("handle path {path:?} slot {slot} does not address a stored entry")]
    InvalidHandle { path: Vec<usize>, slot: usize },

    #[error("node at depth {depth} breaks balance, every leaf must sit at depth {leaf_level}")]
    Unbalanced { depth: usize, leaf_level: usize },

    #[error("node at depth {depth} holds {len} entries, allowed range is [{min}, {max}]")]
    FanOut {
        depth: usize,
        len: usize,
        min: usize,
        max: usize,
    },

    #[error("entry region at depth {depth} is not the tight bound of its child")]
    LooseBound { depth: usize },

    #[error("tree reports {expected} entries but {found} are reachable from the root")]
    CountMismatch { expected: usize, found: usize },
}
