// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Solidcarve Team

//! Parallel boolean orchestration using rayon
//!
//! Pairwise reduction over the worker pool: within one boolean operation the
//! clip/merge stages are data-dependent and run in order, but unrelated
//! pairs compose concurrently.

use crate::solid::Solid;
use anyhow::Result;
use rayon::prelude::*;

/// Union a batch of solids by parallel pairwise reduction
pub fn union_all(solids: Vec<Solid>) -> Result<Solid> {
    reduce_pairwise(solids, |a, b| a.union(b))
}

/// Intersect a batch of solids by parallel pairwise reduction
pub fn intersect_all(solids: Vec<Solid>) -> Result<Solid> {
    reduce_pairwise(solids, |a, b| a.intersect(b))
}

/// Subtract every following solid from the first. Differences are ordered,
/// so this folds sequentially.
pub fn difference_all(solids: Vec<Solid>) -> Result<Solid> {
    let mut iter = solids.into_iter();
    let mut result = match iter.next() {
        Some(solid) => solid,
        None => return Ok(Solid::empty()),
    };
    for solid in iter {
        result = result.minus(&solid)?;
    }
    Ok(result)
}

fn reduce_pairwise<F>(mut solids: Vec<Solid>, op: F) -> Result<Solid>
where
    F: Fn(&Solid, &Solid) -> Result<Solid> + Sync,
{
    while solids.len() > 1 {
        solids = solids
            .par_chunks(2)
            .map(|pair| match pair {
                [a, b] => op(a, b),
                [a] => Ok(a.clone()),
                _ => unreachable!("chunks of size 2"),
            })
            .collect::<Result<Vec<_>>>()?;
    }
    match solids.pop() {
        Some(solid) => Ok(solid),
        None => Ok(Solid::empty()),
    }
}
