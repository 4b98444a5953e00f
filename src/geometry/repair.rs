// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Solidcarve Team

//! T-junction crack repair
//!
//! Boolean merging leaves vertices of one triangle on the interior of a
//! neighboring triangle's edge. Repair splits every such edge at the touching
//! vertex so the output mesh shares edges again (watertightness).

use super::octree::Octree;
use super::polygon::Facet;
use crate::utils::math::on_segment_interior;
use ahash::AHashSet;
use nalgebra::Point3;
use rayon::prelude::*;
use tracing::debug;

/// Repair cracks across a facet list. Builds the octree once over the
/// deduplicated vertex set, then repairs each facet independently in
/// parallel; the octree is read-only after construction.
pub fn repair_facets(facets: Vec<Facet>, eps: f64) -> Vec<Facet> {
    if facets.is_empty() {
        return facets;
    }

    let vertices = dedup_vertices(&facets, eps);
    let octree = Octree::build(vertices);
    debug!(facets = facets.len(), indexed = octree.len(), "repairing cracks");

    facets
        .into_par_iter()
        .flat_map_iter(|facet| repair_facet(facet, &octree, eps))
        .collect()
}

/// Collapse the facet vertex set to unique points, keyed on a tolerance grid
fn dedup_vertices(facets: &[Facet], eps: f64) -> Vec<Point3<f64>> {
    let mut seen: AHashSet<(i64, i64, i64)> = AHashSet::new();
    let mut vertices = Vec::new();
    for facet in facets {
        for point in &facet.points {
            if seen.insert(quantize(point, eps)) {
                vertices.push(*point);
            }
        }
    }
    vertices
}

fn quantize(point: &Point3<f64>, eps: f64) -> (i64, i64, i64) {
    let scale = 1.0 / eps;
    (
        (point.x * scale).round() as i64,
        (point.y * scale).round() as i64,
        (point.z * scale).round() as i64,
    )
}

/// Split one facet until no indexed vertex lies on the interior of any edge
/// of any surviving fragment. Fragments degenerating to near-zero area are
/// discarded.
fn repair_facet(facet: Facet, octree: &Octree, eps: f64) -> Vec<Facet> {
    let mut repaired = Vec::new();
    let mut pending = vec![facet];

    while let Some(facet) = pending.pop() {
        if !facet.is_valid(eps) {
            continue;
        }

        let bounds = facet.bounding_box().expanded(eps);
        let candidates = octree.contained(&bounds.min, &bounds.max);

        match find_edge_split(&facet, &candidates, eps) {
            Some((i, j, point)) => {
                // Replace edge (i, j) with (i, point) and (point, j); the
                // opposite vertex is shared by both fragments
                let mut first = facet.points;
                first[j] = point;
                let mut second = facet.points;
                second[i] = point;
                pending.push(Facet::new(first));
                pending.push(Facet::new(second));
            }
            None => repaired.push(facet),
        }
    }

    repaired
}

/// First indexed point lying strictly inside one of the facet's edges,
/// together with that edge's vertex slots
fn find_edge_split(
    facet: &Facet,
    candidates: &[Point3<f64>],
    eps: f64,
) -> Option<(usize, usize, Point3<f64>)> {
    for point in candidates {
        for (i, j) in [(0, 1), (1, 2), (2, 0)] {
            if on_segment_interior(&facet.points[i], &facet.points[j], point, eps) {
                return Some((i, j, *point));
            }
        }
    }
    None
}
