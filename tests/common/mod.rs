// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Solidcarve Team

//! Shared fixtures for integration tests

use nalgebra::Point3;
use solidcarve::{Dimension, Facet, Polygon, Solid};
use std::collections::HashMap;

/// Axis-aligned cube as six outward-wound quads (12 facets when
/// triangulated)
pub fn cube(min: Point3<f64>, max: Point3<f64>) -> Solid {
    let p = |x: f64, y: f64, z: f64| Point3::new(x, y, z);
    let (x0, y0, z0) = (min.x, min.y, min.z);
    let (x1, y1, z1) = (max.x, max.y, max.z);
    Solid::from_polygons(
        vec![
            Polygon::new(vec![p(x0, y0, z1), p(x1, y0, z1), p(x1, y1, z1), p(x0, y1, z1)]),
            Polygon::new(vec![p(x0, y0, z0), p(x0, y1, z0), p(x1, y1, z0), p(x1, y0, z0)]),
            Polygon::new(vec![p(x1, y0, z0), p(x1, y1, z0), p(x1, y1, z1), p(x1, y0, z1)]),
            Polygon::new(vec![p(x0, y0, z0), p(x0, y0, z1), p(x0, y1, z1), p(x0, y1, z0)]),
            Polygon::new(vec![p(x0, y1, z0), p(x0, y1, z1), p(x1, y1, z1), p(x1, y1, z0)]),
            Polygon::new(vec![p(x0, y0, z0), p(x1, y0, z0), p(x1, y0, z1), p(x0, y0, z1)]),
        ],
        Dimension::Three,
    )
}

pub fn unit_cube() -> Solid {
    cube(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0))
}

type VertexKey = (i64, i64, i64);

fn vertex_key(point: &Point3<f64>) -> VertexKey {
    (
        (point.x * 1e4).round() as i64,
        (point.y * 1e4).round() as i64,
        (point.z * 1e4).round() as i64,
    )
}

/// Count how many facets share each undirected edge of the mesh
pub fn edge_use_counts(facets: &[Facet]) -> HashMap<(VertexKey, VertexKey), usize> {
    let mut counts = HashMap::new();
    for facet in facets {
        for (i, j) in [(0, 1), (1, 2), (2, 0)] {
            let a = vertex_key(&facet.points[i]);
            let b = vertex_key(&facet.points[j]);
            let edge = if a <= b { (a, b) } else { (b, a) };
            *counts.entry(edge).or_insert(0) += 1;
        }
    }
    counts
}
