// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Solidcarve Team

//! Polygon and facet value types

use super::bbox::BoundingBox;
use super::plane::Plane;
use crate::utils::math::{points_approx_eq, triangle_normal};
use nalgebra::{Matrix4, Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Planar vertex loop with a derived plane.
///
/// Vertices are assumed coplanar and non-self-intersecting; winding order
/// determines the outward-facing normal. Polygons are immutable once built
/// except for `flip`, which reverses winding and negates the plane.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Polygon {
    pub vertices: Vec<Point3<f64>>,
    pub plane: Plane,
}

impl Polygon {
    /// Build a polygon from at least three vertices, deriving the plane from
    /// the first non-degenerate vertex triple
    pub fn new(vertices: Vec<Point3<f64>>) -> Self {
        let plane = derive_plane(&vertices);
        Self { vertices, plane }
    }

    /// Reverse winding order and negate the plane normal
    pub fn flip(&mut self) {
        self.vertices.reverse();
        self.plane.flip();
    }

    pub fn flipped(&self) -> Self {
        let mut polygon = self.clone();
        polygon.flip();
        polygon
    }

    /// Transform all vertices by a matrix and re-derive the plane
    pub fn transform(&self, matrix: &Matrix4<f64>) -> Self {
        let vertices: Vec<Point3<f64>> = self
            .vertices
            .iter()
            .map(|v| matrix.transform_point(v))
            .collect();
        Self::new(vertices)
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(&self.vertices)
    }

    /// Fan-triangulate into facets, preserving winding. Degenerate facets
    /// (two approximately equal vertices, near-zero area) are dropped.
    pub fn triangulate(&self, eps: f64, out: &mut Vec<Facet>) {
        for i in 1..self.vertices.len().saturating_sub(1) {
            let facet = Facet::new([self.vertices[0], self.vertices[i], self.vertices[i + 1]]);
            if facet.is_valid(eps) {
                out.push(facet);
            }
        }
    }
}

fn derive_plane(vertices: &[Point3<f64>]) -> Plane {
    for i in 1..vertices.len().saturating_sub(1) {
        let normal = triangle_normal(&vertices[0], &vertices[i], &vertices[i + 1]);
        if normal.norm() > 1e-12 {
            let normal = normal.normalize();
            return Plane::new(normal, normal.dot(&vertices[0].coords));
        }
    }
    // Degenerate loop; the polygon is filtered out during triangulation
    Plane::new(Vector3::new(0.0, 0.0, 1.0), 0.0)
}

/// Terminal 3-vertex facet used for mesh export
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Facet {
    pub points: [Point3<f64>; 3],
}

impl Facet {
    pub fn new(points: [Point3<f64>; 3]) -> Self {
        Self { points }
    }

    /// Non-normalized facet normal (norm is twice the area)
    pub fn normal(&self) -> Vector3<f64> {
        triangle_normal(&self.points[0], &self.points[1], &self.points[2])
    }

    /// A facet is valid only if no two vertices approximately coincide and
    /// its area is not near zero
    pub fn is_valid(&self, eps: f64) -> bool {
        let [a, b, c] = &self.points;
        if points_approx_eq(a, b, eps) || points_approx_eq(b, c, eps) || points_approx_eq(a, c, eps)
        {
            return false;
        }
        self.normal().norm() > eps * eps
    }

    pub fn flipped(&self) -> Self {
        Self::new([self.points[0], self.points[2], self.points[1]])
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(&self.points)
    }

    pub fn centroid(&self) -> Point3<f64> {
        let sum = self.points[0].coords + self.points[1].coords + self.points[2].coords;
        Point3::from(sum / 3.0)
    }
}
