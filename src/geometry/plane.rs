// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Solidcarve Team

//! Plane classification and polygon splitting

use super::polygon::Polygon;
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

const COPLANAR: u8 = 0;
const FRONT: u8 = 1;
const BACK: u8 = 2;
const SPANNING: u8 = 3;

/// How a whole polygon relates to a plane
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolygonClass {
    Coincident,
    Front,
    Back,
    Spanning,
}

/// Oriented plane in Hessian normal form: `normal . p == w` for on-plane points
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plane {
    pub normal: Vector3<f64>,
    pub w: f64,
}

impl Plane {
    pub fn new(normal: Vector3<f64>, w: f64) -> Self {
        Self { normal, w }
    }

    /// Derive the plane spanned by three points, normal by winding order
    pub fn from_points(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) -> Self {
        let normal = (b - a).cross(&(c - a)).normalize();
        let w = normal.dot(&a.coords);
        Self { normal, w }
    }

    /// Signed distance of a point from the plane (positive = in front)
    pub fn signed_distance(&self, point: &Point3<f64>) -> f64 {
        self.normal.dot(&point.coords) - self.w
    }

    /// The same plane facing the other way
    pub fn flipped(&self) -> Self {
        Self {
            normal: -self.normal,
            w: -self.w,
        }
    }

    pub fn flip(&mut self) {
        self.normal = -self.normal;
        self.w = -self.w;
    }

    /// Classify a polygon against this plane within tolerance
    pub fn classify_polygon(&self, polygon: &Polygon, eps: f64) -> PolygonClass {
        let mut polygon_type = COPLANAR;
        for vertex in &polygon.vertices {
            polygon_type |= self.classify_vertex(vertex, eps);
        }
        match polygon_type {
            COPLANAR => PolygonClass::Coincident,
            FRONT => PolygonClass::Front,
            BACK => PolygonClass::Back,
            _ => PolygonClass::Spanning,
        }
    }

    fn classify_vertex(&self, vertex: &Point3<f64>, eps: f64) -> u8 {
        let t = self.signed_distance(vertex);
        if t < -eps {
            BACK
        } else if t > eps {
            FRONT
        } else {
            COPLANAR
        }
    }

    /// Split a polygon by this plane, routing the pieces into the four output
    /// lists.
    ///
    /// Coincident polygons route by normal direction: same direction as the
    /// plane goes to `coplanar_front`, opposite to `coplanar_back`. This
    /// tie-break decides which of two overlapping coplanar faces survives a
    /// boolean operation, so it must stay identical everywhere coincidence is
    /// tested.
    ///
    /// A spanning polygon is split at each edge crossing. The interpolated
    /// crossing vertex is pushed into both fragments from one computed value,
    /// so the shared vertices are bit-identical and introduce no cracks.
    pub fn split_polygon(
        &self,
        polygon: &Polygon,
        eps: f64,
        coplanar_front: &mut Vec<Polygon>,
        coplanar_back: &mut Vec<Polygon>,
        front: &mut Vec<Polygon>,
        back: &mut Vec<Polygon>,
    ) {
        let mut polygon_type = COPLANAR;
        let mut types = Vec::with_capacity(polygon.vertices.len());
        for vertex in &polygon.vertices {
            let t = self.classify_vertex(vertex, eps);
            polygon_type |= t;
            types.push(t);
        }

        match polygon_type {
            COPLANAR => {
                if self.normal.dot(&polygon.plane.normal) > 0.0 {
                    coplanar_front.push(polygon.clone());
                } else {
                    coplanar_back.push(polygon.clone());
                }
            }
            FRONT => front.push(polygon.clone()),
            BACK => back.push(polygon.clone()),
            _ => {
                let mut f = Vec::new();
                let mut b = Vec::new();
                let n = polygon.vertices.len();
                for i in 0..n {
                    let j = (i + 1) % n;
                    let ti = types[i];
                    let tj = types[j];
                    let vi = polygon.vertices[i];
                    let vj = polygon.vertices[j];

                    if ti != BACK {
                        f.push(vi);
                    }
                    if ti != FRONT {
                        b.push(vi);
                    }
                    if (ti | tj) == SPANNING {
                        let edge = vj - vi;
                        let t = (self.w - self.normal.dot(&vi.coords)) / self.normal.dot(&edge);
                        let crossing = vi + edge * t;
                        f.push(crossing);
                        b.push(crossing);
                    }
                }
                if f.len() >= 3 {
                    front.push(Polygon::new(f));
                }
                if b.len() >= 3 {
                    back.push(Polygon::new(b));
                }
            }
        }
    }
}
