// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Solidcarve Team

//! Math utilities

use nalgebra::{Point3, Vector3};

/// Calculate the (non-normalized) normal of a triangle given three vertices
pub fn triangle_normal(p0: &Point3<f64>, p1: &Point3<f64>, p2: &Point3<f64>) -> Vector3<f64> {
    let v1 = p1 - p0;
    let v2 = p2 - p0;
    v1.cross(&v2)
}

/// Check if two floats are approximately equal
pub fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
    (a - b).abs() < eps
}

/// Check if two points coincide: each coordinate must differ by less than eps
pub fn points_approx_eq(a: &Point3<f64>, b: &Point3<f64>, eps: f64) -> bool {
    approx_eq(a.x, b.x, eps) && approx_eq(a.y, b.y, eps) && approx_eq(a.z, b.z, eps)
}

/// Test whether `p` lies strictly between `a` and `b` on the open segment
/// interior: collinear within eps, not coinciding with either endpoint.
pub fn on_segment_interior(a: &Point3<f64>, b: &Point3<f64>, p: &Point3<f64>, eps: f64) -> bool {
    if points_approx_eq(p, a, eps) || points_approx_eq(p, b, eps) {
        return false;
    }

    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq < eps * eps {
        return false;
    }

    let t = (p - a).dot(&ab) / len_sq;
    if t <= 0.0 || t >= 1.0 {
        return false;
    }

    let closest = a + ab * t;
    (p - closest).norm() < eps
}
