// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Solidcarve Team

//! Solidcarve CSG Kernel
//!
//! A BSP-tree based constructive solid geometry kernel. Solids are boolean
//! combinations (union, intersection, difference) of triangulated boundaries;
//! extraction produces a watertight triangle mesh with T-junction cracks
//! repaired through an octree vertex index.

pub mod geometry;
pub mod solid;
pub mod utils;

pub use geometry::{BoundingBox, BspNode, Facet, Octree, Plane, Polygon};
pub use solid::{Dimension, Solid, SolidError};

/// Global tolerance for geometric comparisons.
///
/// Every comparison function takes the tolerance as an explicit parameter;
/// this constant is applied at the public operation entry points only, so
/// behavior stays reproducible under a different tolerance in tests.
pub const EPSILON: f64 = 1e-5;

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    #[test]
    fn test_crate_surface() {
        let solid = Solid::from_polygons(
            vec![Polygon::new(vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
            ])],
            Dimension::Three,
        );
        assert_eq!(solid.facets().len(), 1);
    }
}
