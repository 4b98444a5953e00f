// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Solidcarve Team

//! Solid representation and boolean orchestration
//!
//! A solid is either raw polygon soup (dimension-tagged) or a normalized BSP
//! tree. Boolean operations never mutate an operand; every transformation
//! returns a new solid, so trees and polygons may be shared across threads
//! freely during composition.

use crate::geometry::{repair_facets, BoundingBox, BspNode, Facet, Polygon};
use crate::EPSILON;
use anyhow::Result;
use nalgebra::{Matrix4, Point3, Vector3};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Dimensionality tag for polygon soups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dimension {
    Two,
    Three,
}

/// Structured failures of the solid layer
#[derive(Debug, Error)]
pub enum SolidError {
    /// Caller error: boolean composition and BSP normalization are defined
    /// for three-dimensional solids only. Not a runtime condition to retry.
    #[error("operation requires a three-dimensional solid")]
    TwoDimensional,

    #[error("cannot merge solids of different dimensions")]
    DimensionMismatch,
}

/// A closed solid under boolean composition
#[derive(Debug, Clone)]
pub enum Solid {
    /// Unstructured polygon soup, as produced by shape generators
    Soup {
        polygons: Vec<Polygon>,
        dimension: Dimension,
    },
    /// Normalized boundary representation, always three-dimensional
    Tree(BspNode),
}

impl Solid {
    pub fn from_polygons(polygons: Vec<Polygon>, dimension: Dimension) -> Self {
        Self::Soup {
            polygons,
            dimension,
        }
    }

    /// Wrap exported facets back into a three-dimensional soup
    pub fn from_facets(facets: Vec<Facet>) -> Self {
        let polygons = facets
            .into_iter()
            .map(|facet| Polygon::new(facet.points.to_vec()))
            .collect();
        Self::Soup {
            polygons,
            dimension: Dimension::Three,
        }
    }

    pub fn empty() -> Self {
        Self::Soup {
            polygons: Vec::new(),
            dimension: Dimension::Three,
        }
    }

    pub fn dimension(&self) -> Dimension {
        match self {
            Self::Soup { dimension, .. } => *dimension,
            Self::Tree(_) => Dimension::Three,
        }
    }

    /// The full polygon list of either representation
    pub fn polygons(&self) -> Vec<Polygon> {
        match self {
            Self::Soup { polygons, .. } => polygons.clone(),
            Self::Tree(tree) => tree.all_polygons(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Soup { polygons, .. } => polygons.is_empty(),
            Self::Tree(tree) => tree.polygon_count() == 0,
        }
    }

    /// Normalize into a BSP tree. Two-dimensional soups cannot be
    /// normalized; that is a caller error, not a recoverable condition.
    fn to_tree(&self, eps: f64) -> Result<BspNode, SolidError> {
        match self {
            Self::Tree(tree) => Ok(tree.clone()),
            Self::Soup {
                polygons,
                dimension,
            } => {
                if *dimension == Dimension::Two {
                    return Err(SolidError::TwoDimensional);
                }
                Ok(BspNode::new(polygons.clone(), eps))
            }
        }
    }

    /// Boolean union.
    ///
    /// Disjoint bounding boxes take the concatenation fast path, which is
    /// exact: non-overlapping boundaries cannot intersect. Otherwise both
    /// operands normalize to BSP trees (independently, in parallel) and run
    /// the clip/merge pipeline.
    pub fn union(&self, other: &Solid) -> Result<Solid> {
        let bb_a = self.bounding_box();
        let bb_b = other.bounding_box();
        if !bb_a.intersects(&bb_b) {
            debug!("bounding boxes disjoint, concatenating operands");
            if self.dimension() != Dimension::Three || other.dimension() != Dimension::Three {
                return Err(SolidError::TwoDimensional.into());
            }
            let mut polygons = self.polygons();
            polygons.extend(other.polygons());
            return Ok(Solid::Soup {
                polygons,
                dimension: Dimension::Three,
            });
        }

        let (tree_a, tree_b) = rayon::join(
            || self.to_tree(EPSILON),
            || other.to_tree(EPSILON),
        );
        let (tree_a, tree_b) = (tree_a?, tree_b?);

        // Remove from each operand the portion inside the other, then
        // reattach the correctly oriented shared boundary layer
        let left = tree_a.clip_to(&tree_b, EPSILON);
        let right = tree_b.clip_to(&left, EPSILON);
        let inverted = right.inverted().clip_to(&left, EPSILON);
        let result = left.merged(&inverted.inverted(), EPSILON);

        debug!(polygons = result.polygon_count(), "union pipeline complete");
        Ok(Solid::Tree(result))
    }

    /// Boolean intersection, derived from union and inversion by De Morgan's
    /// law over the half-space representation
    pub fn intersect(&self, other: &Solid) -> Result<Solid> {
        Ok(self
            .inverted()
            .union(&other.inverted())?
            .inverted())
    }

    /// Boolean difference `self - other`, derived like `intersect`
    pub fn minus(&self, other: &Solid) -> Result<Solid> {
        Ok(self.inverted().union(other)?.inverted())
    }

    /// The complementary solid: a soup flips every polygon's winding, a tree
    /// inverts structurally
    pub fn inverted(&self) -> Solid {
        match self {
            Self::Soup {
                polygons,
                dimension,
            } => Self::Soup {
                polygons: polygons.iter().map(Polygon::flipped).collect(),
                dimension: *dimension,
            },
            Self::Tree(tree) => Self::Tree(tree.inverted()),
        }
    }

    /// Representation-level merge (structural, not a boolean union).
    /// Soup+soup concatenates; anything involving a tree normalizes both
    /// sides and merges the trees.
    pub fn merge(&self, other: &Solid) -> Result<Solid> {
        if self.dimension() != other.dimension() {
            return Err(SolidError::DimensionMismatch.into());
        }
        match (self, other) {
            (
                Self::Soup { polygons, dimension },
                Self::Soup {
                    polygons: other_polygons,
                    ..
                },
            ) => {
                let mut merged = polygons.clone();
                merged.extend(other_polygons.iter().cloned());
                Ok(Self::Soup {
                    polygons: merged,
                    dimension: *dimension,
                })
            }
            _ => {
                let tree_a = self.to_tree(EPSILON)?;
                let tree_b = other.to_tree(EPSILON)?;
                Ok(Self::Tree(tree_a.merged(&tree_b, EPSILON)))
            }
        }
    }

    /// Final exported mesh: triangulation of the full polygon list, with
    /// crack repair applied to BSP-backed solids. Degenerate triangles are
    /// silently filtered, never surfaced as errors.
    pub fn facets(&self) -> Vec<Facet> {
        let mut facets = Vec::new();
        for polygon in self.polygons() {
            polygon.triangulate(EPSILON, &mut facets);
        }
        match self {
            Self::Soup { .. } => facets,
            Self::Tree(_) => repair_facets(facets, EPSILON),
        }
    }

    pub fn facet_count(&self) -> usize {
        self.facets().len()
    }

    pub fn bounding_box(&self) -> BoundingBox {
        let mut bbox = BoundingBox::empty();
        for polygon in self.polygons() {
            for vertex in &polygon.vertices {
                bbox.expand_to_include(vertex);
            }
        }
        bbox
    }

    /// Minimum corner of the axis-aligned bounding box
    pub fn min_bound(&self) -> Point3<f64> {
        self.bounding_box().min
    }

    /// Maximum corner of the axis-aligned bounding box
    pub fn max_bound(&self) -> Point3<f64> {
        self.bounding_box().max
    }

    /// Flip every polygon's winding. Legal for any dimension.
    pub fn flip(&self) -> Solid {
        self.inverted()
    }

    pub fn translate(&self, offset: Vector3<f64>) -> Solid {
        self.transform(&Matrix4::new_translation(&offset))
    }

    pub fn scale(&self, factors: Vector3<f64>) -> Solid {
        self.transform(&Matrix4::new_nonuniform_scaling(&factors))
    }

    /// Direct polygon transform. Legal for any dimension; trees drop back to
    /// soup form since their partition planes no longer match.
    pub fn transform(&self, matrix: &Matrix4<f64>) -> Solid {
        let polygons = self
            .polygons()
            .iter()
            .map(|polygon| polygon.transform(matrix))
            .collect();
        Solid::Soup {
            polygons,
            dimension: self.dimension(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-5;

    fn cube(min: Point3<f64>, max: Point3<f64>) -> Solid {
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

    fn unit_cube() -> Solid {
        cube(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn test_two_dimensional_union_fails_fast() {
        let square = Solid::from_polygons(
            vec![Polygon::new(vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
            ])],
            Dimension::Two,
        );
        let result = square.union(&square.clone());
        let err = result.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SolidError>(),
            Some(SolidError::TwoDimensional)
        ));
    }

    #[test]
    fn test_two_dimensional_transforms_allowed() {
        let square = Solid::from_polygons(
            vec![Polygon::new(vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
            ])],
            Dimension::Two,
        );
        let moved = square.translate(Vector3::new(2.0, 0.0, 0.0));
        assert_eq!(moved.min_bound().x, 2.0);
        let scaled = square.scale(Vector3::new(2.0, 2.0, 1.0));
        assert_eq!(scaled.max_bound().x, 2.0);
        assert_eq!(moved.dimension(), Dimension::Two);
    }

    #[test]
    fn test_soup_inverted_flips_windings() {
        let solid = unit_cube();
        let inverted = solid.inverted();
        for (a, b) in solid.polygons().iter().zip(inverted.polygons().iter()) {
            assert!((a.plane.normal + b.plane.normal).norm() < 1e-12);
        }
        // Involutive
        let twice = inverted.inverted();
        for (a, b) in solid.polygons().iter().zip(twice.polygons().iter()) {
            assert_eq!(a.vertices, b.vertices);
        }
    }

    #[test]
    fn test_soup_merge_concatenates() {
        let a = unit_cube();
        let b = cube(Point3::new(5.0, 0.0, 0.0), Point3::new(6.0, 1.0, 1.0));
        let merged = a.merge(&b).unwrap();
        assert_eq!(merged.polygons().len(), 12);
        assert!(matches!(merged, Solid::Soup { .. }));
    }

    #[test]
    fn test_merge_with_tree_normalizes() {
        let a = Solid::Tree(unit_cube().to_tree(EPS).unwrap());
        let b = cube(Point3::new(5.0, 0.0, 0.0), Point3::new(6.0, 1.0, 1.0));
        let merged = a.merge(&b).unwrap();
        assert!(matches!(merged, Solid::Tree(_)));
        assert_eq!(merged.polygons().len(), 12);
    }

    #[test]
    fn test_merge_dimension_mismatch() {
        let square = Solid::from_polygons(
            vec![Polygon::new(vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
            ])],
            Dimension::Two,
        );
        assert!(unit_cube().merge(&square).is_err());
    }

    #[test]
    fn test_bounds() {
        let solid = cube(Point3::new(-1.0, -2.0, -3.0), Point3::new(1.0, 2.0, 3.0));
        assert_eq!(solid.min_bound(), Point3::new(-1.0, -2.0, -3.0));
        assert_eq!(solid.max_bound(), Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_soup_facets_skip_repair() {
        let solid = unit_cube();
        assert_eq!(solid.facets().len(), 12);
    }
}
