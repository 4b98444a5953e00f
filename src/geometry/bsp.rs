// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Solidcarve Team

//! BSP tree: boundary representation of a solid with clip/invert/merge

use super::plane::Plane;
use super::polygon::Polygon;

/// A BSP tree node.
///
/// `polygons` are coincident with `plane` within tolerance; the front subtree
/// holds everything strictly in front of the plane (post-split), the back
/// subtree everything behind. An absent subtree is an empty half-space:
/// absent front means "outside the solid", absent back means "inside".
#[derive(Debug, Clone, Default)]
pub struct BspNode {
    pub plane: Option<Plane>,
    pub front: Option<Box<BspNode>>,
    pub back: Option<Box<BspNode>>,
    pub polygons: Vec<Polygon>,
}

impl BspNode {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a tree from a polygon set
    pub fn new(polygons: Vec<Polygon>, eps: f64) -> Self {
        let mut node = Self::empty();
        node.insert(polygons, eps);
        node
    }

    /// Insert polygons into the tree, splitting against node planes and
    /// growing subtrees at absent half-spaces. This is the structural merge
    /// primitive, not a boolean operation.
    pub fn insert(&mut self, polygons: Vec<Polygon>, eps: f64) {
        if polygons.is_empty() {
            return;
        }
        let plane = match self.plane {
            Some(ref plane) => plane.clone(),
            None => {
                // The first polygon's plane becomes this node's partition
                let plane = polygons[0].plane.clone();
                self.plane = Some(plane.clone());
                plane
            }
        };

        let mut coplanar_front = Vec::new();
        let mut coplanar_back = Vec::new();
        let mut front = Vec::new();
        let mut back = Vec::new();
        for polygon in &polygons {
            plane.split_polygon(
                polygon,
                eps,
                &mut coplanar_front,
                &mut coplanar_back,
                &mut front,
                &mut back,
            );
        }
        self.polygons.append(&mut coplanar_front);
        self.polygons.append(&mut coplanar_back);

        if !front.is_empty() {
            self.front
                .get_or_insert_with(|| Box::new(BspNode::empty()))
                .insert(front, eps);
        }
        if !back.is_empty() {
            self.back
                .get_or_insert_with(|| Box::new(BspNode::empty()))
                .insert(back, eps);
        }
    }

    /// All polygons stored across the tree, depth-first: this node's list,
    /// then the front subtree, then the back subtree. Order is stable.
    pub fn all_polygons(&self) -> Vec<Polygon> {
        let mut result = self.polygons.clone();
        if let Some(ref front) = self.front {
            result.extend(front.all_polygons());
        }
        if let Some(ref back) = self.back {
            result.extend(back.all_polygons());
        }
        result
    }

    /// Remove from `polygons` everything inside the solid this tree
    /// represents. Pieces reaching an absent front subtree are kept (outside
    /// by definition); pieces reaching an absent back subtree are discarded
    /// (inside).
    pub fn clip_polygons(&self, polygons: &[Polygon], eps: f64) -> Vec<Polygon> {
        let plane = match self.plane {
            Some(ref plane) => plane,
            None => return polygons.to_vec(),
        };

        let mut coplanar_front = Vec::new();
        let mut coplanar_back = Vec::new();
        let mut front = Vec::new();
        let mut back = Vec::new();
        for polygon in polygons {
            plane.split_polygon(
                polygon,
                eps,
                &mut coplanar_front,
                &mut coplanar_back,
                &mut front,
                &mut back,
            );
        }
        // Coplanar-front rides with the front pieces, coplanar-back with the
        // back pieces (same routing rule as insert)
        front.append(&mut coplanar_front);
        back.append(&mut coplanar_back);

        let mut front = match self.front {
            Some(ref node) => node.clip_polygons(&front, eps),
            None => front,
        };
        let back = match self.back {
            Some(ref node) => node.clip_polygons(&back, eps),
            None => Vec::new(),
        };

        front.extend(back);
        front
    }

    /// New tree containing only the polygons of `self` that lie outside the
    /// solid represented by `other`
    pub fn clip_to(&self, other: &BspNode, eps: f64) -> BspNode {
        BspNode {
            plane: self.plane.clone(),
            polygons: other.clip_polygons(&self.polygons, eps),
            front: self
                .front
                .as_ref()
                .map(|node| Box::new(node.clip_to(other, eps))),
            back: self
                .back
                .as_ref()
                .map(|node| Box::new(node.clip_to(other, eps))),
        }
    }

    /// The complementary solid: every plane and polygon flipped, subtrees
    /// swapped. Inverting twice reproduces the original polygon set.
    pub fn inverted(&self) -> BspNode {
        BspNode {
            plane: self.plane.as_ref().map(Plane::flipped),
            polygons: self.polygons.iter().map(Polygon::flipped).collect(),
            front: self.back.as_ref().map(|node| Box::new(node.inverted())),
            back: self.front.as_ref().map(|node| Box::new(node.inverted())),
        }
    }

    /// Structural concatenation: insert every polygon of `other` into a copy
    /// of this tree
    pub fn merged(&self, other: &BspNode, eps: f64) -> BspNode {
        let mut result = self.clone();
        result.insert(other.all_polygons(), eps);
        result
    }

    pub fn polygon_count(&self) -> usize {
        self.polygons.len()
            + self.front.as_ref().map_or(0, |node| node.polygon_count())
            + self.back.as_ref().map_or(0, |node| node.polygon_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    const EPS: f64 = 1e-5;

    fn unit_cube_polygons() -> Vec<Polygon> {
        cube_polygons(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0))
    }

    fn cube_polygons(min: Point3<f64>, max: Point3<f64>) -> Vec<Polygon> {
        let p = |x: f64, y: f64, z: f64| Point3::new(x, y, z);
        let (x0, y0, z0) = (min.x, min.y, min.z);
        let (x1, y1, z1) = (max.x, max.y, max.z);
        vec![
            Polygon::new(vec![p(x0, y0, z1), p(x1, y0, z1), p(x1, y1, z1), p(x0, y1, z1)]),
            Polygon::new(vec![p(x0, y0, z0), p(x0, y1, z0), p(x1, y1, z0), p(x1, y0, z0)]),
            Polygon::new(vec![p(x1, y0, z0), p(x1, y1, z0), p(x1, y1, z1), p(x1, y0, z1)]),
            Polygon::new(vec![p(x0, y0, z0), p(x0, y0, z1), p(x0, y1, z1), p(x0, y1, z0)]),
            Polygon::new(vec![p(x0, y1, z0), p(x0, y1, z1), p(x1, y1, z1), p(x1, y1, z0)]),
            Polygon::new(vec![p(x0, y0, z0), p(x1, y0, z0), p(x1, y0, z1), p(x0, y0, z1)]),
        ]
    }

    fn vertex_keys(polygons: &[Polygon]) -> Vec<(i64, i64, i64)> {
        let mut keys: Vec<(i64, i64, i64)> = polygons
            .iter()
            .flat_map(|polygon| polygon.vertices.iter())
            .map(|v| {
                (
                    (v.x * 1e4).round() as i64,
                    (v.y * 1e4).round() as i64,
                    (v.z * 1e4).round() as i64,
                )
            })
            .collect();
        keys.sort_unstable();
        keys
    }

    #[test]
    fn test_build_preserves_polygons() {
        let tree = BspNode::new(unit_cube_polygons(), EPS);
        // Axis-aligned cube faces never straddle each other's planes
        assert_eq!(tree.polygon_count(), 6);
        assert_eq!(tree.all_polygons().len(), 6);
    }

    #[test]
    fn test_invert_is_involutive() {
        let tree = BspNode::new(unit_cube_polygons(), EPS);
        let twice = tree.inverted().inverted();
        assert_eq!(
            vertex_keys(&tree.all_polygons()),
            vertex_keys(&twice.all_polygons())
        );
    }

    #[test]
    fn test_invert_flips_normals() {
        let tree = BspNode::new(unit_cube_polygons(), EPS);
        let inverted = tree.inverted();
        for (a, b) in tree
            .all_polygons()
            .iter()
            .zip(inverted.all_polygons().iter())
        {
            assert!((a.plane.normal + b.plane.normal).norm() < 1e-12);
        }
    }

    #[test]
    fn test_clip_discards_contained_polygons() {
        let tree = BspNode::new(unit_cube_polygons(), EPS);
        // Small square strictly inside the cube
        let inside = Polygon::new(vec![
            Point3::new(0.4, 0.4, 0.5),
            Point3::new(0.6, 0.4, 0.5),
            Point3::new(0.6, 0.6, 0.5),
            Point3::new(0.4, 0.6, 0.5),
        ]);
        assert!(tree.clip_polygons(&[inside], EPS).is_empty());

        // Square strictly outside survives unchanged
        let outside = Polygon::new(vec![
            Point3::new(2.0, 0.0, 0.5),
            Point3::new(3.0, 0.0, 0.5),
            Point3::new(3.0, 1.0, 0.5),
            Point3::new(2.0, 1.0, 0.5),
        ]);
        assert_eq!(tree.clip_polygons(&[outside], EPS).len(), 1);
    }

    #[test]
    fn test_clip_splits_straddling_polygon() {
        let tree = BspNode::new(unit_cube_polygons(), EPS);
        // Strip running through the cube; the inside portion must vanish
        let straddling = Polygon::new(vec![
            Point3::new(-1.0, 0.4, 0.5),
            Point3::new(2.0, 0.4, 0.5),
            Point3::new(2.0, 0.6, 0.5),
            Point3::new(-1.0, 0.6, 0.5),
        ]);
        let clipped = tree.clip_polygons(&[straddling], EPS);
        assert!(!clipped.is_empty());
        for polygon in &clipped {
            for v in &polygon.vertices {
                assert!(v.x <= EPS || v.x >= 1.0 - EPS, "vertex inside cube: {v}");
            }
        }
    }

    #[test]
    fn test_merged_concatenates_structurally() {
        let a = BspNode::new(unit_cube_polygons(), EPS);
        let b = BspNode::new(
            cube_polygons(Point3::new(5.0, 0.0, 0.0), Point3::new(6.0, 1.0, 1.0)),
            EPS,
        );
        let merged = a.merged(&b, EPS);
        // Disjoint cubes: nothing splits, both boundaries present
        assert_eq!(merged.all_polygons().len(), 12);
    }
}
