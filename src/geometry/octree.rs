// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Solidcarve Team

//! Point octree for bounded-box vertex queries during crack repair

use super::bbox::BoundingBox;
use nalgebra::Point3;

/// Leaf capacity before a node subdivides into octants
const LEAF_CAPACITY: usize = 8;

/// Nodes smaller than this never subdivide, so clustered points cannot
/// recurse without bound
const MIN_EXTENT: f64 = 1e-9;

/// Spatial index over a solid's vertex set. Read-only after construction and
/// safe to query from any number of threads.
#[derive(Debug)]
pub struct Octree {
    root: OctreeNode,
}

#[derive(Debug)]
struct OctreeNode {
    bounds: BoundingBox,
    points: Vec<Point3<f64>>,
    /// Empty for a leaf, exactly 8 octants otherwise
    children: Vec<OctreeNode>,
}

impl Octree {
    /// Build an octree over a point set. The root bounds are the cube
    /// enclosing the set's bounding box.
    pub fn build(points: Vec<Point3<f64>>) -> Self {
        let bbox = BoundingBox::from_points(&points);
        let bounds = enclosing_cube(&bbox);
        let mut root = OctreeNode::leaf(bounds);
        for point in points {
            root.insert(point);
        }
        Self { root }
    }

    /// Every indexed point within the given box, bounds inclusive. Subtrees
    /// whose bounds do not intersect the box are pruned.
    pub fn contained(&self, min: &Point3<f64>, max: &Point3<f64>) -> Vec<Point3<f64>> {
        let query = BoundingBox::new(*min, *max);
        let mut result = Vec::new();
        self.root.collect_contained(&query, &mut result);
        result
    }

    pub fn len(&self) -> usize {
        self.root.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn enclosing_cube(bbox: &BoundingBox) -> BoundingBox {
    if bbox.min.x > bbox.max.x {
        // Empty point set
        return BoundingBox::new(Point3::origin(), Point3::origin());
    }
    let center = bbox.center();
    let size = bbox.size();
    let half = size.x.max(size.y).max(size.z) / 2.0 + MIN_EXTENT;
    BoundingBox::new(
        Point3::new(center.x - half, center.y - half, center.z - half),
        Point3::new(center.x + half, center.y + half, center.z + half),
    )
}

impl OctreeNode {
    fn leaf(bounds: BoundingBox) -> Self {
        Self {
            bounds,
            points: Vec::new(),
            children: Vec::new(),
        }
    }

    fn insert(&mut self, point: Point3<f64>) {
        if !self.children.is_empty() {
            let octant = self.octant_of(&point);
            self.children[octant].insert(point);
            return;
        }

        self.points.push(point);
        if self.points.len() > LEAF_CAPACITY && self.bounds.size().x > MIN_EXTENT * 4.0 {
            self.subdivide();
        }
    }

    /// Exactly one child octant per point: ties on the center planes route
    /// toward the upper octant
    fn octant_of(&self, point: &Point3<f64>) -> usize {
        let center = self.bounds.center();
        ((point.x >= center.x) as usize)
            | (((point.y >= center.y) as usize) << 1)
            | (((point.z >= center.z) as usize) << 2)
    }

    fn subdivide(&mut self) {
        let center = self.bounds.center();
        self.children = (0..8)
            .map(|octant| {
                let min = Point3::new(
                    if octant & 1 != 0 { center.x } else { self.bounds.min.x },
                    if octant & 2 != 0 { center.y } else { self.bounds.min.y },
                    if octant & 4 != 0 { center.z } else { self.bounds.min.z },
                );
                let max = Point3::new(
                    if octant & 1 != 0 { self.bounds.max.x } else { center.x },
                    if octant & 2 != 0 { self.bounds.max.y } else { center.y },
                    if octant & 4 != 0 { self.bounds.max.z } else { center.z },
                );
                OctreeNode::leaf(BoundingBox::new(min, max))
            })
            .collect();

        for point in std::mem::take(&mut self.points) {
            let octant = self.octant_of(&point);
            self.children[octant].insert(point);
        }
    }

    fn collect_contained(&self, query: &BoundingBox, result: &mut Vec<Point3<f64>>) {
        if !self.bounds.intersects(query) {
            return;
        }
        for point in &self.points {
            if query.contains_point(point) {
                result.push(*point);
            }
        }
        for child in &self.children {
            child.collect_contained(query, result);
        }
    }

    fn len(&self) -> usize {
        self.points.len() + self.children.iter().map(OctreeNode::len).sum::<usize>()
    }
}
