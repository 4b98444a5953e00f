// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Solidcarve Team

//! Geometry module - planes, polygons, BSP trees, and the octree repair index

mod bbox;
mod bsp;
mod octree;
mod plane;
mod polygon;
mod repair;

pub mod parallel;

pub use bbox::BoundingBox;
pub use bsp::BspNode;
pub use octree::Octree;
pub use plane::{Plane, PolygonClass};
pub use polygon::{Facet, Polygon};
pub use repair::repair_facets;
