//! Spatial index of painted objects.
//!
//! An octree over object bounds, used by the wall generator for overlap
//! avoidance and by the circle tools for target gathering. Items are binned
//! by bounds center; node culling inflates the query volume by the largest
//! item half-extent seen, so an item is never missed because its bounds
//! spill out of the octant its center landed in.

use std::collections::HashMap;

use glam::{Quat, Vec3};

use crate::math::Aabb;
use crate::types::ObjectId;

/// Configuration for octree construction.
#[derive(Debug, Clone)]
pub struct OctreeConfig {
    /// Maximum depth of the octree.
    pub max_depth: u32,
    /// Maximum items per leaf node before splitting.
    pub max_items_per_leaf: usize,
    /// Minimum node size (prevents infinite subdivision).
    pub min_node_size: f32,
}

impl Default for OctreeConfig {
    fn default() -> Self {
        Self {
            max_depth: 8,
            max_items_per_leaf: 16,
            min_node_size: 0.01,
        }
    }
}

/// An item stored in the octree: object ID and world bounds.
#[derive(Debug, Clone, Copy)]
struct OctreeItem {
    id: ObjectId,
    bounds: Aabb,
}

#[derive(Debug)]
enum OctreeNode {
    Leaf {
        bounds: Aabb,
        items: Vec<OctreeItem>,
    },
    Internal {
        bounds: Aabb,
        children: Box<[Option<OctreeNode>; 8]>,
    },
}

fn octant_for_point(bounds: &Aabb, point: Vec3) -> usize {
    let center = bounds.center();
    let mut index = 0;
    if point.x >= center.x {
        index |= 1;
    }
    if point.y >= center.y {
        index |= 2;
    }
    if point.z >= center.z {
        index |= 4;
    }
    index
}

fn octant_bounds(bounds: &Aabb, octant: usize) -> Aabb {
    let center = bounds.center();
    let min = Vec3::new(
        if octant & 1 != 0 { center.x } else { bounds.min.x },
        if octant & 2 != 0 { center.y } else { bounds.min.y },
        if octant & 4 != 0 { center.z } else { bounds.min.z },
    );
    let max = Vec3::new(
        if octant & 1 != 0 { bounds.max.x } else { center.x },
        if octant & 2 != 0 { bounds.max.y } else { center.y },
        if octant & 4 != 0 { bounds.max.z } else { center.z },
    );
    Aabb::new(min, max)
}

/// Octree of painted object bounds.
#[derive(Debug)]
pub struct PaintedIndex {
    root: OctreeNode,
    config: OctreeConfig,
    /// World bounds per object, also the source for center lookups on remove.
    locations: HashMap<ObjectId, Aabb>,
    /// Largest half-extent among inserted items, for query inflation.
    max_half_extent: Vec3,
}

impl PaintedIndex {
    /// Create a new empty index covering the given world bounds.
    pub fn new(bounds: Aabb) -> Self {
        Self::with_config(bounds, OctreeConfig::default())
    }

    pub fn with_config(bounds: Aabb, config: OctreeConfig) -> Self {
        Self {
            root: OctreeNode::Leaf {
                bounds,
                items: Vec::new(),
            },
            config,
            locations: HashMap::new(),
            max_half_extent: Vec3::ZERO,
        }
    }

    /// Insert an object with its world bounds. Re-inserting an existing ID
    /// replaces its bounds.
    pub fn insert(&mut self, id: ObjectId, bounds: Aabb) {
        if self.locations.contains_key(&id) {
            self.remove(id);
        }
        self.max_half_extent = self.max_half_extent.max(bounds.half_extents());
        self.locations.insert(id, bounds);
        let config = self.config.clone();
        Self::insert_into_node(&mut self.root, OctreeItem { id, bounds }, 0, &config);
    }

    fn insert_into_node(node: &mut OctreeNode, item: OctreeItem, depth: u32, config: &OctreeConfig) {
        match node {
            OctreeNode::Leaf { bounds, items } => {
                items.push(item);

                if items.len() > config.max_items_per_leaf
                    && depth < config.max_depth
                    && bounds.size().min_element() > config.min_node_size * 2.0
                {
                    let old_items = std::mem::take(items);
                    let old_bounds = *bounds;

                    *node = OctreeNode::Internal {
                        bounds: old_bounds,
                        children: Box::new([None, None, None, None, None, None, None, None]),
                    };

                    for item in old_items {
                        Self::insert_into_node(node, item, depth, config);
                    }
                }
            }
            OctreeNode::Internal { bounds, children } => {
                let octant = octant_for_point(bounds, item.bounds.center());

                if children[octant].is_none() {
                    children[octant] = Some(OctreeNode::Leaf {
                        bounds: octant_bounds(bounds, octant),
                        items: Vec::new(),
                    });
                }

                if let Some(child) = &mut children[octant] {
                    Self::insert_into_node(child, item, depth + 1, config);
                }
            }
        }
    }

    /// Remove an object. Returns false if it was not present.
    pub fn remove(&mut self, id: ObjectId) -> bool {
        let Some(bounds) = self.locations.remove(&id) else {
            return false;
        };
        Self::remove_from_node(&mut self.root, id, bounds.center())
    }

    fn remove_from_node(node: &mut OctreeNode, id: ObjectId, center: Vec3) -> bool {
        match node {
            OctreeNode::Leaf { items, .. } => {
                if let Some(idx) = items.iter().position(|item| item.id == id) {
                    items.swap_remove(idx);
                    return true;
                }
                false
            }
            OctreeNode::Internal { bounds, children } => {
                let octant = octant_for_point(bounds, center);
                if let Some(child) = &mut children[octant] {
                    Self::remove_from_node(child, id, center)
                } else {
                    false
                }
            }
        }
    }

    /// Move an object to new bounds.
    pub fn update(&mut self, id: ObjectId, new_bounds: Aabb) {
        self.remove(id);
        self.insert(id, new_bounds);
    }

    /// World bounds of an indexed object.
    pub fn bounds_of(&self, id: ObjectId) -> Option<Aabb> {
        self.locations.get(&id).copied()
    }

    /// Objects whose bounds intersect the given oriented box, approximated
    /// by the box's enclosing world AABB.
    pub fn query_overlapping(
        &self,
        center: Vec3,
        half_extents: Vec3,
        rotation: Quat,
    ) -> Vec<ObjectId> {
        let local = Aabb::from_center_half_extents(Vec3::ZERO, half_extents);
        let query = local.transformed(center, rotation);
        let mut results = Vec::new();
        Self::query_aabb_node(&self.root, &query, self.max_half_extent, &mut results);
        results.sort_unstable();
        results
    }

    fn query_aabb_node(
        node: &OctreeNode,
        query: &Aabb,
        inflation: Vec3,
        results: &mut Vec<ObjectId>,
    ) {
        let node_bounds = match node {
            OctreeNode::Leaf { bounds, .. } => bounds,
            OctreeNode::Internal { bounds, .. } => bounds,
        };
        if !node_bounds.expanded(inflation).intersects(query) {
            return;
        }
        match node {
            OctreeNode::Leaf { items, .. } => {
                for item in items {
                    if item.bounds.intersects(query) {
                        results.push(item.id);
                    }
                }
            }
            OctreeNode::Internal { children, .. } => {
                for child in children.iter().flatten() {
                    Self::query_aabb_node(child, query, inflation, results);
                }
            }
        }
    }

    /// Objects whose bounds intersect a sphere.
    pub fn query_sphere(&self, center: Vec3, radius: f32) -> Vec<ObjectId> {
        let mut results = Vec::new();
        let inflation = self.max_half_extent;
        Self::query_sphere_node(&self.root, center, radius, inflation, &mut results);
        results.sort_unstable();
        results
    }

    fn query_sphere_node(
        node: &OctreeNode,
        center: Vec3,
        radius: f32,
        inflation: Vec3,
        results: &mut Vec<ObjectId>,
    ) {
        let node_bounds = match node {
            OctreeNode::Leaf { bounds, .. } => bounds,
            OctreeNode::Internal { bounds, .. } => bounds,
        };
        if !node_bounds
            .expanded(inflation)
            .intersects_sphere(center, radius)
        {
            return;
        }
        match node {
            OctreeNode::Leaf { items, .. } => {
                for item in items {
                    if item.bounds.intersects_sphere(center, radius) {
                        results.push(item.id);
                    }
                }
            }
            OctreeNode::Internal { children, .. } => {
                for child in children.iter().flatten() {
                    Self::query_sphere_node(child, center, radius, inflation, results);
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Drop every indexed object, keeping the world bounds.
    pub fn clear(&mut self) {
        let bounds = match &self.root {
            OctreeNode::Leaf { bounds, .. } => *bounds,
            OctreeNode::Internal { bounds, .. } => *bounds,
        };
        self.root = OctreeNode::Leaf {
            bounds,
            items: Vec::new(),
        };
        self.locations.clear();
        self.max_half_extent = Vec3::ZERO;
    }
}

impl Default for PaintedIndex {
    fn default() -> Self {
        Self::new(Aabb::from_center_half_extents(Vec3::ZERO, Vec3::splat(1000.0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_bounds(center: Vec3) -> Aabb {
        Aabb::from_center_half_extents(center, Vec3::splat(0.5))
    }

    #[test]
    fn test_insert_and_query_sphere() {
        let mut index = PaintedIndex::default();
        index.insert(ObjectId(0), unit_bounds(Vec3::new(1.0, 0.0, 1.0)));
        index.insert(ObjectId(1), unit_bounds(Vec3::new(2.0, 0.0, 2.0)));
        index.insert(ObjectId(2), unit_bounds(Vec3::new(50.0, 0.0, 50.0)));

        assert_eq!(index.len(), 3);

        let results = index.query_sphere(Vec3::new(1.5, 0.0, 1.5), 1.5);
        assert!(results.contains(&ObjectId(0)));
        assert!(results.contains(&ObjectId(1)));
        assert!(!results.contains(&ObjectId(2)));
    }

    #[test]
    fn test_query_overlapping_rotated_box() {
        let mut index = PaintedIndex::default();
        index.insert(ObjectId(0), unit_bounds(Vec3::new(3.0, 0.0, 0.0)));

        // A long thin box rotated 90 degrees about Y now extends along X
        let rot = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
        let results = index.query_overlapping(Vec3::ZERO, Vec3::new(0.1, 0.1, 4.0), rot);
        assert!(results.contains(&ObjectId(0)));

        // Unrotated it extends along Z and misses
        let results = index.query_overlapping(Vec3::ZERO, Vec3::new(0.1, 0.1, 4.0), Quat::IDENTITY);
        assert!(results.is_empty());
    }

    #[test]
    fn test_remove() {
        let mut index = PaintedIndex::default();
        index.insert(ObjectId(0), unit_bounds(Vec3::ZERO));
        index.insert(ObjectId(1), unit_bounds(Vec3::new(2.0, 0.0, 0.0)));

        assert!(index.remove(ObjectId(0)));
        assert!(!index.remove(ObjectId(0)));
        assert_eq!(index.len(), 1);

        let results = index.query_sphere(Vec3::ZERO, 5.0);
        assert_eq!(results, vec![ObjectId(1)]);
    }

    #[test]
    fn test_split_keeps_spilling_items_findable() {
        // Enough items to force leaf splits; every one must stay reachable
        let mut index = PaintedIndex::default();
        for i in 0..64 {
            let offset = Vec3::new((i % 8) as f32, 0.0, (i / 8) as f32);
            index.insert(ObjectId(i), unit_bounds(offset));
        }
        for i in 0..64 {
            let offset = Vec3::new((i % 8) as f32, 0.0, (i / 8) as f32);
            let results = index.query_sphere(offset, 0.25);
            assert!(results.contains(&ObjectId(i)), "lost object {i}");
        }
    }

    #[test]
    fn test_update_moves_object() {
        let mut index = PaintedIndex::default();
        index.insert(ObjectId(7), unit_bounds(Vec3::ZERO));
        index.update(ObjectId(7), unit_bounds(Vec3::new(10.0, 0.0, 0.0)));

        assert!(index.query_sphere(Vec3::ZERO, 1.0).is_empty());
        assert_eq!(
            index.query_sphere(Vec3::new(10.0, 0.0, 0.0), 1.0),
            vec![ObjectId(7)]
        );
        assert_eq!(
            index.bounds_of(ObjectId(7)).unwrap().center(),
            Vec3::new(10.0, 0.0, 0.0)
        );
    }
}
