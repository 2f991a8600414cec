/*!
# Quadtree Spatial Index

Region quadtree over geographic rectangles. Nodes live in an arena and refer
to their four children by index, so the tree owns no pointers.

Each node keeps a bucket of up to `capacity` entries. When a leaf overflows it
splits into four quadrants and every entry that fits entirely inside one
quadrant moves down; entries straddling a split line stay on the parent.
Every entry is stored exactly once, so queries never report duplicates.
*/

use crate::types::GeoRect;

pub const DEFAULT_NODE_CAPACITY: usize = 8;
pub const DEFAULT_MAX_DEPTH: u8 = 18;

/// Index of a node in the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// A stored rectangle and its payload
#[derive(Debug, Clone)]
pub struct Entry<T> {
    pub rect: GeoRect,
    pub value: T,
}

#[derive(Debug, Clone)]
struct Node<T> {
    bounds: GeoRect,
    depth: u8,
    entries: Vec<Entry<T>>,
    children: Option<[NodeId; 4]>,
}

impl<T> Node<T> {
    fn new(bounds: GeoRect, depth: u8) -> Self {
        Self {
            bounds,
            depth,
            entries: Vec::new(),
            children: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Quadtree<T> {
    nodes: Vec<Node<T>>,
    capacity: usize,
    max_depth: u8,
    len: usize,
}

impl<T> Quadtree<T> {
    pub fn new(bounds: GeoRect) -> Self {
        Self::with_limits(bounds, DEFAULT_NODE_CAPACITY, DEFAULT_MAX_DEPTH)
    }

    /// Create a tree with a custom bucket size and depth limit.
    /// A capacity of zero is treated as one.
    pub fn with_limits(bounds: GeoRect, capacity: usize, max_depth: u8) -> Self {
        Self {
            nodes: vec![Node::new(bounds.normalized(), 0)],
            capacity: capacity.max(1),
            max_depth,
            len: 0,
        }
    }

    /// Tree covering longitude [-180, 180] and latitude [-90, 90]
    pub fn world() -> Self {
        Self::new(GeoRect::world())
    }

    pub fn bounds(&self) -> GeoRect {
        self.nodes[0].bounds
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Deepest level reached by any node (root is 0)
    pub fn depth(&self) -> u8 {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }

    pub fn insert(&mut self, rect: GeoRect, value: T) {
        let rect = rect.normalized();
        let place = self.placement(&rect);

        let mut id = Self::root();
        while let Some(child) = self.child_containing(id, &place) {
            id = child;
        }

        self.nodes[id.0].entries.push(Entry { rect, value });
        self.len += 1;
        self.split_if_full(id);
    }

    /// Remove every entry whose stored rectangle equals `rect` exactly and
    /// return their payloads.
    pub fn remove(&mut self, rect: &GeoRect) -> Vec<T> {
        let rect = rect.normalized();
        let place = self.placement(&rect);
        let mut removed = Vec::new();

        // Equal rectangles always follow the same placement path.
        let mut current = Some(Self::root());
        while let Some(id) = current {
            let entries = &mut self.nodes[id.0].entries;
            let mut i = 0;
            while i < entries.len() {
                if entries[i].rect == rect {
                    removed.push(entries.remove(i).value);
                } else {
                    i += 1;
                }
            }
            current = self.child_containing(id, &place);
        }

        self.len -= removed.len();
        removed
    }

    /// All entries whose rectangle intersects `rect`, each reported once.
    /// Order follows node traversal and is not meaningful.
    pub fn query(&self, rect: &GeoRect) -> Vec<&Entry<T>> {
        let rect = rect.normalized();
        let mut hits = Vec::new();
        if !self.bounds().intersects(&rect) {
            return hits;
        }

        let mut stack = vec![Self::root()];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id.0];
            hits.extend(node.entries.iter().filter(|e| e.rect.intersects(&rect)));
            if let Some(children) = node.children {
                stack.extend(
                    children
                        .iter()
                        .rev()
                        .copied()
                        .filter(|c| self.nodes[c.0].bounds.intersects(&rect)),
                );
            }
        }
        hits
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry<T>> {
        self.nodes.iter().flat_map(|n| n.entries.iter())
    }

    pub fn clear(&mut self) {
        let bounds = self.bounds();
        self.nodes.clear();
        self.nodes.push(Node::new(bounds, 0));
        self.len = 0;
    }

    fn root() -> NodeId {
        NodeId(0)
    }

    /// Rectangle used to pick a node: the entry clipped to the tree bounds.
    /// Entries entirely outside the bounds stay on the root.
    fn placement(&self, rect: &GeoRect) -> GeoRect {
        rect.intersection(&self.bounds()).unwrap_or(*rect)
    }

    fn child_containing(&self, id: NodeId, place: &GeoRect) -> Option<NodeId> {
        let children = self.nodes[id.0].children?;
        children
            .into_iter()
            .find(|c| self.nodes[c.0].bounds.contains_rect(place))
    }

    fn split_if_full(&mut self, id: NodeId) {
        let node = &self.nodes[id.0];
        if node.children.is_some()
            || node.entries.len() <= self.capacity
            || node.depth >= self.max_depth
        {
            return;
        }

        let depth = node.depth + 1;
        let quadrants = node.bounds.quadrants();
        let first = self.nodes.len();
        for bounds in quadrants {
            self.nodes.push(Node::new(bounds, depth));
        }
        let children = [
            NodeId(first),
            NodeId(first + 1),
            NodeId(first + 2),
            NodeId(first + 3),
        ];
        self.nodes[id.0].children = Some(children);

        let entries = std::mem::take(&mut self.nodes[id.0].entries);
        let mut kept = Vec::new();
        for entry in entries {
            let place = self.placement(&entry.rect);
            match self.child_containing(id, &place) {
                Some(child) => self.nodes[child.0].entries.push(entry),
                None => kept.push(entry),
            }
        }
        log::trace!(
            "split node {} at depth {}: {} entries kept on parent",
            id.0,
            depth - 1,
            kept.len()
        );
        self.nodes[id.0].entries = kept;

        for child in children {
            self.split_if_full(child);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::footprint;
    use crate::types::{GridPosition, ZoomScale};
    use std::collections::HashSet;

    fn grid_tree(scale: u8) -> Quadtree<GridPosition> {
        let scale = ZoomScale::clamped(scale);
        let n = scale.grid_size() as i32;
        let mut tree = Quadtree::world();
        for y in 0..n {
            for x in 0..n {
                let pos = GridPosition::new(x, y);
                tree.insert(footprint(pos, scale), pos);
            }
        }
        tree
    }

    fn brute_force(tree: &Quadtree<GridPosition>, rect: &GeoRect) -> HashSet<GridPosition> {
        tree.iter()
            .filter(|e| e.rect.intersects(&rect.normalized()))
            .map(|e| e.value)
            .collect()
    }

    #[test]
    fn test_insert_and_query_single() {
        let mut tree = Quadtree::world();
        let rect = GeoRect::new(2.0, 48.0, 1.0, 1.0);
        tree.insert(rect, "paris");

        let hits = tree.query(&GeoRect::new(2.5, 48.5, 0.1, 0.1));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].value, "paris");
        assert_eq!(hits[0].rect, rect);

        assert!(tree.query(&GeoRect::new(10.0, 10.0, 1.0, 1.0)).is_empty());
    }

    #[test]
    fn test_splits_once_capacity_exceeded() {
        let mut tree = Quadtree::with_limits(GeoRect::world(), 2, 8);
        tree.insert(GeoRect::new(-170.0, -80.0, 1.0, 1.0), 1);
        tree.insert(GeoRect::new(170.0, 80.0, 1.0, 1.0), 2);
        assert_eq!(tree.node_count(), 1);

        tree.insert(GeoRect::new(100.0, -40.0, 1.0, 1.0), 3);
        assert!(tree.node_count() > 1);
        assert_eq!(tree.len(), 3);
        assert!(tree.depth() >= 1);
    }

    #[test]
    fn test_straddling_entry_stays_on_parent_and_is_found() {
        let mut tree = Quadtree::with_limits(GeoRect::world(), 1, 8);
        for i in 0..6 {
            tree.insert(GeoRect::new(10.0 + i as f64, 10.0, 0.5, 0.5), i);
        }
        // Crosses the prime meridian and the equator.
        tree.insert(GeoRect::new(-1.0, -1.0, 2.0, 2.0), 99);

        let hits = tree.query(&GeoRect::new(-0.5, -0.5, 0.1, 0.1));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].value, 99);
    }

    #[test]
    fn test_query_matches_brute_force() {
        let tree = grid_tree(4);
        assert_eq!(tree.len(), 256);

        let queries = [
            GeoRect::new(-10.0, 40.0, 25.0, 15.0),
            GeoRect::new(-180.0, -90.0, 360.0, 180.0),
            GeoRect::new(100.0, -60.0, 0.01, 0.01),
            GeoRect::new(30.0, 10.0, -50.0, -30.0),
            GeoRect::new(-179.0, 84.0, 2.0, 2.0),
        ];
        for q in &queries {
            let got: Vec<GridPosition> = tree.query(q).into_iter().map(|e| e.value).collect();
            let unique: HashSet<GridPosition> = got.iter().copied().collect();
            assert_eq!(got.len(), unique.len(), "duplicate hits for {:?}", q);
            assert_eq!(unique, brute_force(&tree, q), "mismatch for {:?}", q);
        }
    }

    #[test]
    fn test_query_outside_world_is_empty() {
        let tree = grid_tree(2);
        assert!(tree.query(&GeoRect::new(200.0, 0.0, 10.0, 10.0)).is_empty());
        assert!(tree.query(&GeoRect::new(0.0, 95.0, 10.0, 10.0)).is_empty());
    }

    #[test]
    fn test_remove_exact_rect() {
        let mut tree = grid_tree(3);
        let scale = ZoomScale::clamped(3);
        let target = GridPosition::new(5, 2);
        let rect = footprint(target, scale);

        let removed = tree.remove(&rect);
        assert_eq!(removed, vec![target]);
        assert_eq!(tree.len(), 63);
        assert!(tree.query(&rect).iter().all(|e| e.value != target));

        // Nearly equal is not equal.
        let shifted = GeoRect::new(rect.x + 1e-9, rect.y, rect.width, rect.height);
        assert!(tree.remove(&shifted).is_empty());
        assert_eq!(tree.len(), 63);
    }

    #[test]
    fn test_remove_then_insert_replaces() {
        let mut tree = Quadtree::world();
        let rect = GeoRect::new(5.0, 5.0, 1.0, 1.0);
        tree.insert(rect, "old");
        tree.remove(&rect);
        tree.insert(rect, "new");

        let hits = tree.query(&rect);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].value, "new");
    }

    #[test]
    fn test_negative_sizes_are_normalized() {
        let mut tree = Quadtree::world();
        tree.insert(GeoRect::new(6.0, 6.0, -1.0, -1.0), 1);
        let stored = tree.iter().next().map(|e| e.rect);
        assert_eq!(stored, Some(GeoRect::new(5.0, 5.0, 1.0, 1.0)));
        assert_eq!(tree.remove(&GeoRect::new(5.0, 5.0, 1.0, 1.0)), vec![1]);
    }

    #[test]
    fn test_entry_partly_outside_world_is_indexed() {
        let mut tree = Quadtree::with_limits(GeoRect::world(), 1, 4);
        tree.insert(GeoRect::new(-10.0, 85.0, 5.0, 10.0), "north");
        tree.insert(GeoRect::new(50.0, -50.0, 1.0, 1.0), "south");
        tree.insert(GeoRect::new(60.0, -50.0, 1.0, 1.0), "south2");

        let hits = tree.query(&GeoRect::new(-8.0, 89.0, 1.0, 0.5));
        assert_eq!(hits.len(), 1);
        assert_eq!(tree.remove(&GeoRect::new(-10.0, 85.0, 5.0, 10.0)), vec!["north"]);
    }

    #[test]
    fn test_depth_limit_keeps_overflow_on_leaf() {
        let mut tree = Quadtree::with_limits(GeoRect::world(), 1, 0);
        for i in 0..10 {
            tree.insert(GeoRect::new(i as f64, 0.0, 0.5, 0.5), i);
        }
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.query(&GeoRect::world()).len(), 10);
    }

    #[test]
    fn test_clear() {
        let mut tree = grid_tree(2);
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.node_count(), 1);
        assert!(tree.query(&GeoRect::world()).is_empty());
    }
}
