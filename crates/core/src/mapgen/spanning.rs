//! Minimum spanning tree over entrance points, used to decide which corridors to carve.

use crate::types::Pos;

/// Kruskal over the complete graph of `points` with Euclidean weights.
///
/// Edges come back in acceptance order. Ties keep enumeration order
/// (first point index, then second) because the sort is stable.
pub fn minimum_spanning_tree(points: &[Pos]) -> Vec<(Pos, Pos)> {
    let mut edges = Vec::with_capacity(points.len() * points.len().saturating_sub(1) / 2);
    for (i, first) in points.iter().enumerate() {
        for (j, second) in points.iter().enumerate().skip(i + 1) {
            edges.push((first.distance_squared(*second), i, j));
        }
    }
    edges.sort_by_key(|&(weight, _, _)| weight);

    let mut components = DisjointSet::new(points.len());
    let mut tree = Vec::with_capacity(points.len().saturating_sub(1));
    for (_, i, j) in edges {
        if components.union(i, j) {
            tree.push((points[i], points[j]));
            if tree.len() + 1 == points.len() {
                break;
            }
        }
    }
    tree
}

pub fn total_weight(edges: &[(Pos, Pos)]) -> f64 {
    edges.iter().map(|(from, to)| from.distance(*to)).sum()
}

struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    fn new(len: usize) -> Self {
        Self { parent: (0..len).collect() }
    }

    fn find(&mut self, node: usize) -> usize {
        let mut root = node;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut current = node;
        while self.parent[current] != root {
            let next = self.parent[current];
            self.parent[current] = root;
            current = next;
        }
        root
    }

    /// Returns `false` when both nodes were already in one component.
    fn union(&mut self, left: usize, right: usize) -> bool {
        let left_root = self.find(left);
        let right_root = self.find(right);
        if left_root == right_root {
            return false;
        }
        self.parent[left_root] = right_root;
        true
    }
}
