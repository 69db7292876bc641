use std::cmp::Ordering;

use geo_types::Coord;

/// A node located on segment `segment_index` of its segment string.
///
/// `fraction` is the position along that segment (0 at its start vertex,
/// 1 at its end vertex) and only serves to order nodes on the same segment.
#[derive(Clone, Copy, Debug)]
pub struct SegmentNode {
    pub coord: Coord<f64>,
    pub segment_index: usize,
    pub fraction: f64,
}

impl SegmentNode {
    /// Ordering key: segment index, fraction, then x and y so that nodes
    /// projecting to the same fraction still have a total order.
    fn cmp_key(&self, other: &SegmentNode) -> Ordering {
        self.segment_index
            .cmp(&other.segment_index)
            .then_with(|| signless(self.fraction).total_cmp(&signless(other.fraction)))
            .then_with(|| signless(self.coord.x).total_cmp(&signless(other.coord.x)))
            .then_with(|| signless(self.coord.y).total_cmp(&signless(other.coord.y)))
    }
}

/// `total_cmp` orders -0.0 before 0.0; adding 0.0 maps -0.0 to 0.0.
#[inline]
fn signless(v: f64) -> f64 {
    v + 0.0
}

impl PartialEq for SegmentNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp_key(other) == Ordering::Equal
    }
}

impl Eq for SegmentNode {}

impl PartialOrd for SegmentNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SegmentNode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cmp_key(other)
    }
}

/// Sorted, duplicate-free list of the nodes of one segment string.
///
/// Nodes live in a flat `Vec` kept in order, so merging nodes from several
/// passes is a binary search and an insert.
#[derive(Clone, Debug, Default)]
pub struct SegmentNodeList {
    nodes: Vec<SegmentNode>,
}

impl SegmentNodeList {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Inserts `node` unless an equal node is present. Returns whether it was inserted.
    pub fn insert(&mut self, node: SegmentNode) -> bool {
        match self.nodes.binary_search(&node) {
            Ok(_) => false,
            Err(pos) => {
                self.nodes.insert(pos, node);
                true
            }
        }
    }

    pub fn contains(&self, node: &SegmentNode) -> bool {
        self.nodes.binary_search(node).is_ok()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SegmentNode> {
        self.nodes.iter()
    }

    pub fn first(&self) -> Option<&SegmentNode> {
        self.nodes.first()
    }

    pub fn last(&self) -> Option<&SegmentNode> {
        self.nodes.last()
    }

    pub(crate) fn take(&mut self) -> Vec<SegmentNode> {
        std::mem::take(&mut self.nodes)
    }
}

impl<'a> IntoIterator for &'a SegmentNodeList {
    type Item = &'a SegmentNode;
    type IntoIter = std::slice::Iter<'a, SegmentNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(seg: usize, fraction: f64, x: f64, y: f64) -> SegmentNode {
        SegmentNode { coord: Coord { x, y }, segment_index: seg, fraction }
    }

    #[test]
    fn test_insert_keeps_order() {
        let mut list = SegmentNodeList::new();
        assert!(list.insert(node(1, 0.5, 5.0, 0.0)));
        assert!(list.insert(node(0, 0.0, 0.0, 0.0)));
        assert!(list.insert(node(1, 0.25, 2.5, 0.0)));
        assert!(list.insert(node(2, 0.0, 10.0, 0.0)));

        let order: Vec<(usize, f64)> = list.iter().map(|n| (n.segment_index, n.fraction)).collect();
        assert_eq!(order, vec![(0, 0.0), (1, 0.25), (1, 0.5), (2, 0.0)]);
    }

    #[test]
    fn test_duplicates_are_unified() {
        let mut list = SegmentNodeList::new();
        assert!(list.insert(node(3, 0.5, 1.0, 1.0)));
        assert!(!list.insert(node(3, 0.5, 1.0, 1.0)));
        assert_eq!(list.len(), 1);
        assert!(list.contains(&node(3, 0.5, 1.0, 1.0)));
    }

    #[test]
    fn test_same_fraction_distinct_coords_are_kept() {
        let mut list = SegmentNodeList::new();
        assert!(list.insert(node(0, 0.5, 1.0, 2.0)));
        assert!(list.insert(node(0, 0.5, 2.0, 1.0)));
        assert_eq!(list.len(), 2);
        assert_eq!(list.first().map(|n| n.coord.x), Some(1.0));
    }
}
