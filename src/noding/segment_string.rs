use geo::Line;
use geo_types::{Coord, LineString};

use super::node_list::{SegmentNode, SegmentNodeList};
use crate::error::{NodingError, Result};
use crate::precision::PrecisionModel;

/// One input edge: an immutable coordinate backbone, an opaque context value
/// identifying where it came from, and the nodes found on it so far.
#[derive(Clone, Debug)]
pub struct NodedSegmentString<D = ()> {
    coords: Vec<Coord<f64>>,
    data: D,
    nodes: SegmentNodeList,
}

/// A piece of a segment string between two consecutive nodes (or a node and
/// a vertex), tagged with the parent segment it lies on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fragment {
    pub segment_index: usize,
    pub start: Coord<f64>,
    pub end: Coord<f64>,
}

impl<D> NodedSegmentString<D> {
    /// Creates a segment string carrying its two boundary nodes.
    pub fn new(coords: Vec<Coord<f64>>, data: D) -> Result<Self> {
        if coords.len() < 2 {
            return Err(NodingError::TooFewPoints(coords.len()));
        }
        let mut ss = Self {
            coords,
            data,
            nodes: SegmentNodeList::new(),
        };
        ss.add_boundary_nodes();
        Ok(ss)
    }

    pub fn from_line_string(ls: LineString<f64>, data: D) -> Result<Self> {
        Self::new(ls.0, data)
    }

    fn add_boundary_nodes(&mut self) {
        let last = self.coords.len() - 1;
        self.add_node(self.coords[0], 0);
        self.add_node(self.coords[last], last);
    }

    pub fn coords(&self) -> &[Coord<f64>] {
        &self.coords
    }

    pub fn data(&self) -> &D {
        &self.data
    }

    pub fn into_data(self) -> D {
        self.data
    }

    /// Coordinates and context; the node list is discarded.
    pub fn into_parts(self) -> (Vec<Coord<f64>>, D) {
        (self.coords, self.data)
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    /// Always false; a segment string has at least two vertices.
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    pub fn segment_count(&self) -> usize {
        self.coords.len() - 1
    }

    pub fn segment(&self, index: usize) -> Line<f64> {
        Line::new(self.coords[index], self.coords[index + 1])
    }

    pub fn is_closed(&self) -> bool {
        self.coords.first() == self.coords.last()
    }

    pub fn node_list(&self) -> &SegmentNodeList {
        &self.nodes
    }

    pub fn to_line_string(&self) -> LineString<f64> {
        LineString::new(self.coords.clone())
    }

    /// Adds a node at `coord` on segment `segment_index`.
    ///
    /// `coord` is taken as already lying on (or snapped next to) the segment;
    /// it is not projected. A node equal to the segment's end vertex is
    /// stored against the next segment so both spellings unify.
    /// Returns whether a new node was inserted.
    pub fn add_node(&mut self, coord: Coord<f64>, segment_index: usize) -> bool {
        let node = self.make_node(coord, segment_index);
        let inserted = self.nodes.insert(node);
        if inserted {
            log::trace!("node {:?} on segment {}", coord, node.segment_index);
        }
        inserted
    }

    /// True if a node at `coord` on `segment_index` is already present.
    pub fn has_node(&self, coord: Coord<f64>, segment_index: usize) -> bool {
        self.nodes.contains(&self.make_node(coord, segment_index))
    }

    fn make_node(&self, coord: Coord<f64>, segment_index: usize) -> SegmentNode {
        let last = self.coords.len() - 1;
        let mut index = segment_index.min(last);
        if index < last && coord == self.coords[index + 1] {
            index += 1;
        }
        let fraction = if index == last {
            0.0
        } else {
            segment_fraction(self.coords[index], self.coords[index + 1], coord)
        };
        SegmentNode {
            coord,
            segment_index: index,
            fraction,
        }
    }

    /// Rounds every node to `precision`, merging nodes that become equal.
    pub fn round_nodes(&mut self, precision: &PrecisionModel) {
        if precision.is_floating() {
            return;
        }
        for node in self.nodes.take() {
            self.add_node(precision.make_precise(node.coord), node.segment_index);
        }
    }

    /// The noded polyline as consecutive sub-segments, each on one parent
    /// segment. Zero-length pieces are skipped.
    pub fn fragments(&self) -> Vec<Fragment> {
        let mut out = Vec::with_capacity(self.nodes.len() + self.coords.len());
        let mut nodes = self.nodes.iter().peekable();
        while let Some(n0) = nodes.next() {
            let Some(n1) = nodes.peek() else { break };
            let mut prev = n0.coord;
            let mut seg = n0.segment_index;
            for k in (n0.segment_index + 1)..=n1.segment_index {
                let v = self.coords[k];
                if v != prev {
                    out.push(Fragment { segment_index: seg, start: prev, end: v });
                }
                prev = v;
                seg = k;
            }
            if n1.coord != prev {
                out.push(Fragment { segment_index: seg, start: prev, end: n1.coord });
            }
        }
        out
    }

    /// Coordinates of the piece between two consecutive nodes: the start
    /// node, every parent vertex strictly between them, and the end node,
    /// with repeated points removed.
    fn split_coords(&self, n0: &SegmentNode, n1: &SegmentNode) -> Vec<Coord<f64>> {
        let mut pts = Vec::with_capacity(n1.segment_index - n0.segment_index + 2);
        pts.push(n0.coord);
        for k in (n0.segment_index + 1)..=n1.segment_index {
            pts.push(self.coords[k]);
        }
        pts.push(n1.coord);
        pts.dedup();
        pts
    }

    /// The node list as a polyline: parent vertices with node coordinates
    /// interleaved in node order.
    pub fn noded_coords(&self) -> Vec<Coord<f64>> {
        let mut pts: Vec<Coord<f64>> = Vec::with_capacity(self.coords.len() + self.nodes.len());
        let mut nodes = self.nodes.iter().peekable();
        while let Some(n0) = nodes.next() {
            let Some(n1) = nodes.peek() else { break };
            let piece = self.split_coords(n0, n1);
            let skip = usize::from(!pts.is_empty());
            pts.extend(piece.into_iter().skip(skip));
        }
        pts
    }
}

impl<D: Clone> NodedSegmentString<D> {
    /// Splits the string at its nodes, consuming it.
    ///
    /// Yields one piece per consecutive pair of nodes across the whole
    /// string. Each piece carries a clone of the context. Pieces that
    /// collapse to a single point after rounding are dropped.
    pub fn split(self) -> Vec<NodedSegmentString<D>> {
        let mut pieces = Vec::with_capacity(self.nodes.len().saturating_sub(1));
        let mut nodes = self.nodes.iter().peekable();
        while let Some(n0) = nodes.next() {
            let Some(n1) = nodes.peek() else { break };
            let pts = self.split_coords(n0, n1);
            match NodedSegmentString::new(pts, self.data.clone()) {
                Ok(piece) => pieces.push(piece),
                Err(_) => log::debug!("dropping collapsed piece at {:?}", n0.coord),
            }
        }
        pieces
    }
}

/// Projection parameter of `p` onto segment `a -> b`, clamped to [0, 1].
fn segment_fraction(a: Coord<f64>, b: Coord<f64>, p: Coord<f64>) -> f64 {
    if p == a {
        return 0.0;
    }
    if p == b {
        return 1.0;
    }
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len2 = dx * dx + dy * dy;
    if len2 == 0.0 {
        return 0.0;
    }
    let t = ((p.x - a.x) * dx + (p.y - a.y) * dy) / len2;
    t.clamp(0.0, 1.0)
}

#[cfg(test)]
#[path = "segment_string_tests.rs"]
mod tests;
