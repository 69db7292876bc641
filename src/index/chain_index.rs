use geo_types::Coord;
use rstar::{RTree, AABB};

use super::monotone_chain::{monotone_chain_ranges, MonotoneChain};

/// R-tree over the monotone chains of a set of segment strings.
///
/// The index is built once per noding pass and never updated; callers that
/// change the segment strings rebuild it.
pub struct ChainIndex {
    tree: RTree<MonotoneChain>,
}

impl ChainIndex {
    /// Builds the index. Chains record the position of their string in `strings`.
    pub fn build<'a, I>(strings: I) -> Self
    where
        I: IntoIterator<Item = &'a [Coord<f64>]>,
    {
        let mut chains = Vec::new();
        for (string_idx, coords) in strings.into_iter().enumerate() {
            for (start, end) in monotone_chain_ranges(coords) {
                let id = chains.len();
                chains.push(MonotoneChain::new(id, string_idx, coords, start, end));
            }
        }
        log::trace!("chain index: {} chains", chains.len());
        Self {
            tree: RTree::bulk_load(chains),
        }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// All chains whose envelope intersects `envelope`, boundary contact included.
    pub fn query<'a>(
        &'a self,
        envelope: &'a AABB<[f64; 2]>,
    ) -> impl Iterator<Item = &'a MonotoneChain> + 'a {
        self.tree.locate_in_envelope_intersecting(envelope)
    }

    /// Every unordered pair of distinct chains with intersecting envelopes, once.
    pub fn candidate_pairs(&self) -> Vec<(&MonotoneChain, &MonotoneChain)> {
        self.tree
            .intersection_candidates_with_other_tree(&self.tree)
            .filter(|(a, b)| a.id < b.id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coords(pts: &[(f64, f64)]) -> Vec<Coord<f64>> {
        pts.iter().map(|&(x, y)| Coord { x, y }).collect()
    }

    #[test]
    fn test_query_has_no_false_negatives() {
        let a = coords(&[(0.0, 0.0), (10.0, 0.0)]);
        let b = coords(&[(10.0, 0.0), (10.0, 10.0)]);
        let c = coords(&[(20.0, 20.0), (30.0, 30.0)]);
        let index = ChainIndex::build([a.as_slice(), b.as_slice(), c.as_slice()]);
        assert_eq!(index.len(), 3);

        // Touching only at a corner still counts.
        let env = AABB::from_corners([10.0, 0.0], [10.0, 0.0]);
        let mut hits: Vec<usize> = index.query(&env).map(|ch| ch.string).collect();
        hits.sort();
        assert_eq!(hits, vec![0, 1]);
    }

    #[test]
    fn test_candidate_pairs_are_unique() {
        let a = coords(&[(0.0, 0.0), (10.0, 10.0)]);
        let b = coords(&[(0.0, 10.0), (10.0, 0.0)]);
        let c = coords(&[(0.0, 5.0), (10.0, 5.0)]);
        let index = ChainIndex::build([a.as_slice(), b.as_slice(), c.as_slice()]);
        let pairs = index.candidate_pairs();
        assert_eq!(pairs.len(), 3);
        assert!(pairs.iter().all(|(x, y)| x.id < y.id));
    }

    #[test]
    fn test_self_chains_of_one_string_are_paired() {
        let edge = coords(&[(0.0, 0.0), (10.0, 0.0), (5.0, 5.0), (5.0, -5.0)]);
        let index = ChainIndex::build([edge.as_slice()]);
        assert_eq!(index.len(), 3);
        let pairs = index.candidate_pairs();
        // chain 0 (bottom) overlaps both others, chain 1 and 2 share (5,5).
        assert_eq!(pairs.len(), 3);
    }
}
