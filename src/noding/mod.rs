//! Noding: computing the points where segment strings meet and splitting
//! the strings there so that the pieces only touch at their endpoints.

pub mod extract;
pub mod intersection_adder;
pub mod mc_index_noder;
pub mod node_list;
pub mod scaled_noder;
pub mod segment_string;
pub mod snapround;
pub mod validator;

pub use mc_index_noder::McIndexNoder;
pub use node_list::{SegmentNode, SegmentNodeList};
pub use scaled_noder::ScaledNoder;
pub use segment_string::{Fragment, NodedSegmentString};
pub use snapround::{SnapRoundingNoder, SnapRoundingReport};
pub use validator::NodingValidator;

use crate::error::Result;

/// A noding strategy.
///
/// `compute_nodes` takes ownership of the input strings and runs to
/// completion; `noded_substrings` then hands back the split result. The
/// second call consumes the retained strings.
pub trait Noder<D> {
    fn compute_nodes(&mut self, strings: Vec<NodedSegmentString<D>>) -> Result<()>;

    fn noded_substrings(&mut self) -> Result<Vec<NodedSegmentString<D>>>;

    /// Runs both steps.
    fn node(&mut self, strings: Vec<NodedSegmentString<D>>) -> Result<Vec<NodedSegmentString<D>>> {
        self.compute_nodes(strings)?;
        self.noded_substrings()
    }
}

impl<D, N: Noder<D> + ?Sized> Noder<D> for Box<N> {
    fn compute_nodes(&mut self, strings: Vec<NodedSegmentString<D>>) -> Result<()> {
        (**self).compute_nodes(strings)
    }

    fn noded_substrings(&mut self) -> Result<Vec<NodedSegmentString<D>>> {
        (**self).noded_substrings()
    }
}

/// Splits every string, preserving input order.
pub(crate) fn split_all<D: Clone>(strings: Vec<NodedSegmentString<D>>) -> Vec<NodedSegmentString<D>> {
    let mut out = Vec::with_capacity(strings.len() * 2);
    for ss in strings {
        out.extend(ss.split());
    }
    out
}

#[cfg(test)]
mod tests;
