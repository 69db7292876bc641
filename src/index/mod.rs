pub mod chain_index;
pub mod monotone_chain;

pub use chain_index::ChainIndex;
pub use monotone_chain::{monotone_chain_ranges, MonotoneChain};
