pub mod builder;
pub mod combinations;
pub mod freq;
pub mod mining;
pub mod parallel;
pub mod tree;


pub use builder::{build_conditional_fp_tree, build_fp_tree};
pub use freq::{min_support_count, FrequencyTable, Item, Transaction};
pub use mining::fp_growth;
pub use parallel::CombinationDispatcher;
pub use tree::{FPNode, FPTree};
