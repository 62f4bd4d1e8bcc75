//! Parallel FP-Growth frequent pattern mining.
//!
//! Given a transaction database and a minimum-support fraction, enumerates
//! every itemset whose occurrence count meets the threshold. The core is an
//! arena-backed FP-tree with a same-item header list, a recursive
//! conditional-tree miner, and a single-path fast path whose power-set
//! enumeration is split across worker threads.
//!
//! ```no_run
//! use fpgrow::fp::{build_fp_tree, fp_growth, min_support_count, CombinationDispatcher};
//! use fpgrow::input::read_transactions;
//! use fpgrow::output::PatternSink;
//!
//! # fn main() -> fpgrow::Result<()> {
//! let (transactions, item_freq) = read_transactions("1,2,3\n1,2\n".as_bytes())?;
//! let min_count = min_support_count(0.5, transactions.len());
//! let tree = build_fp_tree(&transactions, item_freq, min_count);
//!
//! let sink = PatternSink::new(Vec::new());
//! let dispatcher = CombinationDispatcher::new(None);
//! fp_growth(&tree, min_count, transactions.len(), &dispatcher, &sink)?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod datagen;
pub mod fp;
pub mod input;
pub mod output;
pub mod verify;

/// Result type alias for fpgrow operations
pub type Result<T> = anyhow::Result<T>;
