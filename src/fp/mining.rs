use std::io::Write;

use tracing::debug;

use crate::output::{PatternBuffer, PatternSink};
use crate::Result;

use super::builder::build_conditional_fp_tree;
use super::freq::Item;
use super::parallel::CombinationDispatcher;
use super::tree::FPTree;

/// Mine every frequent pattern of `tree` into `sink`.
///
/// `min_count` is the absolute support threshold and `num_transactions` the
/// denominator for emitted support fractions. Output order across patterns is
/// unspecified.
pub fn fp_growth<W: Write + Send>(
    tree: &FPTree,
    min_count: usize,
    num_transactions: usize,
    dispatcher: &CombinationDispatcher,
    sink: &PatternSink<W>,
) -> Result<()> {
    debug!(
        frequent_items = tree.items_by_freq.len(),
        workers = dispatcher.workers(),
        "mining"
    );
    let mut base: Vec<Item> = Vec::new();
    let mut buffer = PatternBuffer::new(dispatcher.flush_capacity(), num_transactions);
    grow(tree, min_count, &mut base, dispatcher, sink, &mut buffer)?;
    buffer.flush(sink)?;
    Ok(())
}

/// One recursion frame of FP-Growth over `tree`, with `base` holding the
/// items already peeled off by enclosing frames.
///
/// A single-path tree hands its chain to the combination dispatcher. A
/// multi-path tree iterates its frequent items in ascending frequency,
/// peeling the rarest item first so each conditional pass walks the shortest
/// same-item list at this level, and emits {base ∪ item} before descending
/// into the item's conditional tree. The conditional tree is dropped when its
/// frame exits, so live memory follows recursion depth, not pattern volume.
fn grow<W: Write + Send>(
    tree: &FPTree,
    min_count: usize,
    base: &mut Vec<Item>,
    dispatcher: &CombinationDispatcher,
    sink: &PatternSink<W>,
    buffer: &mut PatternBuffer,
) -> Result<()> {
    if tree.has_single_path() {
        let chain = tree.single_path_chain();
        return dispatcher.enumerate(&chain, base, sink, buffer);
    }

    for &item in tree.items_by_freq.iter().rev() {
        buffer.record(sink, base, &[item], tree.item_freq.count(item))?;
        let cond = build_conditional_fp_tree(tree, item, min_count);
        if !cond.is_empty() {
            base.push(item);
            grow(&cond, min_count, base, dispatcher, sink, buffer)?;
            base.pop();
        }
    }
    Ok(())
}
