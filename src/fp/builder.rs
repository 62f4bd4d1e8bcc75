use tracing::debug;

use super::freq::{FrequencyTable, Item, Transaction};
use super::tree::FPTree;

/// Build the root FP-tree from the full transaction set.
///
/// Each transaction is pruned to frequent items, ordered by descending global
/// frequency (ties by descending item id) to maximize prefix sharing, and
/// inserted with weight 1. `item_freq` is the global table the input pass
/// produced; the tree takes ownership of it.
pub fn build_fp_tree(
    transactions: &[Transaction],
    item_freq: FrequencyTable,
    min_count: usize,
) -> FPTree {
    let items_by_freq = item_freq.items_by_freq(min_count);
    let mut tree = FPTree::with_order(item_freq, items_by_freq);

    let mut path: Vec<Item> = Vec::new();
    for trxn in transactions {
        path.clear();
        path.extend(
            trxn.iter()
                .copied()
                .filter(|&item| tree.item_freq.is_frequent(item, min_count)),
        );
        path.sort_unstable_by(|&a, &b| tree.item_freq.cmp_desc(a, b));
        if !path.is_empty() {
            tree.insert_path(&path, 1);
        }
    }

    debug!(
        transactions = transactions.len(),
        frequent_items = tree.items_by_freq.len(),
        nodes = tree.nodes.len(),
        "built fp-tree"
    );
    tree
}

/// Build the conditional FP-tree for `base_item`: every prefix path leading
/// to one of its occurrences, with the base item removed and each path
/// weighted by the occurrence's count.
///
/// Two passes over the base item's same-item list. The first accumulates
/// ancestor co-occurrence counts into the new tree's local frequency table;
/// the second collects each occurrence's surviving ancestors and inserts the
/// path, reversed back to root-to-leaf order, at the occurrence's weight.
pub fn build_conditional_fp_tree(tree: &FPTree, base_item: Item, min_count: usize) -> FPTree {
    let mut item_freq = FrequencyTable::new();
    for leaf in tree.item_nodes(base_item) {
        let weight = tree.nodes[leaf].count;
        let mut curr = tree.nodes[leaf].parent;
        while let Some(idx) = curr {
            if let Some(item) = tree.nodes[idx].item {
                item_freq.add(item, weight);
            }
            curr = tree.nodes[idx].parent;
        }
    }

    let items_by_freq = item_freq.items_by_freq(min_count);
    let mut cond = FPTree::with_order(item_freq, items_by_freq);

    let mut path: Vec<Item> = Vec::new();
    for leaf in tree.item_nodes(base_item) {
        let weight = tree.nodes[leaf].count;
        path.clear();
        let mut curr = tree.nodes[leaf].parent;
        while let Some(idx) = curr {
            if let Some(item) = tree.nodes[idx].item {
                if cond.item_freq.is_frequent(item, min_count) {
                    path.push(item);
                }
            }
            curr = tree.nodes[idx].parent;
        }
        if !path.is_empty() {
            // The upward walk yields leaf-to-root order; paths are inserted
            // root-first.
            path.reverse();
            cond.insert_path(&path, weight);
        }
    }
    cond
}
