use std::collections::HashMap;

use super::freq::{FrequencyTable, Item};

/// Arena index of the sentinel root.
pub const ROOT: usize = 0;

/// One tree position: an item occurring at the end of one specific prefix
/// path. Links are arena indices into the owning tree's node vector.
#[derive(Debug, Clone)]
pub struct FPNode {
    /// `None` only for the sentinel root.
    pub item: Option<Item>,
    /// Number of transactions passing through this exact path prefix.
    pub count: usize,
    pub parent: Option<usize>,
    /// Next node carrying the same item; threads the header table's list.
    pub next: Option<usize>,
    pub children: HashMap<Item, usize>,
}

impl FPNode {
    fn new_root() -> Self {
        Self {
            item: None,
            count: 0,
            parent: None,
            next: None,
            children: HashMap::new(),
        }
    }

    fn new_item(item: Item, parent: usize) -> Self {
        Self {
            item: Some(item),
            count: 0,
            parent: Some(parent),
            next: None,
            children: HashMap::new(),
        }
    }
}

/// Prefix-sharing tree over one (possibly conditional) transaction set.
///
/// Nodes live in a single arena vector; dropping the tree frees every path at
/// once. The header table maps each item to the head of its same-item list,
/// and the tail table extends that list during insertion without re-scanning.
#[derive(Debug, Clone)]
pub struct FPTree {
    pub nodes: Vec<FPNode>,
    pub header_table: HashMap<Item, usize>,
    tail_table: HashMap<Item, usize>,
    /// Occurrence counts local to this tree's transaction set.
    pub item_freq: FrequencyTable,
    /// Frequent items in descending-count order, ties by descending item id.
    pub items_by_freq: Vec<Item>,
    single_path: bool,
}

impl FPTree {
    /// An empty tree carrying its own frequency table and mining order.
    pub fn with_order(item_freq: FrequencyTable, items_by_freq: Vec<Item>) -> Self {
        Self {
            nodes: vec![FPNode::new_root()],
            header_table: HashMap::new(),
            tail_table: HashMap::new(),
            item_freq,
            items_by_freq,
            single_path: true,
        }
    }

    /// Insert one already-pruned, already-ordered item path, adding `weight`
    /// to every node along it.
    ///
    /// `weight` is 1 for raw transactions and an occurrence count when the
    /// conditional builder merges weighted paths.
    pub fn insert_path(&mut self, items: &[Item], weight: usize) {
        let mut curr = ROOT;
        for &item in items {
            let next = match self.nodes[curr].children.get(&item) {
                Some(&child) => child,
                None => {
                    // Invariant: the flag drops the moment any node gains a
                    // second child, so no traversal ever has to test it.
                    if !self.nodes[curr].children.is_empty() {
                        self.single_path = false;
                    }
                    let node_idx = self.nodes.len();
                    self.nodes.push(FPNode::new_item(item, curr));
                    self.nodes[curr].children.insert(item, node_idx);
                    match self.tail_table.insert(item, node_idx) {
                        Some(tail) => self.nodes[tail].next = Some(node_idx),
                        None => {
                            self.header_table.insert(item, node_idx);
                        }
                    }
                    node_idx
                }
            };
            self.nodes[next].count += weight;
            curr = next;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes[ROOT].children.is_empty()
    }

    /// True when no node has more than one child. Maintained incrementally by
    /// `insert_path`; an empty tree counts as a single path.
    pub fn has_single_path(&self) -> bool {
        self.single_path
    }

    /// Node indices carrying `item`, in insertion order.
    pub fn item_nodes(&self, item: Item) -> ItemNodes<'_> {
        ItemNodes {
            tree: self,
            next: self.header_table.get(&item).copied(),
        }
    }

    /// The root-to-leaf chain of a single-path tree as (item, count) pairs.
    pub fn single_path_chain(&self) -> Vec<(Item, usize)> {
        debug_assert!(self.single_path);
        let mut chain = Vec::new();
        let mut curr = ROOT;
        while let Some(&child) = self.nodes[curr].children.values().next() {
            let node = &self.nodes[child];
            if let Some(item) = node.item {
                chain.push((item, node.count));
            }
            curr = child;
        }
        chain
    }
}

/// Iterator over one item's same-item linked list.
pub struct ItemNodes<'a> {
    tree: &'a FPTree,
    next: Option<usize>,
}

impl Iterator for ItemNodes<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let curr = self.next?;
        self.next = self.tree.nodes[curr].next;
        Some(curr)
    }
}
