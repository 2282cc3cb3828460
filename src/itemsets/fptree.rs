use std::collections::HashMap;

use crate::{
    support::Threshold,
    types::{ItemCounts, ItemId},
};

pub type NodeId = usize;

pub const ROOT: NodeId = 0;

#[derive(Debug, Clone)]
pub struct FpNode {
    /// `None` only for the synthetic root.
    pub item: Option<ItemId>,
    pub count: u32,
    pub parent: Option<NodeId>,
    pub children: HashMap<ItemId, NodeId>,
    /// Next node carrying the same item.
    pub next: Option<NodeId>,
}

impl FpNode {
    fn new_root() -> Self {
        Self {
            item: None,
            count: 0,
            parent: None,
            children: HashMap::new(),
            next: None,
        }
    }

    fn new_item(item: ItemId, count: u32, parent: NodeId) -> Self {
        Self {
            item: Some(item),
            count,
            parent: Some(parent),
            children: HashMap::new(),
            next: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeaderEntry {
    pub count: u32,
    pub head: Option<NodeId>,
    tail: Option<NodeId>,
}

/// Prefix tree over the frequent items of a (possibly conditional) database.
///
/// Nodes live in one arena and refer to each other by index; node 0 is the
/// root.
#[derive(Debug, Clone)]
pub struct FpTree {
    pub nodes: Vec<FpNode>,
    pub header_table: HashMap<ItemId, HeaderEntry>,
}

impl FpTree {
    /// Builds a tree from weighted paths, or `None` when no item reaches the
    /// threshold.
    pub fn build<'a, I>(paths: I, threshold: &Threshold) -> Option<FpTree>
    where
        I: IntoIterator<Item = (&'a [ItemId], u32)>,
        I::IntoIter: Clone,
    {
        let paths = paths.into_iter();

        let mut item_counts: ItemCounts = HashMap::new();
        for (path, weight) in paths.clone() {
            for &item in path {
                *item_counts.entry(item).or_insert(0) += weight;
            }
        }
        item_counts.retain(|_, &mut count| threshold.is_frequent(count));
        if item_counts.is_empty() {
            return None;
        }

        let mut tree = FpTree {
            nodes: vec![FpNode::new_root()],
            header_table: item_counts
                .iter()
                .map(|(&item, &count)| {
                    let entry = HeaderEntry {
                        count,
                        head: None,
                        tail: None,
                    };
                    (item, entry)
                })
                .collect(),
        };

        let mut ordered: Vec<ItemId> = Vec::new();
        for (path, weight) in paths {
            ordered.clear();
            ordered.extend(path.iter().filter(|item| item_counts.contains_key(*item)));
            // descending support, ties by id: one prefix order for every path
            ordered.sort_unstable_by(|a, b| item_counts[b].cmp(&item_counts[a]).then(a.cmp(b)));
            tree.insert(&ordered, weight);
        }

        Some(tree)
    }

    /// Walks or extends the path from the root, adding `weight` to each node.
    fn insert(&mut self, items: &[ItemId], weight: u32) {
        let mut current = ROOT;
        self.nodes[ROOT].count += weight;

        for &item in items {
            if let Some(&child) = self.nodes[current].children.get(&item) {
                self.nodes[child].count += weight;
                current = child;
            } else {
                let child = self.nodes.len();
                self.nodes.push(FpNode::new_item(item, weight, current));
                self.nodes[current].children.insert(item, child);
                self.link(item, child);
                current = child;
            }
        }
    }

    /// Appends `node` to the sibling chain of `item`.
    fn link(&mut self, item: ItemId, node: NodeId) {
        let entry = match self.header_table.get_mut(&item) {
            Some(entry) => entry,
            None => {
                debug_assert!(false, "item {} has no header entry", item);
                return;
            }
        };
        match entry.tail.replace(node) {
            Some(tail) => self.nodes[tail].next = Some(node),
            None => entry.head = Some(node),
        }
    }

    /// Header items in ascending support, ties by id.
    pub fn items_ascending(&self) -> Vec<(ItemId, u32)> {
        let mut items: Vec<(ItemId, u32)> = self
            .header_table
            .iter()
            .map(|(&item, entry)| (item, entry.count))
            .collect();
        items.sort_unstable_by(|(a, a_count), (b, b_count)| a_count.cmp(b_count).then(a.cmp(b)));
        items
    }

    /// Every node carrying `item`, following the sibling chain.
    pub fn chain(&self, item: ItemId) -> Chain<'_> {
        Chain {
            tree: self,
            next: self.header_table.get(&item).and_then(|entry| entry.head),
        }
    }

    /// Items on the path from `node`'s parent up to (excluding) the root,
    /// leaf side first.
    pub fn prefix_path(&self, node: NodeId) -> Vec<ItemId> {
        let mut path = Vec::new();
        let mut current = self.nodes[node].parent;

        while let Some(index) = current {
            if let Some(item) = self.nodes[index].item {
                path.push(item);
            }
            current = self.nodes[index].parent;
        }

        path
    }

    /// Conditional pattern base of `item`: each prefix path weighted by the
    /// count of the node it leads to.
    pub fn conditional_pattern_base(&self, item: ItemId) -> Vec<(Vec<ItemId>, u32)> {
        self.chain(item)
            .map(|node| (self.prefix_path(node), self.nodes[node].count))
            .filter(|(path, _)| !path.is_empty())
            .collect()
    }
}

pub struct Chain<'a> {
    tree: &'a FpTree,
    next: Option<NodeId>,
}

impl Iterator for Chain<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.nodes[current].next;
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::support::MinSupport;

    fn build(transactions: &[Vec<ItemId>], min_support: f64) -> Option<FpTree> {
        let threshold = Threshold::new(MinSupport::new(min_support).unwrap(), transactions.len());
        FpTree::build(transactions.iter().map(|t| (t.as_slice(), 1)), &threshold)
    }

    #[test]
    fn test_shared_prefix() {
        let tree = build(&[vec![1, 2, 3], vec![1, 2, 4]], 0.5).unwrap();

        // root, 1, 2, 3, 4
        assert_eq!(tree.nodes.len(), 5);
        let node1 = tree.nodes[ROOT].children[&1];
        assert_eq!(tree.nodes[node1].count, 2);
        let node2 = tree.nodes[node1].children[&2];
        assert_eq!(tree.nodes[node2].count, 2);
        assert_eq!(tree.nodes[node2].children.len(), 2);
        assert_eq!(tree.header_table[&4].count, 1);
    }

    #[test]
    fn test_orders_by_support() {
        let tree = build(&[vec![1, 2], vec![2], vec![2, 3]], 0.1).unwrap();

        // 2 is the most frequent, so it sits directly under the root
        assert_eq!(tree.nodes[ROOT].children.len(), 1);
        let node2 = tree.nodes[ROOT].children[&2];
        assert_eq!(tree.nodes[node2].count, 3);
        assert!(tree.nodes[node2].children.contains_key(&1));
        assert!(tree.nodes[node2].children.contains_key(&3));
    }

    #[test]
    fn test_drops_infrequent_items() {
        let tree = build(&[vec![1, 2], vec![1, 3], vec![1]], 0.5).unwrap();

        assert_eq!(tree.header_table.len(), 1);
        assert_eq!(tree.header_table[&1].count, 3);
        assert_eq!(tree.nodes.len(), 2);
    }

    #[test]
    fn test_empty_tree() {
        assert!(build(&[vec![1], vec![2], vec![3]], 0.5).is_none());
        assert!(build(&[vec![]], 0.5).is_none());
    }

    #[test]
    fn test_sibling_chain() {
        let tree = build(&[vec![1, 3], vec![2, 3], vec![1, 2, 3], vec![3]], 0.1).unwrap();

        let nodes: Vec<NodeId> = tree.chain(2).collect();
        let total: u32 = nodes.iter().map(|&node| tree.nodes[node].count).sum();
        assert_eq!(total, tree.header_table[&2].count);
        assert!(nodes.iter().all(|&node| tree.nodes[node].item == Some(2)));
        assert_eq!(tree.chain(42).count(), 0);
    }

    #[test]
    fn test_conditional_pattern_base() {
        let tree = build(&[vec![1, 2, 3], vec![1, 3], vec![2, 3], vec![1, 2]], 0.1).unwrap();

        // supports 1:3 2:3 3:3, so every path runs 1 -> 2 -> 3
        let mut base = tree.conditional_pattern_base(3);
        base.sort();
        assert_eq!(base, vec![(vec![1], 1), (vec![2], 1), (vec![2, 1], 1)]);
    }

    #[test]
    fn test_items_ascending() {
        let tree = build(&[vec![1, 2], vec![2], vec![2, 3], vec![3]], 0.1).unwrap();

        assert_eq!(tree.items_ascending(), vec![(1, 1), (3, 2), (2, 3)]);
    }

    #[test]
    fn test_weighted_paths() {
        let threshold = Threshold::new(MinSupport::new(0.5).unwrap(), 4);
        let paths: Vec<(Vec<ItemId>, u32)> = vec![(vec![1, 2], 2), (vec![2], 1)];
        let tree =
            FpTree::build(paths.iter().map(|(p, w)| (p.as_slice(), *w)), &threshold).unwrap();

        assert_eq!(tree.header_table[&1].count, 2);
        assert_eq!(tree.header_table[&2].count, 3);
        assert_eq!(tree.nodes[ROOT].count, 3);
    }
}
