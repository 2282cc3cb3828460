use std::collections::HashMap;

use log::debug;

use crate::{
    itemsets::fptree::FpTree,
    support::{validate, MinSupport, MiningError, Threshold},
    transactions::canonicalize,
    types::{FrequentItemsets, ItemId, Itemset, Transaction},
};

/// FP-Growth. Invalid parameters yield an empty result.
pub fn mine(transactions: &[Transaction], min_support: f64) -> FrequentItemsets {
    try_mine(transactions, min_support).unwrap_or_default()
}

pub fn try_mine(
    transactions: &[Transaction],
    min_support: f64,
) -> Result<FrequentItemsets, MiningError> {
    let threshold = validate(transactions, min_support)?;

    let frequent_itemsets = match build(&canonicalize(transactions), &threshold) {
        Some(tree) => {
            debug!(
                "fpgrowth: tree of {} nodes over {} frequent items",
                tree.nodes.len(),
                tree.header_table.len()
            );
            grow(&tree, &[], &threshold)
        }
        None => HashMap::new(),
    };
    debug!("fpgrowth: {} frequent itemsets", frequent_itemsets.len());

    Ok(frequent_itemsets)
}

/// Tree over the frequent items of `transactions`, or `None` for invalid
/// parameters or when nothing is frequent.
pub fn build_tree(transactions: &[Transaction], min_support: f64) -> Option<FpTree> {
    let threshold = validate(transactions, min_support).ok()?;
    build(&canonicalize(transactions), &threshold)
}

/// Every frequent itemset of `tree`, each extended by `prefix`.
///
/// `num_transactions` is the size of the database the root tree was built
/// from; conditional trees share its threshold.
pub fn extract(
    tree: &FpTree,
    min_support: f64,
    num_transactions: usize,
    prefix: &[ItemId],
) -> FrequentItemsets {
    match MinSupport::new(min_support) {
        Ok(min_support) => grow(tree, prefix, &Threshold::new(min_support, num_transactions)),
        Err(_) => HashMap::new(),
    }
}

fn build(transactions: &[Transaction], threshold: &Threshold) -> Option<FpTree> {
    FpTree::build(
        transactions
            .iter()
            .map(|transaction| (transaction.as_slice(), 1)),
        threshold,
    )
}

/// Conditional trees still to be mined are kept on an explicit stack.
fn grow(tree: &FpTree, prefix: &[ItemId], threshold: &Threshold) -> FrequentItemsets {
    let mut frequent_itemsets: FrequentItemsets = HashMap::new();
    let mut stack: Vec<(FpTree, Itemset)> = Vec::new();

    expand(tree, prefix, threshold, &mut frequent_itemsets, &mut stack);
    while let Some((conditional_tree, prefix)) = stack.pop() {
        expand(
            &conditional_tree,
            &prefix,
            threshold,
            &mut frequent_itemsets,
            &mut stack,
        );
    }

    frequent_itemsets
}

/// Records `prefix ∪ {item}` for every header item, least frequent first,
/// and queues the item's conditional tree.
fn expand(
    tree: &FpTree,
    prefix: &[ItemId],
    threshold: &Threshold,
    frequent_itemsets: &mut FrequentItemsets,
    stack: &mut Vec<(FpTree, Itemset)>,
) {
    for (item, count) in tree.items_ascending() {
        if !threshold.is_frequent(count) {
            continue;
        }

        let mut itemset: Itemset = Vec::with_capacity(prefix.len() + 1);
        itemset.extend_from_slice(prefix);
        itemset.push(item);

        let pattern_base = tree.conditional_pattern_base(item);
        let conditional_tree = FpTree::build(
            pattern_base
                .iter()
                .map(|(path, weight)| (path.as_slice(), *weight)),
            threshold,
        );
        if let Some(conditional_tree) = conditional_tree {
            stack.push((conditional_tree, itemset.clone()));
        }

        itemset.sort_unstable();
        frequent_itemsets.insert(itemset, count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maplit::hashmap;

    #[test]
    fn test_mine() {
        let transactions = vec![vec![0, 1], vec![0, 2], vec![0, 1, 2], vec![1, 3]];
        let frequent_itemsets = mine(&transactions, 0.5);

        let expected = hashmap! {
            vec![0] => 3,
            vec![1] => 3,
            vec![2] => 2,
            vec![0, 1] => 2,
            vec![0, 2] => 2,
        };

        assert_eq!(frequent_itemsets, expected);
    }

    #[test]
    fn test_mine_single_path() {
        let transactions = vec![vec![0, 1, 2], vec![0, 1, 2]];
        let frequent_itemsets = mine(&transactions, 1.0);

        assert_eq!(frequent_itemsets.len(), 7);
        assert!(frequent_itemsets.values().all(|&count| count == 2));
        assert_eq!(frequent_itemsets[&vec![0, 1, 2]], 2);
    }

    #[test]
    fn test_build_tree_invalid() {
        assert!(build_tree(&[], 0.5).is_none());
        assert!(build_tree(&[vec![0]], 2.0).is_none());
        assert!(build_tree(&[vec![0], vec![1]], 0.9).is_none());
    }

    #[test]
    fn test_extract_with_prefix() {
        let transactions = vec![vec![0, 1], vec![0, 1], vec![1]];
        let tree = build_tree(&transactions, 0.5).unwrap();

        let frequent_itemsets = extract(&tree, 0.5, transactions.len(), &[7]);
        assert_eq!(
            frequent_itemsets,
            hashmap! {
                vec![1, 7] => 3,
                vec![0, 7] => 2,
                vec![0, 1, 7] => 2,
            }
        );
        assert!(extract(&tree, 0.0, transactions.len(), &[]).is_empty());
    }

    #[test]
    fn test_conditional_threshold_is_global() {
        // {0, 1} appears once; inside 0's conditional base it is the only
        // path, but it still has to reach the global count
        let transactions = vec![vec![0, 1], vec![0, 2], vec![0, 2], vec![1], vec![1]];
        let frequent_itemsets = mine(&transactions, 0.4);

        assert_eq!(
            frequent_itemsets,
            hashmap! {
                vec![0] => 3,
                vec![1] => 3,
                vec![2] => 2,
                vec![0, 2] => 2,
            }
        );
    }
}
