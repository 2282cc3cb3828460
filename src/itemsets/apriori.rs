use std::collections::{HashMap, HashSet};

use log::debug;

use crate::{
    combi::{join_step, prune_step},
    support::{contains_all, validate, MiningError, Threshold},
    transactions::canonicalize,
    types::{FrequentItemsets, ItemCounts, ItemId, Itemset, ItemsetCounts, Transaction},
};

const APPROX_NUM_UNIQUE_ITEMS: usize = 1024; // arbitrary

/// Levelwise Apriori. Invalid parameters yield an empty result.
pub fn mine(transactions: &[Transaction], min_support: f64) -> FrequentItemsets {
    try_mine(transactions, min_support).unwrap_or_default()
}

/// Generate frequent itemsets of every length from a list of transactions.
pub fn try_mine(
    transactions: &[Transaction],
    min_support: f64,
) -> Result<FrequentItemsets, MiningError> {
    let threshold = validate(transactions, min_support)?;
    let transactions = canonicalize(transactions);
    let mut all_frequent_itemsets: FrequentItemsets = HashMap::new();

    // 1-itemset
    let item_counts = generate_frequent_1_itemset_counts(&transactions, &threshold);
    debug!("apriori: {} frequent items", item_counts.len());

    let mut transactions = retain_frequent_items(&transactions, &item_counts);
    let mut level = convert_to_itemset_counts(item_counts);

    // k-itemset, k >= 2
    let mut size = 1;
    loop {
        let candidates = generate_candidates_from_prev(&level);
        all_frequent_itemsets.extend(level);
        if candidates.is_empty() {
            break;
        }

        size += 1;
        transactions.retain(|transaction| transaction.len() >= size);
        let num_candidates = candidates.len();
        level = generate_frequent_k_itemset_counts(candidates, &transactions, &threshold);
        debug!(
            "apriori: level {}: {} candidates, {} frequent",
            size,
            num_candidates,
            level.len()
        );

        if level.is_empty() {
            break;
        }
    }

    Ok(all_frequent_itemsets)
}

/// Joined and pruned candidates of length k from the frequent (k-1)-itemsets.
pub fn generate_candidates_from_prev(itemset_counts: &ItemsetCounts) -> Vec<Itemset> {
    let frequent: HashSet<&[ItemId]> = itemset_counts.keys().map(Vec::as_slice).collect();
    let joined = join_step(itemset_counts.keys().cloned().collect());
    prune_step(joined, &frequent)
}

/// One scan over `transactions`, counting every candidate at once.
fn generate_frequent_k_itemset_counts(
    candidates: Vec<Itemset>,
    transactions: &[Transaction],
    threshold: &Threshold,
) -> ItemsetCounts {
    let mut counts = vec![0_u32; candidates.len()];

    for transaction in transactions {
        for (candidate, count) in candidates.iter().zip(counts.iter_mut()) {
            if contains_all(transaction, candidate) {
                *count += 1;
            }
        }
    }

    candidates
        .into_iter()
        .zip(counts)
        .filter(|&(_, count)| threshold.is_frequent(count))
        .collect()
}

fn generate_frequent_1_itemset_counts(
    transactions: &[Transaction],
    threshold: &Threshold,
) -> ItemCounts {
    let mut item_counts: ItemCounts = HashMap::with_capacity(APPROX_NUM_UNIQUE_ITEMS);

    for transaction in transactions {
        for &item in transaction {
            *item_counts.entry(item).or_insert(0) += 1;
        }
    }

    // Prune
    item_counts.retain(|_, &mut support_count| threshold.is_frequent(support_count));
    item_counts
}

/// Drops infrequent items; no frequent candidate can contain them.
fn retain_frequent_items(
    transactions: &[Transaction],
    item_counts: &ItemCounts,
) -> Vec<Transaction> {
    transactions
        .iter()
        .map(|transaction| {
            transaction
                .iter()
                .copied()
                .filter(|item| item_counts.contains_key(item))
                .collect::<Transaction>()
        })
        .filter(|transaction| transaction.len() >= 2)
        .collect()
}

fn convert_to_itemset_counts(item_counts: ItemCounts) -> ItemsetCounts {
    item_counts.into_iter().map(|(k, v)| (vec![k], v)).collect()
}
