use std::collections::HashSet;

use itertools::Itertools;

use crate::types::{ItemId, Itemset};

/// Joins frequent (k-1)-itemsets that share their first k-2 items.
///
/// Itemsets must be sorted internally; the list itself is sorted here so that
/// itemsets with a common prefix are adjacent. Every returned candidate is
/// sorted and has length k.
///
/// https://github.com/tommyod/Efficient-Apriori/blob/master/efficient_apriori/itemsets.py
pub fn join_step(mut itemsets: Vec<Itemset>) -> Vec<Itemset> {
    if itemsets.is_empty() {
        return vec![];
    }

    itemsets.sort_unstable();

    let mut candidates: Vec<Itemset> = Vec::with_capacity(itemsets.len());
    let mut tail_items: Vec<ItemId> = Vec::with_capacity(itemsets.len());

    let mut i = 0;
    while i < itemsets.len() {
        let (prefix, last) = itemsets[i].split_at(itemsets[i].len() - 1);

        tail_items.clear();
        tail_items.push(last[0]);

        let mut skip = 1;
        for next in &itemsets[(i + 1)..] {
            let (next_prefix, next_last) = next.split_at(next.len() - 1);
            if prefix != next_prefix {
                break;
            }
            tail_items.push(next_last[0]);
            skip += 1;
        }

        for (&a, &b) in tail_items.iter().tuple_combinations() {
            let mut candidate = Vec::with_capacity(prefix.len() + 2);
            candidate.extend_from_slice(prefix);
            candidate.push(a);
            candidate.push(b);
            candidates.push(candidate);
        }

        i += skip;
    }

    candidates
}

/// Keeps candidates whose every (k-1)-subset is frequent.
pub fn prune_step(candidates: Vec<Itemset>, frequent: &HashSet<&[ItemId]>) -> Vec<Itemset> {
    candidates
        .into_iter()
        .filter(|candidate| all_subsets_frequent(candidate, frequent))
        .collect()
}

fn all_subsets_frequent(candidate: &[ItemId], frequent: &HashSet<&[ItemId]>) -> bool {
    let mut subset: Itemset = Vec::with_capacity(candidate.len());
    // dropping either of the last two items yields one of the joined parents
    (0..candidate.len().saturating_sub(2)).all(|skip| {
        subset.clear();
        subset.extend(
            candidate
                .iter()
                .enumerate()
                .filter(|&(i, _)| i != skip)
                .map(|(_, &item)| item),
        );
        frequent.contains(subset.as_slice())
    })
}
