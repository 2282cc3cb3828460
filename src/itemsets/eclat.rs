use std::collections::HashMap;

use bitvec::prelude::*;
use log::debug;

use crate::{
    support::{validate, MiningError, Threshold},
    transactions::canonicalize,
    types::{FrequentItemsets, ItemId, Itemset, Transaction, TransactionId},
};

/// Positions of the transactions that contain an item (or an itemset, once
/// intersected).
#[derive(Debug, Clone, PartialEq)]
pub struct TidSet {
    bits: BitVec<usize, Lsb0>,
    support: u32,
}

impl TidSet {
    fn empty(num_transactions: usize) -> Self {
        Self {
            bits: BitVec::repeat(false, num_transactions),
            support: 0,
        }
    }

    fn insert(&mut self, tid: TransactionId) {
        if !self.bits.replace(tid, true) {
            self.support += 1;
        }
    }

    pub fn support(&self) -> u32 {
        self.support
    }

    pub fn tids(&self) -> impl Iterator<Item = TransactionId> + '_ {
        self.bits.iter_ones()
    }

    pub fn intersect(&self, other: &TidSet) -> TidSet {
        let mut bits = self.bits.clone();
        for (word, &other_word) in bits
            .as_raw_mut_slice()
            .iter_mut()
            .zip(other.bits.as_raw_slice())
        {
            *word &= other_word;
        }
        let support = bits.count_ones() as u32;
        TidSet { bits, support }
    }
}

type Branch = Vec<(ItemId, TidSet)>;

/// Depth-first vertical mining. Invalid parameters yield an empty result.
pub fn mine(transactions: &[Transaction], min_support: f64) -> FrequentItemsets {
    try_mine(transactions, min_support).unwrap_or_default()
}

pub fn try_mine(
    transactions: &[Transaction],
    min_support: f64,
) -> Result<FrequentItemsets, MiningError> {
    let threshold = validate(transactions, min_support)?;

    let mut items: Branch = preprocess(&canonicalize(transactions))
        .into_iter()
        .filter(|(_, tids)| threshold.is_frequent(tids.support()))
        .collect();
    sort_branch(&mut items);
    debug!("eclat: {} frequent items", items.len());

    let frequent_itemsets = search(items, &threshold);
    debug!("eclat: {} frequent itemsets", frequent_itemsets.len());

    Ok(frequent_itemsets)
}

/// Vertical layout: every item mapped to its tid-set.
pub fn preprocess(transactions: &[Transaction]) -> HashMap<ItemId, TidSet> {
    let mut vertical: HashMap<ItemId, TidSet> = HashMap::new();

    for (tid, transaction) in transactions.iter().enumerate() {
        for &item in transaction {
            vertical
                .entry(item)
                .or_insert_with(|| TidSet::empty(transactions.len()))
                .insert(tid);
        }
    }

    vertical
}

/// Explicit-stack search; each frame is a prefix and the branch still to
/// extend it with.
fn search(items: Branch, threshold: &Threshold) -> FrequentItemsets {
    let mut frequent_itemsets: FrequentItemsets = HashMap::new();
    let mut stack: Vec<(Itemset, Branch)> = vec![(vec![], items)];

    while let Some((prefix, mut items)) = stack.pop() {
        while let Some((item, tids)) = items.pop() {
            if !threshold.is_frequent(tids.support()) {
                continue;
            }

            let mut itemset = prefix.clone();
            itemset.push(item);

            let mut suffix: Branch = items
                .iter()
                .filter_map(|(other, other_tids)| {
                    let common = tids.intersect(other_tids);
                    if threshold.is_frequent(common.support()) {
                        Some((*other, common))
                    } else {
                        None
                    }
                })
                .collect();

            if !suffix.is_empty() {
                sort_branch(&mut suffix);
                stack.push((itemset.clone(), suffix));
            }

            itemset.sort_unstable();
            frequent_itemsets.insert(itemset, tids.support());
        }
    }

    frequent_itemsets
}

/// Largest tid-set first; `pop` takes the smallest.
fn sort_branch(items: &mut Branch) {
    items.sort_unstable_by(|(a, a_tids), (b, b_tids)| {
        b_tids.support().cmp(&a_tids.support()).then(a.cmp(b))
    });
}
