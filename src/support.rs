use std::{cmp::Ordering, convert::TryFrom};

use thiserror::Error;

use crate::{
    transactions::is_canonical,
    types::{FrequentItemsets, ItemId, Itemset, Transaction},
};

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum MiningError {
    #[error("transaction collection is empty")]
    EmptyInput,
    #[error("minimum support must lie in (0, 1], got {0}")]
    InvalidSupport(f64),
    #[error("support counts are u32, got {0} transactions")]
    TooManyTransactions(usize),
}

/// Minimum support as a fraction of the transaction count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinSupport(f64);

impl MinSupport {
    pub fn new(fraction: f64) -> Result<Self, MiningError> {
        // NaN fails both comparisons
        if fraction > 0.0 && fraction <= 1.0 {
            Ok(Self(fraction))
        } else {
            Err(MiningError::InvalidSupport(fraction))
        }
    }

    pub fn fraction(&self) -> f64 {
        self.0
    }

    /// `fraction × num_transactions`, left unrounded.
    ///
    /// When the product is an exact integer, floating-point error in the
    /// fraction can move the boundary by one transaction; callers compare
    /// with `>=` against this value and never round it.
    pub fn min_count(&self, num_transactions: usize) -> f64 {
        self.0 * num_transactions as f64
    }
}

/// Absolute threshold for one mining run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Threshold {
    min_count: f64,
}

impl Threshold {
    pub fn new(min_support: MinSupport, num_transactions: usize) -> Self {
        Self {
            min_count: min_support.min_count(num_transactions),
        }
    }

    pub fn min_count(&self) -> f64 {
        self.min_count
    }

    pub fn is_frequent(&self, support_count: u32) -> bool {
        support_count as f64 >= self.min_count
    }
}

/// Shared parameter check of every engine's `try_mine`.
pub fn validate(transactions: &[Transaction], min_support: f64) -> Result<Threshold, MiningError> {
    let min_support = MinSupport::new(min_support)?;
    if transactions.is_empty() {
        return Err(MiningError::EmptyInput);
    }
    check_size(transactions.len())?;
    Ok(Threshold::new(min_support, transactions.len()))
}

/// Support counts are `u32`, which bounds the size of one run.
fn check_size(num_transactions: usize) -> Result<(), MiningError> {
    match u32::try_from(num_transactions) {
        Ok(_) => Ok(()),
        Err(_) => Err(MiningError::TooManyTransactions(num_transactions)),
    }
}

/// Subset test over two sorted id slices.
pub fn contains_all(transaction: &[ItemId], itemset: &[ItemId]) -> bool {
    if itemset.len() > transaction.len() {
        return false;
    }

    let mut items = transaction.iter();
    'outer: for wanted in itemset {
        for item in items.by_ref() {
            match item.cmp(wanted) {
                Ordering::Less => continue,
                Ordering::Equal => continue 'outer,
                Ordering::Greater => return false,
            }
        }
        return false;
    }
    true
}

/// Number of transactions that contain every item of `itemset`, saturating
/// at `u32::MAX`. Neither side has to be sorted.
pub fn support_count(itemset: &[ItemId], transactions: &[Transaction]) -> u32 {
    let sorted_itemset = is_canonical(itemset);
    let count = transactions
        .iter()
        .filter(|transaction| {
            if sorted_itemset && is_canonical(transaction) {
                contains_all(transaction, itemset)
            } else {
                itemset.iter().all(|item| transaction.contains(item))
            }
        })
        .count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// Deterministic view of a result: count descending, then itemset ascending.
pub fn sorted_itemsets(frequent_itemsets: &FrequentItemsets) -> Vec<(&Itemset, u32)> {
    let mut itemsets: Vec<(&Itemset, u32)> = frequent_itemsets
        .iter()
        .map(|(itemset, &count)| (itemset, count))
        .collect();
    itemsets.sort_unstable_by(|(a, a_count), (b, b_count)| {
        b_count.cmp(a_count).then_with(|| a.cmp(b))
    });
    itemsets
}
