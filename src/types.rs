use std::collections::HashMap;

pub type ItemId = usize;
pub type Itemset = Vec<ItemId>;

pub type RawTransaction = Vec<String>;
/// Set of item ids. Engines normalize it to sorted, duplicate-free ids, and
/// counts are `u32`, so one run takes at most `u32::MAX` transactions.
pub type Transaction = Vec<ItemId>;
pub type TransactionId = usize;

pub type ItemCounts = HashMap<ItemId, u32>;
pub type ItemsetCounts = HashMap<Itemset, u32>;

/// Every frequent itemset (sorted ids) mapped to its support count.
pub type FrequentItemsets = ItemsetCounts;
