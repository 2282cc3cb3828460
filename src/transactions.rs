use std::{borrow::Cow, collections::HashMap};

use crate::types::{FrequentItemsets, ItemId, RawTransaction, Transaction};

const APPROX_NUM_UNIQUE_ITEMS: usize = 1024; // arbitrary

/// Two-way mapping between raw item tokens and dense `ItemId`s.
///
/// Ids are handed out in first-seen order and are stable for the lifetime of
/// the inventory, so the natural order of `ItemId` is the single total order
/// every engine relies on during one mining run.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    names: Vec<String>,
    lookup: HashMap<String, ItemId>,
}

impl Inventory {
    pub fn new() -> Self {
        Self {
            names: Vec::with_capacity(APPROX_NUM_UNIQUE_ITEMS),
            lookup: HashMap::with_capacity(APPROX_NUM_UNIQUE_ITEMS),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn intern(&mut self, name: &str) -> ItemId {
        if let Some(&item_id) = self.lookup.get(name) {
            return item_id;
        }
        let item_id = self.names.len();
        self.names.push(name.to_owned());
        self.lookup.insert(name.to_owned(), item_id);
        item_id
    }

    pub fn id(&self, name: &str) -> Option<ItemId> {
        self.lookup.get(name).copied()
    }

    pub fn name(&self, item_id: ItemId) -> Option<&str> {
        self.names.get(item_id).map(String::as_str)
    }

    /// Interns every token and returns canonical transactions.
    pub fn encode<T, S>(&mut self, raw_transactions: &[T]) -> Vec<Transaction>
    where
        T: AsRef<[S]>,
        S: AsRef<str>,
    {
        raw_transactions
            .iter()
            .map(|raw_transaction| {
                let items = raw_transaction
                    .as_ref()
                    .iter()
                    .map(|item| self.intern(item.as_ref()))
                    .collect();
                normalize(items)
            })
            .collect()
    }

    /// Item names of `itemset`, sorted by name.
    pub fn decode_itemset(&self, itemset: &[ItemId]) -> Vec<&str> {
        let mut names: Vec<&str> = itemset
            .iter()
            .filter_map(|&item_id| self.name(item_id))
            .collect();
        names.sort_unstable();
        debug_assert_eq!(names.len(), itemset.len(), "item id not in inventory");
        names
    }

    pub fn decode(&self, frequent_itemsets: &FrequentItemsets) -> HashMap<Vec<&str>, u32> {
        frequent_itemsets
            .iter()
            .map(|(itemset, &count)| (self.decode_itemset(itemset), count))
            .collect()
    }
}

/// Builds an inventory over `raw_transactions` and encodes them in one pass.
pub fn encode(raw_transactions: &[RawTransaction]) -> (Vec<Transaction>, Inventory) {
    let mut inventory = Inventory::new();
    let transactions = inventory.encode(raw_transactions);
    (transactions, inventory)
}

/// Sorts and deduplicates a transaction so it can be handed to an engine.
pub fn normalize(mut items: Vec<ItemId>) -> Transaction {
    items.sort_unstable();
    items.dedup();
    items
}

/// True when `items` is strictly increasing, i.e. already normalized.
pub fn is_canonical(items: &[ItemId]) -> bool {
    items.windows(2).all(|pair| pair[0] < pair[1])
}

/// Engine input with every transaction normalized. Borrows when the input
/// already is; otherwise only the offending transactions are rebuilt.
pub fn canonicalize(transactions: &[Transaction]) -> Cow<'_, [Transaction]> {
    if transactions.iter().all(|transaction| is_canonical(transaction)) {
        return Cow::Borrowed(transactions);
    }

    Cow::Owned(
        transactions
            .iter()
            .map(|transaction| {
                if is_canonical(transaction) {
                    transaction.clone()
                } else {
                    normalize(transaction.clone())
                }
            })
            .collect(),
    )
}
