//! Frequent itemset mining with three interchangeable engines.
//!
//! ```
//! use itemset_mining::{itemsets::fpgrowth, transactions::encode};
//!
//! let raw: Vec<Vec<String>> = vec![
//!     vec!["bread".into(), "milk".into()],
//!     vec!["bread".into(), "eggs".into()],
//! ];
//! let (transactions, inventory) = encode(&raw);
//! let frequent = fpgrowth::mine(&transactions, 0.5);
//!
//! assert_eq!(inventory.decode(&frequent)[&vec!["bread"]], 2);
//! ```

pub mod combi;
pub mod compare;
pub mod io;
pub mod itemsets;
#[cfg(feature = "python")]
mod python;
pub mod support;
pub mod synthetic;
pub mod transactions;
pub mod types;

pub use compare::{compare, Algorithm, Comparison};
pub use support::{sorted_itemsets, support_count, MinSupport, MiningError};
pub use transactions::Inventory;
pub use types::{FrequentItemsets, ItemId, Itemset, Transaction};
