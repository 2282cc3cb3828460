use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
    time::{Duration, Instant},
};

use log::info;
use thiserror::Error;

use crate::{
    itemsets::{apriori, eclat, fpgrowth},
    support::MiningError,
    types::{FrequentItemsets, Transaction},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    Apriori,
    Eclat,
    FpGrowth,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [Algorithm::Apriori, Algorithm::Eclat, Algorithm::FpGrowth];

    pub fn try_mine(
        self,
        transactions: &[Transaction],
        min_support: f64,
    ) -> Result<FrequentItemsets, MiningError> {
        match self {
            Algorithm::Apriori => apriori::try_mine(transactions, min_support),
            Algorithm::Eclat => eclat::try_mine(transactions, min_support),
            Algorithm::FpGrowth => fpgrowth::try_mine(transactions, min_support),
        }
    }

    pub fn mine(self, transactions: &[Transaction], min_support: f64) -> FrequentItemsets {
        self.try_mine(transactions, min_support).unwrap_or_default()
    }
}

impl Display for Algorithm {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Algorithm::Apriori => "apriori",
            Algorithm::Eclat => "eclat",
            Algorithm::FpGrowth => "fpgrowth",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown algorithm `{0}`")]
pub struct UnknownAlgorithm(String);

impl FromStr for Algorithm {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match name.as_str() {
            "apriori" => Ok(Algorithm::Apriori),
            "eclat" => Ok(Algorithm::Eclat),
            "fpgrowth" | "fp" => Ok(Algorithm::FpGrowth),
            _ => Err(UnknownAlgorithm(s.to_owned())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EngineReport {
    pub algorithm: Algorithm,
    pub elapsed: Duration,
    pub frequent_itemsets: FrequentItemsets,
}

impl EngineReport {
    fn run(algorithm: Algorithm, transactions: &[Transaction], min_support: f64) -> Self {
        let start = Instant::now();
        let frequent_itemsets = algorithm.mine(transactions, min_support);
        let elapsed = start.elapsed();
        info!(
            "{}: {} frequent itemsets in {:?}",
            algorithm,
            frequent_itemsets.len(),
            elapsed
        );
        Self {
            algorithm,
            elapsed,
            frequent_itemsets,
        }
    }
}

/// Results of all three engines over the same input.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub apriori: EngineReport,
    pub eclat: EngineReport,
    pub fpgrowth: EngineReport,
}

impl Comparison {
    pub fn reports(&self) -> [&EngineReport; 3] {
        [&self.apriori, &self.eclat, &self.fpgrowth]
    }

    /// True when every engine returned the same (itemset, count) pairs.
    pub fn agree(&self) -> bool {
        self.apriori.frequent_itemsets == self.eclat.frequent_itemsets
            && self.eclat.frequent_itemsets == self.fpgrowth.frequent_itemsets
    }
}

/// Runs the engines in parallel over one shared, read-only input.
pub fn compare(transactions: &[Transaction], min_support: f64) -> Comparison {
    let (apriori, (eclat, fpgrowth)) = rayon::join(
        || EngineReport::run(Algorithm::Apriori, transactions, min_support),
        || {
            rayon::join(
                || EngineReport::run(Algorithm::Eclat, transactions, min_support),
                || EngineReport::run(Algorithm::FpGrowth, transactions, min_support),
            )
        },
    );

    Comparison {
        apriori,
        eclat,
        fpgrowth,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algorithm_from_str() {
        assert_eq!("Apriori".parse(), Ok(Algorithm::Apriori));
        assert_eq!("eclat".parse(), Ok(Algorithm::Eclat));
        assert_eq!("fp-growth".parse(), Ok(Algorithm::FpGrowth));
        assert_eq!("FP_Growth".parse(), Ok(Algorithm::FpGrowth));
        assert!("lcm".parse::<Algorithm>().is_err());
    }

    #[test]
    fn test_display_round_trip() {
        for algorithm in Algorithm::ALL {
            assert_eq!(algorithm.to_string().parse(), Ok(algorithm));
        }
    }

    #[test]
    fn test_compare_agrees() {
        let transactions = vec![vec![0, 1], vec![0, 2], vec![0, 1, 2], vec![1, 3], vec![0, 1]];
        let comparison = compare(&transactions, 0.4);

        assert!(comparison.agree());
        assert_eq!(comparison.apriori.frequent_itemsets.len(), 5);
        for report in comparison.reports() {
            assert_eq!(report.frequent_itemsets, comparison.apriori.frequent_itemsets);
        }
    }

    #[test]
    fn test_compare_invalid_support() {
        let comparison = compare(&[vec![0]], 0.0);

        assert!(comparison.agree());
        assert!(comparison.fpgrowth.frequent_itemsets.is_empty());
    }
}
