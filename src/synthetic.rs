//! Seeded market-basket datasets with planted patterns.
//!
//! Item popularity follows a Zipf law, a fixed set of patterns is planted into
//! a share of the transactions and, as noise, single items are dropped again.

use std::collections::BTreeSet;

use rand::{
    distr::{weighted::WeightedIndex, Distribution},
    rngs::StdRng,
    Rng, SeedableRng,
};
use thiserror::Error;

use crate::types::RawTransaction;

const MAX_DRAW_ATTEMPTS: usize = 50;

#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticConfig {
    pub num_transactions: usize,
    pub num_items: usize,
    /// Mean number of background items per transaction.
    pub avg_len: usize,
    pub num_patterns: usize,
    pub pattern_len: usize,
    /// Chance that a transaction receives one of the planted patterns.
    pub pattern_probability: f64,
    /// Chance that one item is dropped from a transaction afterwards.
    pub noise: f64,
    pub zipf_alpha: f64,
    pub seed: u64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            num_transactions: 1000,
            num_items: 50,
            avg_len: 5,
            num_patterns: 5,
            pattern_len: 3,
            pattern_probability: 0.3,
            noise: 0.1,
            zipf_alpha: 1.1,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SyntheticError {
    #[error("at least one item is required")]
    NoItems,
    #[error("{name} must lie in [0, 1], got {value}")]
    InvalidProbability { name: &'static str, value: f64 },
    #[error("zipf_alpha must be finite and non-negative, got {0}")]
    InvalidZipfAlpha(f64),
}

pub fn item_name(index: usize) -> String {
    format!("I{}", index + 1)
}

pub fn generate(config: &SyntheticConfig) -> Result<Vec<RawTransaction>, SyntheticError> {
    check_probability("pattern_probability", config.pattern_probability)?;
    check_probability("noise", config.noise)?;
    if config.num_items == 0 {
        return Err(SyntheticError::NoItems);
    }
    if !config.zipf_alpha.is_finite() || config.zipf_alpha < 0.0 {
        return Err(SyntheticError::InvalidZipfAlpha(config.zipf_alpha));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let zipf = WeightedIndex::new(
        (1..=config.num_items).map(|rank| 1.0 / (rank as f64).powf(config.zipf_alpha)),
    )
    .map_err(|_| SyntheticError::InvalidZipfAlpha(config.zipf_alpha))?;

    let pattern_len = config.pattern_len.min(config.num_items);
    let patterns: Vec<BTreeSet<usize>> = (0..config.num_patterns)
        .map(|_| draw_distinct(&mut rng, &zipf, pattern_len))
        .filter(|pattern| !pattern.is_empty())
        .collect();

    let max_len = (2 * config.avg_len).saturating_sub(1).clamp(1, config.num_items);
    let transactions = (0..config.num_transactions)
        .map(|_| {
            let len = rng.random_range(1..=max_len);
            let mut items = draw_distinct(&mut rng, &zipf, len);

            if !patterns.is_empty() && rng.random_bool(config.pattern_probability) {
                let pattern = &patterns[rng.random_range(0..patterns.len())];
                items.extend(pattern.iter().copied());
            }

            if items.len() > 1 && rng.random_bool(config.noise) {
                let victim = rng.random_range(0..items.len());
                if let Some(&item) = items.iter().nth(victim) {
                    items.remove(&item);
                }
            }

            items.into_iter().map(item_name).collect()
        })
        .collect();

    Ok(transactions)
}

fn check_probability(name: &'static str, value: f64) -> Result<(), SyntheticError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(SyntheticError::InvalidProbability { name, value })
    }
}

/// Up to `len` distinct Zipf-distributed item indices.
fn draw_distinct(rng: &mut StdRng, zipf: &WeightedIndex<f64>, len: usize) -> BTreeSet<usize> {
    let mut items = BTreeSet::new();
    let mut attempts = 0;
    while items.len() < len && attempts < len * MAX_DRAW_ATTEMPTS {
        items.insert(zipf.sample(rng));
        attempts += 1;
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_seeded() {
        let config = SyntheticConfig {
            num_transactions: 200,
            ..Default::default()
        };

        let first = generate(&config).unwrap();
        let second = generate(&config).unwrap();

        assert_eq!(first.len(), 200);
        assert_eq!(first, second);
    }

    #[test]
    fn test_transactions_are_well_formed() {
        let config = SyntheticConfig {
            num_transactions: 300,
            num_items: 10,
            avg_len: 4,
            ..Default::default()
        };
        let transactions = generate(&config).unwrap();

        for transaction in &transactions {
            assert!(!transaction.is_empty());
            let unique: BTreeSet<&String> = transaction.iter().collect();
            assert_eq!(unique.len(), transaction.len());
            assert!(transaction
                .iter()
                .all(|item| (1..=10).any(|i| *item == format!("I{}", i))));
        }
    }

    #[test]
    fn test_planted_patterns_surface() {
        let config = SyntheticConfig {
            num_transactions: 500,
            num_patterns: 1,
            pattern_probability: 1.0,
            noise: 0.0,
            ..Default::default()
        };
        let transactions = generate(&config).unwrap();
        let first = &transactions[0];

        // with a single pattern always planted, some item occurs everywhere
        assert!(first
            .iter()
            .any(|item| transactions.iter().all(|t| t.contains(item))));
    }

    #[test]
    fn test_invalid_config() {
        let no_items = SyntheticConfig {
            num_items: 0,
            ..Default::default()
        };
        assert_eq!(generate(&no_items), Err(SyntheticError::NoItems));

        let bad_noise = SyntheticConfig {
            noise: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            generate(&bad_noise),
            Err(SyntheticError::InvalidProbability { name: "noise", .. })
        ));
    }

    #[test]
    fn test_invalid_zipf_alpha() {
        for &zipf_alpha in &[f64::NAN, -1.0, f64::INFINITY] {
            let config = SyntheticConfig {
                zipf_alpha,
                ..Default::default()
            };
            assert!(matches!(
                generate(&config),
                Err(SyntheticError::InvalidZipfAlpha(_))
            ));
        }

        let uniform = SyntheticConfig {
            zipf_alpha: 0.0,
            ..Default::default()
        };
        assert!(generate(&uniform).is_ok());
    }
}
