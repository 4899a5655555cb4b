use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::{DatasetError, Result};

/// Upper bound for `min_batch_size`; padding may materialize twice this many examples.
pub const MAX_MIN_BATCH_SIZE: usize = 1 << 16;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Fraction of the dataset held out for validation.
    pub val_fraction: f64,
    /// Both splits hold at least this many examples.
    pub min_batch_size: usize,
    pub seed: u64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            val_fraction: 0.1,
            min_batch_size: 2,
            seed: 42,
        }
    }
}

impl SplitConfig {
    pub fn validate(&self) -> Result<()> {
        if self.min_batch_size == 0 {
            return Err(DatasetError::InvalidSplit(
                "min_batch_size must be at least 1".to_string(),
            ));
        }
        if self.min_batch_size > MAX_MIN_BATCH_SIZE {
            return Err(DatasetError::InvalidSplit(format!(
                "min_batch_size must be at most {}, got {}",
                MAX_MIN_BATCH_SIZE, self.min_batch_size
            )));
        }
        if !(0.0..=0.5).contains(&self.val_fraction) {
            return Err(DatasetError::InvalidSplit(format!(
                "val_fraction must be within [0.0, 0.5], got {}",
                self.val_fraction
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Split<T> {
    pub train: Vec<T>,
    pub valid: Vec<T>,
    /// Set when the input was too small and examples were repeated.
    pub duplicated: bool,
}

/// Shuffle `items` with a seeded RNG and cut them into train/validation.
///
/// The validation split takes the first `max(min_batch_size, total * val_fraction)`
/// items. Inputs smaller than `2 * min_batch_size` are padded by repeating
/// their (shuffled) prefix until both splits can hold `min_batch_size`.
pub fn split_examples<T: Clone>(mut items: Vec<T>, config: &SplitConfig) -> Result<Split<T>> {
    config.validate()?;
    if items.is_empty() {
        return Err(DatasetError::EmptyDataset);
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    items.shuffle(&mut rng);

    let min = config.min_batch_size;
    let target = min * 2;
    let mut val_size = min.max((items.len() as f64 * config.val_fraction) as usize);

    let duplicated = items.len() < target;
    if duplicated {
        log::debug!(
            "Padding {} examples up to {} by repetition",
            items.len(),
            target
        );
        while items.len() < target {
            let take = (target - items.len()).min(items.len());
            items.extend_from_within(..take);
        }
        val_size = min;
    }

    let train = items.split_off(val_size);
    Ok(Split {
        train,
        valid: items,
        duplicated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn ids(n: usize) -> Vec<usize> {
        (0..n).collect()
    }

    #[test]
    fn splits_are_disjoint_and_cover_input() {
        let config = SplitConfig::default();
        for n in [4, 5, 19, 20, 21, 100, 257] {
            let split = split_examples(ids(n), &config).unwrap();
            assert!(!split.duplicated);
            assert_eq!(split.train.len() + split.valid.len(), n);

            let train: HashSet<_> = split.train.iter().copied().collect();
            let valid: HashSet<_> = split.valid.iter().copied().collect();
            assert!(train.is_disjoint(&valid));
            assert_eq!(train.len() + valid.len(), n);
        }
    }

    #[test]
    fn validation_meets_minimum_and_fraction() {
        let config = SplitConfig::default();
        assert_eq!(split_examples(ids(10), &config).unwrap().valid.len(), 2);
        assert_eq!(split_examples(ids(29), &config).unwrap().valid.len(), 2);
        assert_eq!(split_examples(ids(30), &config).unwrap().valid.len(), 3);
        assert_eq!(split_examples(ids(1000), &config).unwrap().valid.len(), 100);
    }

    #[test]
    fn larger_minimum_is_respected() {
        let config = SplitConfig {
            min_batch_size: 8,
            ..SplitConfig::default()
        };
        for n in 1..60 {
            let split = split_examples(ids(n), &config).unwrap();
            assert!(split.valid.len() >= 8, "n = {n}");
            assert!(split.train.len() >= 8, "n = {n}");
        }
    }

    #[test]
    fn tiny_datasets_are_padded() {
        let config = SplitConfig::default();

        let one = split_examples(vec!["only"], &config).unwrap();
        assert!(one.duplicated);
        assert_eq!(one.valid, vec!["only", "only"]);
        assert_eq!(one.train, vec!["only", "only"]);

        let three = split_examples(ids(3), &config).unwrap();
        assert!(three.duplicated);
        assert_eq!(three.valid.len(), 2);
        assert_eq!(three.train.len(), 2);
        let seen: HashSet<_> = three.valid.iter().chain(&three.train).copied().collect();
        assert_eq!(seen, ids(3).into_iter().collect());
    }

    #[test]
    fn same_seed_same_order() {
        let config = SplitConfig::default();
        let a = split_examples(ids(50), &config).unwrap();
        let b = split_examples(ids(50), &config).unwrap();
        assert_eq!(a.train, b.train);
        assert_eq!(a.valid, b.valid);

        let other = SplitConfig {
            seed: 7,
            ..SplitConfig::default()
        };
        let c = split_examples(ids(50), &other).unwrap();
        assert_ne!(a.train, c.train);
    }

    #[test]
    fn empty_input_is_an_error() {
        let err = split_examples(Vec::<usize>::new(), &SplitConfig::default()).unwrap_err();
        assert!(matches!(err, DatasetError::EmptyDataset));
    }

    #[test]
    fn rejects_bad_config() {
        let zero_min = SplitConfig {
            min_batch_size: 0,
            ..SplitConfig::default()
        };
        assert!(split_examples(ids(10), &zero_min).is_err());

        let too_much = SplitConfig {
            val_fraction: 0.9,
            ..SplitConfig::default()
        };
        assert!(split_examples(ids(10), &too_much).is_err());
    }

    #[test]
    fn oversized_minimum_is_rejected_not_padded() {
        for min_batch_size in [MAX_MIN_BATCH_SIZE + 1, usize::MAX / 2 + 1, usize::MAX] {
            let config = SplitConfig {
                min_batch_size,
                ..SplitConfig::default()
            };
            let err = split_examples(vec![1, 2, 3], &config).unwrap_err();
            assert!(matches!(err, DatasetError::InvalidSplit(_)));
        }

        let at_limit = SplitConfig {
            min_batch_size: MAX_MIN_BATCH_SIZE,
            ..SplitConfig::default()
        };
        assert!(at_limit.validate().is_ok());
    }
}
