use std::path::PathBuf;

use crate::error::{Result, TrainerError};

/// mlx-lm runs at least this many iterations regardless of dataset size.
pub const MIN_ITERATIONS: usize = 10;

#[derive(Debug, Clone)]
pub struct Hyperparameters {
    pub epochs: usize,
    pub batch_size: usize,
    pub learning_rate: f64,
    pub output_dir: PathBuf,
}

impl Hyperparameters {
    pub fn validate(&self) -> Result<()> {
        if self.epochs == 0 {
            return Err(TrainerError::InvalidHyperparameters(
                "epochs must be at least 1".to_string(),
            ));
        }
        if self.batch_size == 0 {
            return Err(TrainerError::InvalidHyperparameters(
                "batch size must be at least 1".to_string(),
            ));
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(TrainerError::InvalidHyperparameters(format!(
                "learning rate must be a positive number, got {}",
                self.learning_rate
            )));
        }
        Ok(())
    }
}

/// Values derived from the hyperparameters once the dataset size is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrainingPlan {
    pub num_examples: usize,
    pub batch_size: usize,
    pub iterations: usize,
    /// The requested batch size exceeded the dataset and was lowered.
    pub batch_adjusted: bool,
    /// `examples * epochs / batch_size` fell below the floor.
    pub iterations_floored: bool,
}

impl TrainingPlan {
    pub fn derive(num_examples: usize, hparams: &Hyperparameters, min_iters: usize) -> Result<Self> {
        hparams.validate()?;
        if num_examples == 0 {
            return Err(TrainerError::EmptyDataset);
        }

        let mut batch_size = hparams.batch_size;
        let batch_adjusted = num_examples < batch_size;
        if batch_adjusted {
            batch_size = num_examples.max(1);
        }

        let mut iterations = num_examples
            .checked_mul(hparams.epochs)
            .ok_or_else(|| {
                TrainerError::InvalidHyperparameters(format!(
                    "{} examples x {} epochs is too many iterations",
                    num_examples, hparams.epochs
                ))
            })?
            / batch_size;
        let iterations_floored = iterations < min_iters;
        if iterations_floored {
            iterations = min_iters;
        }

        Ok(Self {
            num_examples,
            batch_size,
            iterations,
            batch_adjusted,
            iterations_floored,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hparams(epochs: usize, batch_size: usize) -> Hyperparameters {
        Hyperparameters {
            epochs,
            batch_size,
            learning_rate: 1e-5,
            output_dir: PathBuf::from("out"),
        }
    }

    #[test]
    fn iterations_follow_examples_epochs_and_batch() {
        let plan = TrainingPlan::derive(100, &hparams(3, 2), MIN_ITERATIONS).unwrap();
        assert_eq!(plan.iterations, 150);
        assert_eq!(plan.batch_size, 2);
        assert!(!plan.batch_adjusted);
        assert!(!plan.iterations_floored);

        let plan = TrainingPlan::derive(101, &hparams(1, 4), MIN_ITERATIONS).unwrap();
        assert_eq!(plan.iterations, 25);
    }

    #[test]
    fn iterations_never_drop_below_floor() {
        for n in 1..40 {
            for epochs in 1..4 {
                for batch in 1..9 {
                    let plan = TrainingPlan::derive(n, &hparams(epochs, batch), MIN_ITERATIONS).unwrap();
                    assert!(plan.iterations >= MIN_ITERATIONS);
                }
            }
        }
        let plan = TrainingPlan::derive(4, &hparams(1, 2), MIN_ITERATIONS).unwrap();
        assert_eq!(plan.iterations, MIN_ITERATIONS);
        assert!(plan.iterations_floored);
    }

    #[test]
    fn batch_size_shrinks_to_dataset() {
        let plan = TrainingPlan::derive(3, &hparams(3, 8), MIN_ITERATIONS).unwrap();
        assert!(plan.batch_adjusted);
        assert_eq!(plan.batch_size, 3);
        assert_eq!(plan.iterations, MIN_ITERATIONS);
    }

    #[test]
    fn zero_examples_is_empty_dataset() {
        let err = TrainingPlan::derive(0, &hparams(3, 2), MIN_ITERATIONS).unwrap_err();
        assert!(matches!(err, TrainerError::EmptyDataset));
    }

    #[test]
    fn huge_epoch_count_is_rejected() {
        let err = TrainingPlan::derive(4, &hparams(usize::MAX, 2), MIN_ITERATIONS).unwrap_err();
        assert!(matches!(err, TrainerError::InvalidHyperparameters(_)));

        let plan = TrainingPlan::derive(1, &hparams(usize::MAX, 1), MIN_ITERATIONS).unwrap();
        assert_eq!(plan.iterations, usize::MAX);
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(hparams(0, 2).validate().is_err());
        assert!(hparams(3, 0).validate().is_err());

        let mut bad_lr = hparams(3, 2);
        bad_lr.learning_rate = 0.0;
        assert!(bad_lr.validate().is_err());
        bad_lr.learning_rate = f64::NAN;
        assert!(bad_lr.validate().is_err());
    }
}
