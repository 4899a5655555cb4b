pub mod config;
pub mod error;
pub mod hparams;
pub mod mlx;
pub mod models;
pub mod python;
pub mod unsloth;

pub use config::{FinetuneConfig, UnslothTrainingArgs};
pub use error::TrainerError;
pub use hparams::{Hyperparameters, TrainingPlan, MIN_ITERATIONS};
pub use mlx::{MlxJob, MlxOptions, MlxTrainer};
pub use python::PythonEnv;
pub use unsloth::{UnslothJob, UnslothOptions, UnslothTrainer};
