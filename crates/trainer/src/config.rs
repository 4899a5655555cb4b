use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use dataset::SplitConfig;

use crate::error::Result;
use crate::hparams::MIN_ITERATIONS;
use crate::models::LoraSettings;

pub const DEFAULT_CONFIG_PATH: &str = "configs/finetune.yaml";
pub const PYTHON_ENV_VAR: &str = "FINETUNE_PYTHON";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FinetuneConfig {
    /// Interpreter used to launch the training framework.
    pub python: String,
    pub split: SplitConfig,
    pub min_iterations: usize,
    pub lora: LoraSettings,
    pub unsloth: UnslothTrainingArgs,
}

impl Default for FinetuneConfig {
    fn default() -> Self {
        Self {
            python: "python3".to_string(),
            split: SplitConfig::default(),
            min_iterations: MIN_ITERATIONS,
            lora: LoraSettings::default(),
            unsloth: UnslothTrainingArgs::default(),
        }
    }
}

/// Extra `TrainingArguments` for the Unsloth path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnslothTrainingArgs {
    pub gradient_accumulation_steps: usize,
    pub warmup_ratio: f64,
    pub lr_scheduler_type: String,
    pub logging_steps: usize,
    pub save_steps: usize,
    pub save_total_limit: usize,
    pub fp16: bool,
    pub optim: String,
    pub weight_decay: f64,
    pub seed: u64,
}

impl Default for UnslothTrainingArgs {
    fn default() -> Self {
        Self {
            gradient_accumulation_steps: 4,
            warmup_ratio: 0.03,
            lr_scheduler_type: "cosine".to_string(),
            logging_steps: 10,
            save_steps: 100,
            save_total_limit: 2,
            fp16: true,
            optim: "adamw_8bit".to_string(),
            weight_decay: 0.01,
            seed: 42,
        }
    }
}

impl FinetuneConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Load `explicit` if given, else `configs/finetune.yaml` when present,
    /// else defaults. `FINETUNE_PYTHON` overrides the interpreter.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => {
                log::info!("Loading config from {:?}", path);
                Self::from_file(path)?
            }
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                log::info!("Loading config from {}", DEFAULT_CONFIG_PATH);
                Self::from_file(DEFAULT_CONFIG_PATH)?
            }
            None => Self::default(),
        };

        if let Ok(python) = std::env::var(PYTHON_ENV_VAR) {
            if !python.trim().is_empty() {
                config.python = python;
            }
        }

        Ok(config)
    }
}
