use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use dataset::jsonl::read_examples;

use crate::config::{FinetuneConfig, UnslothTrainingArgs};
use crate::error::{Result, TrainerError};
use crate::hparams::{Hyperparameters, TrainingPlan};
use crate::models::{unsloth_preset, LoraSettings};
use crate::python::PythonEnv;

pub const JOB_FILE: &str = "unsloth_job.json";
pub const SCRIPT_FILE: &str = "train_unsloth.py";

const DRIVER_SCRIPT: &str = include_str!("../assets/train_unsloth.py");

/// Everything the Python driver needs, serialized next to it as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnslothJob {
    pub model_name: String,
    pub max_seq_length: usize,
    pub load_in_4bit: bool,
    pub data_path: PathBuf,
    pub output_dir: PathBuf,
    pub epochs: usize,
    pub batch_size: usize,
    pub learning_rate: f64,
    pub lora: LoraSettings,
    pub training: UnslothTrainingArgs,
}

impl UnslothJob {
    /// Write the job description and driver script into `dir`.
    /// Returns `(job_path, script_path)`.
    pub fn write_job(&self, dir: &Path) -> Result<(PathBuf, PathBuf)> {
        fs::create_dir_all(dir)?;

        let job_path = dir.join(JOB_FILE);
        fs::write(&job_path, serde_json::to_string_pretty(self)?)?;

        let script_path = dir.join(SCRIPT_FILE);
        fs::write(&script_path, DRIVER_SCRIPT)?;

        log::debug!("Wrote {:?} and {:?}", job_path, script_path);
        Ok((job_path, script_path))
    }

    pub fn follow_up_commands(&self, python: &str) -> Vec<String> {
        vec![
            format!(
                "{} -m unsloth.save {} --quantization q4_k_m --output budget-assistant.gguf",
                python,
                self.output_dir.display()
            ),
            "ollama create budget-assistant -f Modelfile".to_string(),
        ]
    }
}

pub fn troubleshooting(err: &TrainerError) -> Vec<String> {
    match err {
        TrainerError::MissingDependency { .. } => vec![
            "Unsloth also needs: pip install transformers datasets peft accelerate bitsandbytes trl"
                .to_string(),
        ],
        TrainerError::ProcessFailed { .. } => vec![
            "Troubleshooting:".to_string(),
            "  1. Check that a CUDA-capable GPU is visible to PyTorch".to_string(),
            "  2. Try a smaller batch size: --batch-size 1".to_string(),
            "  3. Try a smaller model: --model phi4-mini".to_string(),
        ],
        TrainerError::UnknownModel { available, .. } => {
            vec![format!("Available: {}", available.join(", "))]
        }
        _ => Vec::new(),
    }
}

#[derive(Debug, Clone)]
pub struct UnslothOptions {
    /// Preset key, see [`crate::models::unsloth_model_keys`].
    pub model: String,
    pub data_path: PathBuf,
    pub hparams: Hyperparameters,
    pub dry_run: bool,
}

#[derive(Debug, Clone)]
pub struct UnslothRun {
    pub job: UnslothJob,
    pub plan: TrainingPlan,
    pub job_path: PathBuf,
    pub script_path: PathBuf,
}

pub struct UnslothTrainer {
    config: FinetuneConfig,
    python: PythonEnv,
}

impl UnslothTrainer {
    pub fn new(config: FinetuneConfig) -> Self {
        let python = PythonEnv::new(config.python.clone());
        Self { config, python }
    }

    pub fn run(&self, opts: &UnslothOptions) -> Result<UnslothRun> {
        opts.hparams.validate()?;

        if opts.dry_run {
            log::info!("Dry run: skipping unsloth check");
        } else {
            self.python.require_module("unsloth", "unsloth")?;
        }

        let preset = unsloth_preset(&opts.model)?;
        let output = &opts.hparams.output_dir;

        println!("\n=== Fine-tuning Budget Assistant ===");
        println!("Base model: {}", preset.model_name);
        println!("Training data: {}", opts.data_path.display());
        println!("Output: {}", output.display());
        println!("Epochs: {}", opts.hparams.epochs);

        let examples = read_examples(&opts.data_path)?;
        println!("Loaded {} training examples", examples.len());

        // No iteration floor here: the trainer counts epochs, not steps.
        let plan = TrainingPlan::derive(examples.len(), &opts.hparams, 0)?;
        if plan.batch_adjusted {
            println!(
                "Note: Adjusted batch size to {} (dataset has {} examples)",
                plan.batch_size, plan.num_examples
            );
        }

        let job = UnslothJob {
            model_name: preset.model_name,
            max_seq_length: preset.max_seq_length,
            load_in_4bit: preset.load_in_4bit,
            data_path: opts.data_path.clone(),
            output_dir: output.clone(),
            epochs: opts.hparams.epochs,
            batch_size: plan.batch_size,
            learning_rate: opts.hparams.learning_rate,
            lora: self.config.lora.clone(),
            training: self.config.unsloth.clone(),
        };
        let (job_path, script_path) = job.write_job(output)?;

        println!(
            "\nRunning: {} {} {}",
            self.python.executable,
            script_path.display(),
            job_path.display()
        );

        if opts.dry_run {
            println!("\nDry run: not starting training.");
        } else {
            self.python.run([&script_path, &job_path])?;

            println!("\n=== Training Complete ===");
            println!("Model saved to: {}", output.display());
            let follow_ups = job.follow_up_commands(&self.python.executable);
            println!("\nTo export for Ollama, run:\n  {}", follow_ups[0]);
            println!("\nThen create Ollama model:\n  {}", follow_ups[1]);
        }

        Ok(UnslothRun {
            job,
            plan,
            job_path,
            script_path,
        })
    }
}
