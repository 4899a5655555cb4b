use std::fs;
use std::path::{Path, PathBuf};

use dataset::{prepare_training_data, PrepareSummary};

use crate::config::FinetuneConfig;
use crate::error::{Result, TrainerError};
use crate::hparams::{Hyperparameters, TrainingPlan};
use crate::models::resolve_mlx_model;
use crate::python::PythonEnv;

/// Written by mlx-lm once training has produced an adapter.
pub const ADAPTER_CONFIG: &str = "adapter_config.json";

/// One `mlx_lm lora` invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct MlxJob {
    pub model_path: String,
    /// Directory holding `train.jsonl` and `valid.jsonl`.
    pub data_dir: PathBuf,
    pub adapter_dir: PathBuf,
    pub iterations: usize,
    pub batch_size: usize,
    pub learning_rate: f64,
}

impl MlxJob {
    /// Interpreter arguments, i.e. everything after `python`.
    pub fn args(&self) -> Vec<String> {
        vec![
            "-m".to_string(),
            "mlx_lm".to_string(),
            "lora".to_string(),
            "--model".to_string(),
            self.model_path.clone(),
            "--train".to_string(),
            "--data".to_string(),
            self.data_dir.display().to_string(),
            "--adapter-path".to_string(),
            self.adapter_dir.display().to_string(),
            "--iters".to_string(),
            self.iterations.to_string(),
            "--batch-size".to_string(),
            self.batch_size.to_string(),
            "--learning-rate".to_string(),
            format!("{:e}", self.learning_rate),
        ]
    }

    pub fn command_line(&self, python: &str) -> String {
        let mut parts = vec![python.to_string()];
        parts.extend(self.args());
        parts.join(" ")
    }

    pub fn follow_up_commands(&self, python: &str) -> Vec<String> {
        let adapter = self.adapter_dir.display();
        vec![
            format!(
                "{} -m mlx_lm generate --model {} --adapter-path {} --prompt 'What is my account balance?'",
                python, self.model_path, adapter
            ),
            format!(
                "{} -m mlx_lm fuse --model {} --adapter-path {} --save-path {}-fused",
                python, self.model_path, adapter, adapter
            ),
        ]
    }
}

/// An output directory left behind by a run that never wrote its adapter.
pub fn is_incomplete_run(output: &Path) -> bool {
    output.exists() && !output.join(ADAPTER_CONFIG).exists()
}

/// Remove `output` when it exists but holds no finished adapter.
pub fn cleanup_incomplete_run(output: &Path) -> Result<bool> {
    if !is_incomplete_run(output) {
        return Ok(false);
    }
    log::warn!("Removing incomplete previous run in {:?}", output);
    println!(
        "\nNote: Cleaning up incomplete previous run in {}",
        output.display()
    );
    fs::remove_dir_all(output)?;
    Ok(true)
}

/// Hints printed when a run stops on `err`.
pub fn troubleshooting(err: &TrainerError) -> Vec<String> {
    match err {
        TrainerError::ProcessFailed { .. } => vec![
            "Troubleshooting:".to_string(),
            "  1. Ensure mlx-lm is installed: pip install mlx-lm".to_string(),
            "  2. Check you have enough memory (16GB+ recommended)".to_string(),
            "  3. Try a smaller batch size: --batch-size 1".to_string(),
            "  4. Try a smaller model: --model phi4-mini".to_string(),
        ],
        TrainerError::PythonNotFound(_) => vec![
            "Make sure you're in the correct Python environment:".to_string(),
            "  source venv/bin/activate".to_string(),
            "  pip install mlx-lm".to_string(),
        ],
        _ => Vec::new(),
    }
}

#[derive(Debug, Clone)]
pub struct MlxOptions {
    /// Shortcut key or Hugging Face path.
    pub model: String,
    pub data_path: PathBuf,
    pub hparams: Hyperparameters,
    /// Prepare data and print the command without launching mlx-lm.
    pub dry_run: bool,
}

#[derive(Debug, Clone)]
pub struct MlxRun {
    pub job: MlxJob,
    pub plan: TrainingPlan,
    pub data: PrepareSummary,
}

pub struct MlxTrainer {
    config: FinetuneConfig,
    python: PythonEnv,
}

impl MlxTrainer {
    pub fn new(config: FinetuneConfig) -> Self {
        let python = PythonEnv::new(config.python.clone());
        Self { config, python }
    }

    pub fn run(&self, opts: &MlxOptions) -> Result<MlxRun> {
        opts.hparams.validate()?;

        if opts.dry_run {
            log::info!("Dry run: skipping mlx-lm check");
        } else {
            self.python.require_module("mlx_lm", "mlx-lm")?;
        }

        let model_path = resolve_mlx_model(&opts.model);
        let output = &opts.hparams.output_dir;

        println!("\n=== Fine-tuning Budget Assistant on Apple Silicon ===");
        println!("Base model: {}", model_path);
        println!("Training data: {}", opts.data_path.display());
        println!("Output: {}", output.display());
        println!("Epochs: {}", opts.hparams.epochs);

        if !opts.dry_run {
            cleanup_incomplete_run(output)?;
        } else if is_incomplete_run(output) {
            println!(
                "\nNote: {} holds an incomplete previous run; a real run would remove it",
                output.display()
            );
        }

        let data_dir = output.join("data");
        println!("\nPreparing training data...");
        let data = prepare_training_data(&opts.data_path, &data_dir, &self.config.split)?;

        let plan = TrainingPlan::derive(data.train, &opts.hparams, self.config.min_iterations)?;
        if plan.batch_adjusted {
            println!(
                "Note: Adjusted batch size to {} (dataset has {} examples)",
                plan.batch_size, plan.num_examples
            );
        }
        if plan.iterations_floored {
            println!("Note: Adjusted to minimum {} iterations", plan.iterations);
        }

        let job = MlxJob {
            model_path,
            data_dir,
            adapter_dir: output.clone(),
            iterations: plan.iterations,
            batch_size: plan.batch_size,
            learning_rate: opts.hparams.learning_rate,
        };

        println!("\nRunning: {}", job.command_line(&self.python.executable));

        if opts.dry_run {
            println!("\nDry run: not starting training.");
        } else {
            println!("\nStarting training...");
            self.python.run(job.args())?;

            println!("\n=== Training Complete ===");
            println!("LoRA adapters saved to: {}", output.display());
            let follow_ups = job.follow_up_commands(&self.python.executable);
            println!("\nTo test the model:\n  {}", follow_ups[0]);
            println!("\nTo fuse adapters into full model:\n  {}", follow_ups[1]);
            println!("\nTo convert for Ollama, see the documentation.");
        }

        Ok(MlxRun { job, plan, data })
    }
}
