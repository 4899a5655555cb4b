use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use dataset::default_training_file;
use trainer::mlx::troubleshooting;
use trainer::models::DEFAULT_MODEL;
use trainer::{FinetuneConfig, Hyperparameters, MlxOptions, MlxTrainer, TrainerError};

/// Fine-tune Budget Assistant on Apple Silicon with mlx-lm
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Base model. Shortcuts: qwen2.5-3b, qwen2.5-7b, llama3.2-3b, phi4-mini,
    /// mistral-7b, or a Hugging Face path
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Path to training data (JSONL)
    #[arg(long, default_value_os_t = default_training_file())]
    data: PathBuf,

    /// Output directory for LoRA adapters
    #[arg(long, default_value = "budget-assistant-mlx")]
    output: PathBuf,

    /// Number of training epochs
    #[arg(long, default_value_t = 3)]
    epochs: usize,

    /// Training batch size
    #[arg(long, default_value_t = 2)]
    batch_size: usize,

    /// Learning rate
    #[arg(long, default_value_t = 1e-5)]
    lr: f64,

    /// YAML config (defaults to configs/finetune.yaml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Prepare data and print the mlx-lm command without running it.
    /// An incomplete previous run in the output directory is reported, not removed
    #[arg(long)]
    dry_run: bool,
}

fn run(cli: Cli) -> Result<()> {
    let config = FinetuneConfig::load(cli.config.as_deref()).context("Failed to load config")?;
    log::debug!("Using config: {:?}", config);

    let opts = MlxOptions {
        model: cli.model,
        data_path: cli.data,
        hparams: Hyperparameters {
            epochs: cli.epochs,
            batch_size: cli.batch_size,
            learning_rate: cli.lr,
            output_dir: cli.output,
        },
        dry_run: cli.dry_run,
    };

    MlxTrainer::new(config).run(&opts)?;
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run(Cli::parse()) {
        eprintln!("\nError: {:#}", err);
        match err.downcast_ref::<TrainerError>() {
            Some(trainer_err) => {
                for hint in troubleshooting(trainer_err) {
                    eprintln!("{}", hint);
                }
                std::process::exit(trainer_err.exit_code());
            }
            None => std::process::exit(1),
        }
    }
}
