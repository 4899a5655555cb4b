use anyhow::{Context, Result};
use clap::builder::PossibleValuesParser;
use clap::Parser;
use std::path::PathBuf;

use dataset::default_training_file;
use trainer::models::{unsloth_model_keys, DEFAULT_MODEL};
use trainer::unsloth::troubleshooting;
use trainer::{FinetuneConfig, Hyperparameters, TrainerError, UnslothOptions, UnslothTrainer};

/// Fine-tune Budget Assistant with Unsloth
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Base model to fine-tune
    #[arg(long, default_value = DEFAULT_MODEL, value_parser = PossibleValuesParser::new(unsloth_model_keys()))]
    model: String,

    /// Path to training data (JSONL)
    #[arg(long, default_value_os_t = default_training_file())]
    data: PathBuf,

    /// Output directory for fine-tuned model
    #[arg(long, default_value = "budget-assistant-lora")]
    output: PathBuf,

    /// Number of training epochs
    #[arg(long, default_value_t = 3)]
    epochs: usize,

    /// Training batch size
    #[arg(long, default_value_t = 2)]
    batch_size: usize,

    /// Learning rate
    #[arg(long, default_value_t = 2e-4)]
    lr: f64,

    /// YAML config (defaults to configs/finetune.yaml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the job files without launching training
    #[arg(long)]
    dry_run: bool,
}

fn run(cli: Cli) -> Result<()> {
    let config = FinetuneConfig::load(cli.config.as_deref()).context("Failed to load config")?;
    log::debug!("Using config: {:?}", config);

    let opts = UnslothOptions {
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

    UnslothTrainer::new(config).run(&opts)?;
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
