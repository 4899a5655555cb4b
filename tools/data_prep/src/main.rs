use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;

use dataset::{default_training_file, prepare_training_data, SplitConfig};

/// Convert a chat JSONL export into mlx-lm train/valid files
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to training data (JSONL)
    #[arg(short, long, default_value_os_t = default_training_file())]
    data: PathBuf,

    /// Directory to write train.jsonl and valid.jsonl into
    #[arg(short, long, default_value = "data")]
    output_dir: PathBuf,

    /// Fraction of examples held out for validation
    #[arg(long, default_value_t = 0.1)]
    val_split: f64,

    /// Minimum number of examples in each split
    #[arg(long, default_value_t = 2)]
    min_batch_size: usize,

    /// Shuffle seed
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let config = SplitConfig {
        val_fraction: cli.val_split,
        min_batch_size: cli.min_batch_size,
        seed: cli.seed,
    };
    log::debug!("Split config: {:?}", config);

    let summary = prepare_training_data(&cli.data, &cli.output_dir, &config)
        .with_context(|| format!("Failed to prepare {}", cli.data.display()))?;

    println!(
        "Done. Wrote {:?} and {:?}.",
        summary.train_path, summary.valid_path
    );
    Ok(())
}
