use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{DatasetError, Result};
use crate::jsonl::{read_examples, write_records};
use crate::message::TextRecord;
use crate::split::{split_examples, SplitConfig};
use crate::template::to_chatml;

pub const TRAIN_FILE: &str = "train.jsonl";
pub const VALID_FILE: &str = "valid.jsonl";

#[derive(Debug, Clone)]
pub struct PrepareSummary {
    pub train: usize,
    pub valid: usize,
    pub duplicated: bool,
    pub train_path: PathBuf,
    pub valid_path: PathBuf,
}

/// Convert a chat JSONL file into mlx-lm `{"text": ...}` records and write a
/// seeded train/validation split into `output_dir`.
pub fn prepare_training_data(
    input: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    config: &SplitConfig,
) -> Result<PrepareSummary> {
    let input = input.as_ref();
    let output_dir = output_dir.as_ref();

    let records: Vec<TextRecord> = read_examples(input)?
        .iter()
        .map(|ex| TextRecord {
            text: to_chatml(&ex.messages),
        })
        .collect();
    log::info!("Read {} examples from {:?}", records.len(), input);

    let total = records.len();
    let split = split_examples(records, config)?;
    if split.duplicated {
        println!(
            "Note: Dataset has only {} examples, duplicating to meet minimum requirements",
            total
        );
    }

    fs::create_dir_all(output_dir).map_err(|e| DatasetError::io(output_dir, e))?;

    let train_path = output_dir.join(TRAIN_FILE);
    let valid_path = output_dir.join(VALID_FILE);
    write_records(&train_path, &split.train)?;
    write_records(&valid_path, &split.valid)?;

    println!(
        "Prepared {} training + {} validation examples",
        split.train.len(),
        split.valid.len()
    );

    Ok(PrepareSummary {
        train: split.train.len(),
        valid: split.valid.len(),
        duplicated: split.duplicated,
        train_path,
        valid_path,
    })
}
