pub mod discover;
pub mod error;
pub mod jsonl;
pub mod message;
pub mod prepare;
pub mod split;
pub mod template;

pub use discover::{default_training_file, find_latest_training_file};
pub use error::DatasetError;
pub use message::{Message, Role, TextRecord, TrainingExample};
pub use prepare::{prepare_training_data, PrepareSummary};
pub use split::{split_examples, Split, SplitConfig};
pub use template::to_chatml;
