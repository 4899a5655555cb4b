use thiserror::Error;

use dataset::DatasetError;

#[derive(Error, Debug)]
pub enum TrainerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML config error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Dataset(DatasetError),

    #[error("No training examples found")]
    EmptyDataset,

    #[error("invalid hyperparameters: {0}")]
    InvalidHyperparameters(String),

    #[error("Unknown model: {key} (available: {})", available.join(", "))]
    UnknownModel { key: String, available: Vec<String> },

    #[error("{package} is required. Install with: {install}")]
    MissingDependency { package: String, install: String },

    #[error("Python interpreter not found: {0}")]
    PythonNotFound(String),

    #[error("Training failed with exit code {}", describe_exit(code))]
    ProcessFailed { code: Option<i32> },
}

impl From<DatasetError> for TrainerError {
    fn from(err: DatasetError) -> Self {
        match err {
            DatasetError::EmptyDataset => Self::EmptyDataset,
            other => Self::Dataset(other),
        }
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(c) => c.to_string(),
        None => "unknown (terminated by signal)".to_string(),
    }
}

impl TrainerError {
    /// Process exit code for a tool that stops on this error.
    pub fn exit_code(&self) -> i32 {
        1
    }
}

pub type Result<T> = std::result::Result<T, TrainerError>;
