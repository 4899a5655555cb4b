use serde::{Deserialize, Serialize};

use crate::error::{Result, TrainerError};

pub const DEFAULT_MODEL: &str = "qwen2.5-3b";

/// Pre-quantized checkpoints for Apple Silicon.
pub const MLX_MODELS: &[(&str, &str)] = &[
    ("qwen2.5-3b", "mlx-community/Qwen2.5-3B-Instruct-4bit"),
    ("qwen2.5-7b", "mlx-community/Qwen2.5-7B-Instruct-4bit"),
    ("llama3.2-3b", "mlx-community/Llama-3.2-3B-Instruct-4bit"),
    ("phi4-mini", "mlx-community/phi-4-mini-instruct-4bit"),
    ("mistral-7b", "mlx-community/Mistral-7B-Instruct-v0.3-4bit"),
];

pub fn mlx_model_keys() -> Vec<&'static str> {
    MLX_MODELS.iter().map(|(key, _)| *key).collect()
}

/// Map a shortcut to its repository; anything else is taken as a direct
/// Hugging Face path.
pub fn resolve_mlx_model(key: &str) -> String {
    MLX_MODELS
        .iter()
        .find(|(k, _)| *k == key)
        .map_or_else(|| key.to_string(), |(_, path)| path.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnslothPreset {
    pub model_name: String,
    pub max_seq_length: usize,
    pub load_in_4bit: bool,
}

const UNSLOTH_MODELS: &[(&str, &str, usize)] = &[
    ("qwen2.5-3b", "unsloth/Qwen2.5-3B-Instruct-bnb-4bit", 4096),
    ("phi4-mini", "unsloth/Phi-4-mini-instruct-bnb-4bit", 4096),
    ("llama3.2-3b", "unsloth/Llama-3.2-3B-Instruct-bnb-4bit", 4096),
    ("mistral-7b", "unsloth/mistral-7b-instruct-v0.3-bnb-4bit", 8192),
];

pub fn unsloth_model_keys() -> Vec<&'static str> {
    UNSLOTH_MODELS.iter().map(|(key, _, _)| *key).collect()
}

pub fn unsloth_preset(key: &str) -> Result<UnslothPreset> {
    UNSLOTH_MODELS
        .iter()
        .find(|(k, _, _)| *k == key)
        .map(|(_, name, max_seq_length)| UnslothPreset {
            model_name: name.to_string(),
            max_seq_length: *max_seq_length,
            load_in_4bit: true,
        })
        .ok_or_else(|| TrainerError::UnknownModel {
            key: key.to_string(),
            available: unsloth_model_keys().into_iter().map(String::from).collect(),
        })
}

/// LoRA adapter settings handed to `FastLanguageModel.get_peft_model`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoraSettings {
    pub r: usize,
    pub lora_alpha: usize,
    pub lora_dropout: f64,
    pub target_modules: Vec<String>,
    pub bias: String,
    pub use_gradient_checkpointing: String,
    pub random_state: u64,
    pub use_rslora: bool,
}

impl Default for LoraSettings {
    fn default() -> Self {
        Self {
            r: 16,
            lora_alpha: 16,
            lora_dropout: 0.0,
            target_modules: [
                "q_proj",
                "k_proj",
                "v_proj",
                "o_proj",
                "gate_proj",
                "up_proj",
                "down_proj",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            bias: "none".to_string(),
            use_gradient_checkpointing: "unsloth".to_string(),
            random_state: 42,
            use_rslora: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shortcuts_resolve_and_paths_pass_through() {
        assert_eq!(
            resolve_mlx_model("phi4-mini"),
            "mlx-community/phi-4-mini-instruct-4bit"
        );
        assert_eq!(
            resolve_mlx_model("someone/custom-model-4bit"),
            "someone/custom-model-4bit"
        );
    }

    #[test]
    fn unsloth_presets() {
        let mistral = unsloth_preset("mistral-7b").unwrap();
        assert_eq!(mistral.max_seq_length, 8192);
        assert!(mistral.load_in_4bit);

        match unsloth_preset("qwen2.5-7b").unwrap_err() {
            TrainerError::UnknownModel { key, available } => {
                assert_eq!(key, "qwen2.5-7b");
                assert_eq!(available.len(), 4);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
