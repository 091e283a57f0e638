use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct TrainingHyperparameters {
    pub block_size: usize,
    pub batch_size: usize,
    pub max_iters: usize,
    #[serde(default = "default_eval_interval")]
    pub eval_interval: usize,
    #[serde(default = "default_eval_iters")]
    pub eval_iters: usize,
    #[serde(default = "default_seed")]
    pub seed: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct GenerationConfig {
    pub prompt: String,
    pub max_tokens: usize,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default)]
    pub top_k: Option<usize>,
}

/// Which data pipeline and model head the run trains.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaskConfig {
    #[default]
    Text,
    Adder {
        #[serde(default = "default_max_digits")]
        max_digits: u32,
    },
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct ModelOverrides {
    pub n_layer: Option<usize>,
    pub n_embd: Option<usize>,
    pub n_head: Option<usize>,
    pub dropout: Option<f64>,
}

fn default_eval_interval() -> usize {
    500
}

fn default_eval_iters() -> usize {
    50
}

fn default_seed() -> u64 {
    1337
}

fn default_temperature() -> f32 {
    1.0
}

fn default_max_digits() -> u32 {
    2
}
