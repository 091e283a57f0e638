use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use super::core::{GenerationConfig, ModelOverrides, TaskConfig, TrainingHyperparameters};

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct OptimizerConfig {
    pub learning_rate: f64,
    #[serde(default)]
    pub weight_decay: f32,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct TrainingConfig {
    pub task: TaskConfig,
    pub training: TrainingHyperparameters,
    pub optimizer: OptimizerConfig,
    #[serde(default)]
    pub model: ModelOverrides,
    pub generation: Option<GenerationConfig>,
}

/// Load and merge TOML config files in order. Later files override earlier
/// ones key by key; tables merge recursively, everything else replaces.
pub fn load_training_config(paths: &[PathBuf]) -> Result<TrainingConfig> {
    let mut merged: Option<toml::Value> = None;

    for path in paths {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let value: toml::Value = raw
            .parse()
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        merged = Some(match merged {
            Some(base) => merge_values(base, value),
            None => value,
        });
    }

    merged
        .ok_or_else(|| anyhow!("no configuration files were provided"))?
        .try_into()
        .context("configuration files did not form a valid training config")
}

fn merge_values(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base), toml::Value::Table(overlay)) => {
            for (key, value) in overlay {
                let merged = match base.remove(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => value,
                };
                base.insert(key, merged);
            }
            toml::Value::Table(base)
        }
        (_, overlay) => overlay,
    }
}
