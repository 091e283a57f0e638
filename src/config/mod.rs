pub mod core;
pub mod train;

pub use core::{
    GenerationConfig, ModelOverrides, TaskConfig, TrainingHyperparameters,
};
pub use train::{OptimizerConfig, TrainingConfig, load_training_config};
