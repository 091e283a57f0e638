use std::fs;
use std::path::PathBuf;

use burn::tensor::backend::Backend as BackendTrait;
use burn_autodiff::Autodiff;
use burn_ndarray::NdArray;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tempfile::tempdir;

use tinyformer::{
    AdditionClassifier, AdditionDataset, ArithmeticVocab, OptimizerConfig, TaskConfig,
    TextCorpusDataset, TrainingHyperparameters, TrunkConfig, WordLanguageModel,
    load_training_config, train_addition_classifier, train_language_model,
};

type Backend = Autodiff<NdArray<f32>>;

#[test]
fn base_config_parses() {
    let config =
        load_training_config(&[PathBuf::from("config/base.toml")]).expect("load base config");

    assert_eq!(config.task, TaskConfig::Text);
    assert_eq!(config.training.block_size, 32);
    assert_eq!(config.training.seed, 1337);
    assert!(config.generation.is_some());
}

#[test]
fn adder_overlay_switches_task() {
    let config = load_training_config(&[
        PathBuf::from("config/base.toml"),
        PathBuf::from("config/adder.toml"),
    ])
    .expect("load layered config");

    assert!(matches!(config.task, TaskConfig::Adder { max_digits: 2 }));
    assert_eq!(config.training.batch_size, 64);
    assert_eq!(config.training.block_size, 32);
    assert_eq!(config.optimizer.learning_rate, 6e-4);
}

#[test]
fn later_files_override_earlier_values() {
    let dir = tempdir().expect("tempdir");
    let override_path = dir.path().join("override.toml");
    fs::write(
        &override_path,
        "[training]\nmax_iters = 3\n\n[optimizer]\nlearning_rate = 5e-3\n",
    )
    .expect("write override");

    let config = load_training_config(&[PathBuf::from("config/base.toml"), override_path])
        .expect("load layered config");

    assert_eq!(config.training.max_iters, 3);
    assert_eq!(config.training.eval_interval, 250);
    assert_eq!(config.optimizer.learning_rate, 5e-3);
}

#[test]
fn two_step_training_runs_for_both_tasks() {
    let device = <Backend as BackendTrait>::Device::default();
    <Backend as BackendTrait>::seed(0);
    let mut rng = StdRng::seed_from_u64(0);

    let training = TrainingHyperparameters {
        block_size: 8,
        batch_size: 2,
        max_iters: 2,
        eval_interval: 1,
        eval_iters: 1,
        seed: 0,
    };
    let optimizer = OptimizerConfig {
        learning_rate: 1e-3,
        weight_decay: 0.0,
    };

    let text = "one two three four five six seven eight nine ten eleven twelve ".repeat(10);
    let dataset =
        TextCorpusDataset::from_text(&text, training.block_size, training.batch_size)
            .expect("build dataset");
    let mut config = TrunkConfig::new(dataset.vocab().len(), training.block_size);
    config.n_layer = 1;
    config.n_embd = 32;
    config.n_head = 2;
    config.dropout = 0.0;

    let model = WordLanguageModel::<Backend>::new(&config, &device);
    let (_, report) =
        train_language_model(model, &dataset, &training, &optimizer, &mut rng, &device)
            .expect("language model training");
    assert!(report.train.loss.is_finite());
    assert!(report.val.loss.is_finite());
    assert!(report.val.accuracy.is_none());

    let dataset = AdditionDataset::new(ArithmeticVocab::new(), 1, training.batch_size)
        .expect("build dataset");
    let mut config = TrunkConfig::new(dataset.vocab().len(), dataset.question_length());
    config.n_layer = 1;
    config.n_embd = 32;
    config.n_head = 2;
    config.dropout = 0.0;

    let model = AdditionClassifier::<Backend>::new(&config, dataset.answer_classes(), &device);
    let (_, report) =
        train_addition_classifier(model, &dataset, &training, &optimizer, &mut rng, &device)
            .expect("classifier training");
    assert!(report.val.loss.is_finite());
    let accuracy = report.val.accuracy.expect("classifier reports accuracy");
    assert!((0.0..=1.0).contains(&accuracy));
}
