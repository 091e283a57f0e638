#![recursion_limit = "256"]

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use burn::module::AutodiffModule;
use burn::tensor::backend::Backend as BackendTrait;
use burn_autodiff::Autodiff;
use burn_ndarray::NdArray;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tinyformer::{
    AdditionClassifier, AdditionDataset, ArithmeticVocab, GenerationSettings, TaskConfig,
    TextCorpusDataset, TrainingConfig, WordLanguageModel, build_trunk_config, generate_problem,
    generate_text, load_training_config, predict_answers, solve, train_addition_classifier,
    train_language_model,
};

type Backend = Autodiff<NdArray<f32>>;
type Device = <Backend as BackendTrait>::Device;

#[derive(Parser, Debug)]
#[command(author, version, about = "Train a small transformer on text or addition problems")]
struct Cli {
    /// Additional configuration files applied in order (later files override earlier ones).
    #[arg(short = 'c', long = "config", value_name = "PATH")]
    config: Vec<PathBuf>,
}

pub fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    init_tracing();

    let args = Cli::parse();
    let mut config_paths = vec![PathBuf::from("config/base.toml")];
    config_paths.extend(args.config.clone());
    let config = load_training_config(&config_paths)?;

    let device = Device::default();
    <Backend as BackendTrait>::seed(config.training.seed);
    let mut rng = StdRng::seed_from_u64(config.training.seed);

    match &config.task {
        TaskConfig::Text => run_text(&config, &mut rng, &device),
        TaskConfig::Adder { max_digits } => run_adder(&config, *max_digits, &mut rng, &device),
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

fn run_text(config: &TrainingConfig, rng: &mut StdRng, device: &Device) -> Result<()> {
    let training = &config.training;
    let dataset = TextCorpusDataset::new(training.block_size, training.batch_size)?;
    info!(
        "text corpus ready: {} word tokens, vocabulary of {}",
        dataset.tokens().len(),
        dataset.vocab().len()
    );

    let trunk = build_trunk_config(&config.model, dataset.vocab().len(), training.block_size);
    let model = WordLanguageModel::<Backend>::new(&trunk, device);

    let (model, report) =
        train_language_model(model, &dataset, training, &config.optimizer, rng, device)?;
    info!(
        "final estimate: train loss {:.4}, val loss {:.4}",
        report.train.loss, report.val.loss
    );

    if let Some(generation) = &config.generation {
        let settings = GenerationSettings {
            max_new_tokens: generation.max_tokens,
            temperature: generation.temperature,
            top_k: generation.top_k,
        };
        let sample = generate_text(
            &model.valid(),
            dataset.vocab(),
            &generation.prompt,
            settings,
            rng,
            device,
        )?;
        info!("sample: {sample}");
    }

    Ok(())
}

fn run_adder(
    config: &TrainingConfig,
    max_digits: u32,
    rng: &mut StdRng,
    device: &Device,
) -> Result<()> {
    let training = &config.training;
    let dataset = AdditionDataset::new(ArithmeticVocab::new(), max_digits, training.batch_size)?;
    info!(
        "addition task ready: questions of {} symbols, {} answer classes",
        dataset.question_length(),
        dataset.answer_classes()
    );

    let trunk = build_trunk_config(
        &config.model,
        dataset.vocab().len(),
        dataset.question_length(),
    );
    let model = AdditionClassifier::<Backend>::new(&trunk, dataset.answer_classes(), device);

    let (model, report) =
        train_addition_classifier(model, &dataset, training, &config.optimizer, rng, device)?;
    info!(
        "final estimate: val loss {:.4}, val accuracy {:.1}%",
        report.val.loss,
        report.val.accuracy.unwrap_or_default() * 100.0
    );

    let model = model.valid();
    for _ in 0..5 {
        let problem = generate_problem(max_digits, rng);
        let predictions = predict_answers(&model, &dataset, &problem.question, 3, device)?;
        let summary = predictions
            .iter()
            .map(|p| format!("{} ({:.1}%)", p.answer, p.probability * 100.0))
            .collect::<Vec<_>>()
            .join(", ");
        info!(
            "{} expected {}, predicted {summary}",
            problem.question, problem.answer
        );
    }

    let check = generate_problem(max_digits, rng);
    let answer = solve(&model, &dataset, &check.question, device)?;
    info!("solve {} -> {answer}", check.question);

    Ok(())
}
