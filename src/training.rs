use anyhow::Result;
use burn::LearningRate;
use burn::module::AutodiffModule;
use burn::optim::{AdamWConfig, GradientsParams, Optimizer};
use burn::tensor::ElementConversion;
use burn::tensor::backend::{AutodiffBackend, Backend};
use rand::rngs::StdRng;
use tracing::info;

use crate::config::{OptimizerConfig, TrainingHyperparameters};
use crate::dataset::{AdditionDataset, DatasetSplit, TextCorpusDataset};
use crate::model::{AdditionClassifier, WordLanguageModel, language_model_loss};

/// Monte Carlo estimate over freshly sampled batches: mean loss, plus
/// exact-match accuracy where the task defines one.
#[derive(Clone, Copy, Debug)]
pub struct SplitEstimate {
    pub loss: f32,
    pub accuracy: Option<f32>,
}

/// Estimates from the most recent evaluation pass.
#[derive(Clone, Copy, Debug)]
pub struct TrainReport {
    pub train: SplitEstimate,
    pub val: SplitEstimate,
}

/// Train the language model with plain AdamW steps at a fixed learning rate.
/// Every `eval_interval` steps, and on the final step, the loop pauses to
/// estimate train and val loss on the gradient-free inner backend. The one
/// `rng` drives both training and evaluation sampling, so the data stream
/// depends on the order of those calls.
pub fn train_language_model<B: AutodiffBackend>(
    mut model: WordLanguageModel<B>,
    dataset: &TextCorpusDataset,
    training: &TrainingHyperparameters,
    optimizer: &OptimizerConfig,
    rng: &mut StdRng,
    device: &B::Device,
) -> Result<(WordLanguageModel<B>, TrainReport)> {
    let mut optim = AdamWConfig::new()
        .with_weight_decay(optimizer.weight_decay)
        .init::<B, WordLanguageModel<B>>();
    let lr: LearningRate = optimizer.learning_rate;

    let mut report = None;
    for step in 0..training.max_iters {
        if step % training.eval_interval.max(1) == 0 || step + 1 == training.max_iters {
            let estimate =
                estimate_language_model(&model.valid(), dataset, training.eval_iters, rng, device)?;
            info!(
                "step {step}: train loss {:.4}, val loss {:.4}",
                estimate.train.loss, estimate.val.loss
            );
            report = Some(estimate);
        }

        let batch = dataset.sample_batch::<B>(DatasetSplit::Train, rng, device)?;
        let logits = model.forward(batch.inputs);
        let loss = language_model_loss::<B>(logits, batch.targets);
        let grads = loss.backward();
        let grads = GradientsParams::from_grads(grads, &model);
        model = optim.step(lr, model, grads);
    }

    let report = match report {
        Some(report) => report,
        None => estimate_language_model(&model.valid(), dataset, training.eval_iters, rng, device)?,
    };

    Ok((model, report))
}

/// Mean language-model loss per split over `eval_iters` fresh batches.
pub fn estimate_language_model<B: Backend>(
    model: &WordLanguageModel<B>,
    dataset: &TextCorpusDataset,
    eval_iters: usize,
    rng: &mut StdRng,
    device: &B::Device,
) -> Result<TrainReport> {
    let train = estimate_split_loss(model, dataset, DatasetSplit::Train, eval_iters, rng, device)?;
    let val = estimate_split_loss(model, dataset, DatasetSplit::Val, eval_iters, rng, device)?;

    Ok(TrainReport {
        train: SplitEstimate {
            loss: train,
            accuracy: None,
        },
        val: SplitEstimate {
            loss: val,
            accuracy: None,
        },
    })
}

fn estimate_split_loss<B: Backend>(
    model: &WordLanguageModel<B>,
    dataset: &TextCorpusDataset,
    split: DatasetSplit,
    eval_iters: usize,
    rng: &mut StdRng,
    device: &B::Device,
) -> Result<f32> {
    let iters = eval_iters.max(1);
    let mut total = 0.0f32;

    for _ in 0..iters {
        let batch = dataset.sample_batch::<B>(split, rng, device)?;
        let logits = model.forward(batch.inputs);
        let loss = language_model_loss::<B>(logits, batch.targets);
        total += loss.into_scalar().elem::<f32>();
    }

    Ok(total / iters as f32)
}

/// Same loop shape as the language model, over synthetic addition batches.
/// Evaluation additionally reports exact-match accuracy.
pub fn train_addition_classifier<B: AutodiffBackend>(
    mut model: AdditionClassifier<B>,
    dataset: &AdditionDataset,
    training: &TrainingHyperparameters,
    optimizer: &OptimizerConfig,
    rng: &mut StdRng,
    device: &B::Device,
) -> Result<(AdditionClassifier<B>, TrainReport)> {
    let mut optim = AdamWConfig::new()
        .with_weight_decay(optimizer.weight_decay)
        .init::<B, AdditionClassifier<B>>();
    let lr: LearningRate = optimizer.learning_rate;

    let mut report = None;
    for step in 0..training.max_iters {
        if step % training.eval_interval.max(1) == 0 || step + 1 == training.max_iters {
            let estimate = estimate_addition_classifier(
                &model.valid(),
                dataset,
                training.eval_iters,
                rng,
                device,
            );
            info!(
                "step {step}: train loss {:.4}, val loss {:.4}, val accuracy {:.1}%",
                estimate.train.loss,
                estimate.val.loss,
                estimate.val.accuracy.unwrap_or_default() * 100.0
            );
            report = Some(estimate);
        }

        let batch = dataset.sample_batch::<B>(DatasetSplit::Train, rng, device);
        let output = model.forward(batch.inputs, Some(batch.targets));
        let loss = output.loss.expect("loss computed with targets");
        let grads = loss.backward();
        let grads = GradientsParams::from_grads(grads, &model);
        model = optim.step(lr, model, grads);
    }

    let report = match report {
        Some(report) => report,
        None => {
            estimate_addition_classifier(&model.valid(), dataset, training.eval_iters, rng, device)
        }
    };

    Ok((model, report))
}

/// Mean loss and exact-match accuracy per split over `eval_iters` fresh
/// batches. Addition problems are i.i.d., so the split is a label only.
pub fn estimate_addition_classifier<B: Backend>(
    model: &AdditionClassifier<B>,
    dataset: &AdditionDataset,
    eval_iters: usize,
    rng: &mut StdRng,
    device: &B::Device,
) -> TrainReport {
    let train =
        estimate_addition_split(model, dataset, DatasetSplit::Train, eval_iters, rng, device);
    let val = estimate_addition_split(model, dataset, DatasetSplit::Val, eval_iters, rng, device);

    TrainReport { train, val }
}

fn estimate_addition_split<B: Backend>(
    model: &AdditionClassifier<B>,
    dataset: &AdditionDataset,
    split: DatasetSplit,
    eval_iters: usize,
    rng: &mut StdRng,
    device: &B::Device,
) -> SplitEstimate {
    let iters = eval_iters.max(1);
    let mut total_loss = 0.0f32;
    let mut correct = 0i64;
    let mut seen = 0usize;

    for _ in 0..iters {
        let batch = dataset.sample_batch::<B>(split, rng, device);
        let [batch_size] = batch.targets.shape().dims();
        let output = model.forward(batch.inputs, Some(batch.targets.clone()));
        let loss = output.loss.expect("loss computed with targets");
        total_loss += loss.into_scalar().elem::<f32>();

        let predictions = output.logits.argmax(1).reshape([batch_size]);
        correct += predictions
            .equal(batch.targets)
            .int()
            .sum()
            .into_scalar()
            .elem::<i64>();
        seen += batch_size;
    }

    SplitEstimate {
        loss: total_loss / iters as f32,
        accuracy: Some(correct as f32 / seen.max(1) as f32),
    }
}
