use anyhow::{Result, anyhow, ensure};
use burn::tensor::activation;
use burn::tensor::backend::Backend;
use burn::tensor::{Int, Tensor, TensorData};

use crate::config::ModelOverrides;
use crate::dataset::AdditionDataset;
use crate::model::{AdditionClassifier, TrunkConfig};

/// Build a trunk configuration by applying training overrides.
pub fn build_trunk_config(
    overrides: &ModelOverrides,
    vocab_size: usize,
    block_size: usize,
) -> TrunkConfig {
    let mut config = TrunkConfig::new(vocab_size, block_size);

    if let Some(n_layer) = overrides.n_layer {
        config.n_layer = n_layer;
    }
    if let Some(n_embd) = overrides.n_embd {
        config.n_embd = n_embd;
    }
    if let Some(n_head) = overrides.n_head {
        config.n_head = n_head;
    }
    if let Some(dropout) = overrides.dropout {
        config.dropout = dropout;
    }

    config
}

/// One candidate sum with its softmax probability.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnswerPrediction {
    pub answer: usize,
    pub probability: f32,
}

/// Validate a raw problem string, append the `=` terminator if missing, and
/// pad and encode it exactly like a training row.
pub fn prepare_question(dataset: &AdditionDataset, problem: &str) -> Result<Vec<u32>> {
    let mut question = problem.trim().to_owned();
    if !question.ends_with('=') {
        question.push('=');
    }

    for ch in question.chars() {
        ensure!(
            dataset.vocab().contains(ch),
            "problem contains unsupported symbol {ch:?}"
        );
    }
    ensure!(
        question.chars().count() <= dataset.question_length(),
        "problem {question:?} does not fit the question window of {} symbols",
        dataset.question_length()
    );

    Ok(dataset.encode_question(&question))
}

/// Rank the `top` most probable sums for one problem.
pub fn predict_answers<B: Backend>(
    model: &AdditionClassifier<B>,
    dataset: &AdditionDataset,
    problem: &str,
    top: usize,
    device: &B::Device,
) -> Result<Vec<AnswerPrediction>> {
    ensure!(top > 0, "at least one candidate must be requested");

    let encoded = prepare_question(dataset, problem)?;
    let question_length = encoded.len();
    let tokens: Vec<i64> = encoded.iter().map(|&id| id as i64).collect();
    let inputs =
        Tensor::<B, 2, Int>::from_data(TensorData::new(tokens, [1, question_length]), device);

    let output = model.forward(inputs, None);
    let probabilities = activation::softmax(output.logits, 1);
    let k = top.min(dataset.answer_classes());
    let (values, indices) = probabilities.topk_with_indices(k, 1);

    let values = values
        .reshape([k])
        .to_data()
        .convert::<f32>()
        .into_vec::<f32>()
        .map_err(|err| anyhow!("{err:?}"))?;
    let indices = indices
        .reshape([k])
        .to_data()
        .convert::<i64>()
        .into_vec::<i64>()
        .map_err(|err| anyhow!("{err:?}"))?;

    Ok(values
        .into_iter()
        .zip(indices)
        .map(|(probability, answer)| AnswerPrediction {
            answer: answer as usize,
            probability,
        })
        .collect())
}

/// Most probable sum for one problem.
pub fn solve<B: Backend>(
    model: &AdditionClassifier<B>,
    dataset: &AdditionDataset,
    problem: &str,
    device: &B::Device,
) -> Result<usize> {
    let predictions = predict_answers(model, dataset, problem, 1, device)?;

    predictions
        .first()
        .map(|prediction| prediction.answer)
        .ok_or_else(|| anyhow!("classifier returned no candidates"))
}
