use std::cmp::Ordering;

use anyhow::{Result, anyhow};
use burn::tensor::backend::Backend;
use burn::tensor::{Int, Tensor, TensorData};
use rand::distributions::WeightedIndex;
use rand::prelude::*;
use rand::rngs::StdRng;

use crate::model::WordLanguageModel;
use crate::vocab::Vocabulary;

/// Sampling knobs for autoregressive generation.
#[derive(Clone, Copy, Debug)]
pub struct GenerationSettings {
    pub max_new_tokens: usize,
    pub temperature: f32,
    pub top_k: Option<usize>,
}

/// Draw one token id from raw logit values, optionally keeping only the
/// `top_k` highest entries. Falls back to a uniform draw when the softmax
/// degenerates.
fn sample_from_logits_values(
    mut logits_values: Vec<f32>,
    top_k: Option<usize>,
    rng: &mut StdRng,
) -> Result<i64> {
    let vocab = logits_values.len();
    if vocab == 0 {
        return Err(anyhow!("logits are empty"));
    }

    if let Some(k) = top_k
        && k > 0
        && k < vocab
    {
        let mut sorted = logits_values.clone();
        sorted.sort_by(|a, b| b.partial_cmp(a).unwrap_or(Ordering::Equal));
        let threshold = sorted[k - 1];
        for value in logits_values.iter_mut() {
            if *value < threshold {
                *value = f32::NEG_INFINITY;
            }
        }
    }

    let max_logit = logits_values
        .iter()
        .copied()
        .fold(f32::NEG_INFINITY, f32::max);
    let mut probs: Vec<f32> = logits_values
        .iter()
        .map(|value| (value - max_logit).exp())
        .collect();
    let sum: f32 = probs.iter().sum();
    if sum == 0.0 || sum.is_nan() {
        let uniform = 1.0 / vocab as f32;
        for p in probs.iter_mut() {
            *p = uniform;
        }
    } else {
        for p in probs.iter_mut() {
            *p /= sum;
        }
    }

    let dist = WeightedIndex::new(&probs).map_err(|err| anyhow!(err.to_string()))?;
    Ok(dist.sample(rng) as i64)
}

/// Append `max_new_tokens` sampled ids to the prompt. The trunk is
/// stateless, so the growing context is re-truncated to the last
/// `block_size` ids and re-fed on every step.
pub fn generate_tokens<B: Backend>(
    model: &WordLanguageModel<B>,
    prompt_tokens: Vec<i64>,
    settings: GenerationSettings,
    rng: &mut StdRng,
    device: &B::Device,
) -> Result<Vec<i64>> {
    if prompt_tokens.is_empty() {
        return Err(anyhow!("prompt must contain at least one token"));
    }

    let block_size = model.context_window();
    let mut full_tokens = prompt_tokens;

    for _ in 0..settings.max_new_tokens {
        let start = full_tokens.len().saturating_sub(block_size);
        let context = full_tokens[start..].to_vec();
        let context_len = context.len();
        let context_tensor =
            Tensor::<B, 2, Int>::from_data(TensorData::new(context, [1, context_len]), device);

        let logits = model.forward(context_tensor);
        let [_, time, vocab] = logits.shape().dims();
        let last_logits = logits
            .narrow(1, time - 1, 1)
            .reshape([vocab])
            .div_scalar(settings.temperature);
        let logits_values = last_logits
            .to_data()
            .convert::<f32>()
            .into_vec::<f32>()
            .map_err(|err| anyhow!("{err:?}"))?;

        let next = sample_from_logits_values(logits_values, settings.top_k, rng)?;
        full_tokens.push(next);
    }

    Ok(full_tokens)
}

/// Encode the prompt, truncate it to the context window, generate, decode.
pub fn generate_text<B: Backend>(
    model: &WordLanguageModel<B>,
    vocab: &dyn Vocabulary,
    prompt: &str,
    settings: GenerationSettings,
    rng: &mut StdRng,
    device: &B::Device,
) -> Result<String> {
    let mut prompt_ids = vocab.encode(prompt);
    if prompt_ids.is_empty() {
        return Err(anyhow!(
            "prompt {prompt:?} does not encode to any known token"
        ));
    }

    let block_size = model.context_window();
    if prompt_ids.len() > block_size {
        prompt_ids = prompt_ids[prompt_ids.len() - block_size..].to_vec();
    }

    let prompt_tokens: Vec<i64> = prompt_ids.iter().map(|&id| id as i64).collect();
    let tokens = generate_tokens(model, prompt_tokens, settings, rng, device)?;

    let ids: Vec<u32> = tokens
        .iter()
        .filter_map(|&tok| (tok >= 0).then_some(tok as u32))
        .collect();

    Ok(vocab.decode(&ids))
}
