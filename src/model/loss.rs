use burn::nn::loss::CrossEntropyLossConfig;
use burn::tensor::backend::Backend;
use burn::tensor::{Int, Tensor};

/// Cross entropy between per-position logits `[batch, seq, vocab]` and
/// target ids `[batch, seq]`, averaged over every position in the batch.
pub fn language_model_loss<B: Backend>(
    logits: Tensor<B, 3>,
    targets: Tensor<B, 2, Int>,
) -> Tensor<B, 1> {
    let [batch, time, vocab] = logits.shape().dims();
    let logits = logits.reshape([batch * time, vocab]);
    let targets = targets.reshape([batch * time]);

    CrossEntropyLossConfig::new()
        .init(&logits.device())
        .forward(logits, targets)
}
