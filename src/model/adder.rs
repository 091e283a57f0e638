use burn::module::Module;
use burn::nn::loss::CrossEntropyLossConfig;
use burn::nn::{Linear, LinearConfig};
use burn::tensor::backend::Backend;
use burn::tensor::{Int, Tensor};

use super::{Trunk, TrunkConfig};

/// Logits over sum classes, plus the loss when targets were supplied.
#[derive(Clone, Debug)]
pub struct AdditionOutput<B: Backend> {
    pub logits: Tensor<B, 2>,
    pub loss: Option<Tensor<B, 1>>,
}

/// Transformer trunk with a linear head over sum classes. The context window
/// is the fixed padded question length.
#[derive(Module, Debug)]
pub struct AdditionClassifier<B: Backend> {
    trunk: Trunk<B>,
    head: Linear<B>,
}

impl<B: Backend> AdditionClassifier<B> {
    pub fn new(config: &TrunkConfig, answer_classes: usize, device: &B::Device) -> Self {
        let trunk = Trunk::new(config, device);
        let head = LinearConfig::new(config.n_embd, answer_classes).init(device);

        Self { trunk, head }
    }

    pub fn question_length(&self) -> usize {
        self.trunk.block_size()
    }

    /// Under the causal mask the hidden state at the final position has seen
    /// the whole question, so the head pools there. One cross-entropy term
    /// per example when targets are given, `None` otherwise.
    pub fn forward(
        &self,
        tokens: Tensor<B, 2, Int>,
        targets: Option<Tensor<B, 1, Int>>,
    ) -> AdditionOutput<B> {
        let hidden = self.trunk.forward(tokens);
        let [batch, time, channels] = hidden.shape().dims();
        let pooled = hidden.narrow(1, time - 1, 1).reshape([batch, channels]);
        let logits = self.head.forward(pooled);

        let loss = targets.map(|targets| {
            CrossEntropyLossConfig::new()
                .init(&logits.device())
                .forward(logits.clone(), targets)
        });

        AdditionOutput { logits, loss }
    }
}
