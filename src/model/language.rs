use burn::module::Module;
use burn::nn::{Linear, LinearConfig};
use burn::tensor::backend::Backend;
use burn::tensor::{Int, Tensor};

use super::{Trunk, TrunkConfig};

/// Transformer trunk with a next-token projection over the word vocabulary.
#[derive(Module, Debug)]
pub struct WordLanguageModel<B: Backend> {
    trunk: Trunk<B>,
    lm_head: Linear<B>,
}

impl<B: Backend> WordLanguageModel<B> {
    pub fn new(config: &TrunkConfig, device: &B::Device) -> Self {
        let trunk = Trunk::new(config, device);
        let lm_head = LinearConfig::new(config.n_embd, config.vocab_size).init(device);

        Self { trunk, lm_head }
    }

    pub fn context_window(&self) -> usize {
        self.trunk.block_size()
    }

    /// Next-token logits for every position, `[batch, seq, vocab]`.
    pub fn forward(&self, tokens: Tensor<B, 2, Int>) -> Tensor<B, 3> {
        let hidden = self.trunk.forward(tokens);
        self.lm_head.forward(hidden)
    }
}
