use burn::module::Module;
use burn::nn::attention::generate_autoregressive_mask;
use burn::nn::transformer::{
    TransformerEncoder, TransformerEncoderConfig, TransformerEncoderInput,
};
use burn::nn::{Dropout, DropoutConfig, Embedding, EmbeddingConfig};
use burn::tensor::backend::Backend;
use burn::tensor::{Int, Tensor};

/// Width of the feed-forward hidden layer relative to the embedding.
const FEED_FORWARD_MULTIPLIER: usize = 4;

#[derive(Clone, Debug)]
pub struct TrunkConfig {
    pub vocab_size: usize,
    pub block_size: usize,
    pub n_layer: usize,
    pub n_embd: usize,
    pub n_head: usize,
    pub dropout: f64,
}

impl TrunkConfig {
    pub fn new(vocab_size: usize, block_size: usize) -> Self {
        Self {
            vocab_size,
            block_size,
            n_layer: 4,
            n_embd: 128,
            n_head: 4,
            dropout: 0.1,
        }
    }
}

/// Token and learned position embeddings feeding a causally masked
/// transformer encoder. Task heads compose around this; the attention
/// internals come from burn. One dropout rate drives both the embedding
/// dropout and the encoder.
#[derive(Module, Debug)]
pub struct Trunk<B: Backend> {
    block_size: usize,
    token_embedding: Embedding<B>,
    position_embedding: Embedding<B>,
    dropout: Dropout,
    encoder: TransformerEncoder<B>,
}

impl<B: Backend> Trunk<B> {
    pub fn new(config: &TrunkConfig, device: &B::Device) -> Self {
        assert!(
            config.n_embd.is_multiple_of(config.n_head),
            "embedding width {} must be divisible by {} heads",
            config.n_embd,
            config.n_head
        );

        let token_embedding = EmbeddingConfig::new(config.vocab_size, config.n_embd).init(device);
        let position_embedding =
            EmbeddingConfig::new(config.block_size, config.n_embd).init(device);
        let dropout = DropoutConfig::new(config.dropout).init();
        let encoder = TransformerEncoderConfig::new(
            config.n_embd,
            config.n_embd * FEED_FORWARD_MULTIPLIER,
            config.n_head,
            config.n_layer,
        )
        .with_dropout(config.dropout)
        .with_norm_first(true)
        .init(device);

        Self {
            block_size: config.block_size,
            token_embedding,
            position_embedding,
            dropout,
            encoder,
        }
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Hidden states for every position, `[batch, seq, n_embd]`.
    pub fn forward(&self, tokens: Tensor<B, 2, Int>) -> Tensor<B, 3> {
        let [batch, time] = tokens.shape().dims();
        assert!(
            time <= self.block_size,
            "sequence length {time} exceeds context window {}",
            self.block_size
        );

        let device = tokens.device();
        let positions = Tensor::<B, 1, Int>::arange(0..time as i64, &device)
            .reshape([1, time])
            .repeat_dim(0, batch);

        let embedded =
            self.token_embedding.forward(tokens) + self.position_embedding.forward(positions);
        let embedded = self.dropout.forward(embedded);

        let mask = generate_autoregressive_mask::<B>(batch, time, &device);
        let input = TransformerEncoderInput::new(embedded).mask_attn(mask);

        self.encoder.forward(input)
    }
}
