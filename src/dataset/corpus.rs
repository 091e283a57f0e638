use anyhow::{Result, ensure};
use burn::tensor::backend::Backend;
use burn::tensor::{Int, Tensor, TensorData};
use rand::Rng;
use rand::rngs::StdRng;

use crate::vocab::WordVocab;

use super::DatasetSplit;

/// Public-domain Shakespeare excerpts, the training text for the word-level
/// language model.
const CORPUS: &str = include_str!("corpus.txt");

/// Batched token windows and their one-step-shifted targets.
#[derive(Clone, Debug)]
pub struct SequenceBatch<B: Backend> {
    pub inputs: Tensor<B, 2, Int>,
    pub targets: Tensor<B, 2, Int>,
}

#[derive(Clone, Debug)]
pub struct TextCorpusDataset {
    vocab: WordVocab,
    tokens: Vec<u32>,
    train_len: usize,
    block_size: usize,
    batch_size: usize,
}

impl TextCorpusDataset {
    /// Tokenize the built-in corpus.
    pub fn new(block_size: usize, batch_size: usize) -> Result<Self> {
        Self::from_text(CORPUS, block_size, batch_size)
    }

    /// Fit a vocabulary over `text` and split the token stream positionally
    /// in half: the first half trains, the second half validates. The halves
    /// cover different passages, which keeps the validation estimate honest
    /// about memorization at the cost of a distribution shift.
    pub fn from_text(text: &str, block_size: usize, batch_size: usize) -> Result<Self> {
        ensure!(
            block_size > 0 && batch_size > 0,
            "block_size and batch_size must be positive"
        );

        let vocab = WordVocab::fit(text)?;
        let tokens = vocab.encode(text);
        let train_len = tokens.len() / 2;

        Ok(Self {
            vocab,
            tokens,
            train_len,
            block_size,
            batch_size,
        })
    }

    pub fn vocab(&self) -> &WordVocab {
        &self.vocab
    }

    pub fn tokens(&self) -> &[u32] {
        &self.tokens
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    fn split_range(&self, split: DatasetSplit) -> (usize, usize) {
        match split {
            DatasetSplit::Train => (0, self.train_len),
            DatasetSplit::Val => (self.train_len, self.tokens.len() - self.train_len),
        }
    }

    /// Draw `batch_size` uniform window offsets from the split partition.
    /// Each target row is the input row shifted one position ahead. Fails
    /// when the partition is not strictly longer than `block_size`.
    pub fn sample_batch<B: Backend>(
        &self,
        split: DatasetSplit,
        rng: &mut StdRng,
        device: &B::Device,
    ) -> Result<SequenceBatch<B>> {
        let (offset, span) = self.split_range(split);
        ensure!(
            span > self.block_size,
            "{} split holds {span} tokens, not enough for window size {}",
            split.label(),
            self.block_size
        );

        let mut inputs = vec![0i64; self.batch_size * self.block_size];
        let mut targets = vec![0i64; self.batch_size * self.block_size];

        for batch_idx in 0..self.batch_size {
            let start = offset + rng.gen_range(0..span - self.block_size);
            for t in 0..self.block_size {
                let data_idx = start + t;
                inputs[batch_idx * self.block_size + t] = self.tokens[data_idx] as i64;
                targets[batch_idx * self.block_size + t] = self.tokens[data_idx + 1] as i64;
            }
        }

        let inputs = Tensor::<B, 2, Int>::from_data(
            TensorData::new(inputs, [self.batch_size, self.block_size]),
            device,
        );
        let targets = Tensor::<B, 2, Int>::from_data(
            TensorData::new(targets, [self.batch_size, self.block_size]),
            device,
        );

        Ok(SequenceBatch { inputs, targets })
    }
}
