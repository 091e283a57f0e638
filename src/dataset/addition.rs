use anyhow::{Result, ensure};
use burn::tensor::backend::Backend;
use burn::tensor::{Int, Tensor, TensorData};
use rand::Rng;
use rand::rngs::StdRng;

use crate::vocab::ArithmeticVocab;

use super::DatasetSplit;

/// One synthetic addition exercise. `answer` is always the exact sum of the
/// operands printed in `question`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdditionProblem {
    pub question: String,
    pub answer: u32,
}

/// Draw two independent uniform operands in `[0, 10^max_digits - 1]` and
/// format the question as `"{a}+{b}="`.
pub fn generate_problem(max_digits: u32, rng: &mut StdRng) -> AdditionProblem {
    let max_operand = 10u32.pow(max_digits) - 1;
    let a = rng.gen_range(0..=max_operand);
    let b = rng.gen_range(0..=max_operand);

    AdditionProblem {
        question: format!("{a}+{b}="),
        answer: a + b,
    }
}

/// Number of distinct sums reachable with operands of up to `max_digits`
/// digits: everything in `[0, 2 * (10^max_digits - 1)]`.
pub fn answer_classes(max_digits: u32) -> usize {
    2 * (10usize.pow(max_digits) - 1) + 1
}

/// Fixed encoded length of a padded question: two worst-case operands plus
/// the `+` and `=` symbols.
pub fn question_length(max_digits: u32) -> usize {
    2 * max_digits as usize + 2
}

/// Encoded questions and one sum label per row.
#[derive(Clone, Debug)]
pub struct ClassificationBatch<B: Backend> {
    pub inputs: Tensor<B, 2, Int>,
    pub targets: Tensor<B, 1, Int>,
}

#[derive(Clone, Debug)]
pub struct AdditionDataset {
    vocab: ArithmeticVocab,
    max_digits: u32,
    batch_size: usize,
}

impl AdditionDataset {
    /// Operands are capped at nine digits; a wider `10^max_digits` no longer
    /// fits in `u32`, and zero digits leave no room for the operands.
    pub fn new(vocab: ArithmeticVocab, max_digits: u32, batch_size: usize) -> Result<Self> {
        ensure!(
            (1..=9).contains(&max_digits),
            "max_digits must be between 1 and 9, got {max_digits}"
        );
        ensure!(batch_size > 0, "batch_size must be positive");

        Ok(Self {
            vocab,
            max_digits,
            batch_size,
        })
    }

    pub fn vocab(&self) -> &ArithmeticVocab {
        &self.vocab
    }

    pub fn max_digits(&self) -> u32 {
        self.max_digits
    }

    pub fn question_length(&self) -> usize {
        question_length(self.max_digits)
    }

    pub fn answer_classes(&self) -> usize {
        answer_classes(self.max_digits)
    }

    /// Pad a bare question with trailing spaces to the fixed length, then
    /// encode it. `"2+3="` becomes the ids of `"2+3=  "` at two digits.
    pub fn encode_question(&self, question: &str) -> Vec<u32> {
        let padded = format!("{question:<width$}", width = self.question_length());
        self.vocab.encode(&padded)
    }

    /// Problems are drawn fresh for every batch. The split only labels the
    /// stream; both arms sample the same generator.
    pub fn sample_batch<B: Backend>(
        &self,
        _split: DatasetSplit,
        rng: &mut StdRng,
        device: &B::Device,
    ) -> ClassificationBatch<B> {
        let question_length = self.question_length();
        let mut inputs = Vec::with_capacity(self.batch_size * question_length);
        let mut targets = Vec::with_capacity(self.batch_size);

        for _ in 0..self.batch_size {
            let problem = generate_problem(self.max_digits, rng);
            let encoded = self.encode_question(&problem.question);
            inputs.extend(encoded.iter().map(|&id| id as i64));
            targets.push(problem.answer as i64);
        }

        let inputs = Tensor::<B, 2, Int>::from_data(
            TensorData::new(inputs, [self.batch_size, question_length]),
            device,
        );
        let targets =
            Tensor::<B, 1, Int>::from_data(TensorData::new(targets, [self.batch_size]), device);

        ClassificationBatch { inputs, targets }
    }
}
