mod addition;
mod corpus;

pub use addition::{
    AdditionDataset, AdditionProblem, ClassificationBatch, answer_classes, generate_problem,
    question_length,
};
pub use corpus::{SequenceBatch, TextCorpusDataset};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DatasetSplit {
    Train,
    Val,
}

impl DatasetSplit {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Train => "train",
            Self::Val => "val",
        }
    }
}
