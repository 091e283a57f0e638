#![recursion_limit = "256"]

pub mod config;
pub mod dataset;
pub mod generation;
pub mod inference;
pub mod model;
pub mod training;
pub mod vocab;

pub use config::{
    GenerationConfig, ModelOverrides, OptimizerConfig, TaskConfig, TrainingConfig,
    TrainingHyperparameters, load_training_config,
};
pub use dataset::{
    AdditionDataset, AdditionProblem, ClassificationBatch, DatasetSplit, SequenceBatch,
    TextCorpusDataset, answer_classes, generate_problem, question_length,
};
pub use generation::{GenerationSettings, generate_text, generate_tokens};
pub use inference::{
    AnswerPrediction, build_trunk_config, predict_answers, prepare_question, solve,
};
pub use model::{
    AdditionClassifier, AdditionOutput, Trunk, TrunkConfig, WordLanguageModel, language_model_loss,
};
pub use training::{
    SplitEstimate, TrainReport, estimate_addition_classifier, estimate_language_model,
    train_addition_classifier, train_language_model,
};
pub use vocab::{ArithmeticVocab, Vocabulary, WordVocab};
