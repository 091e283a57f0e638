mod adder;
mod language;
mod loss;
mod trunk;

pub use adder::{AdditionClassifier, AdditionOutput};
pub use language::WordLanguageModel;
pub use loss::language_model_loss;
pub use trunk::{Trunk, TrunkConfig};
