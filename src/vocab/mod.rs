pub mod arithmetic;
pub mod word;

pub use arithmetic::ArithmeticVocab;
pub use word::WordVocab;

/// Bijective symbol/id codec. Ids are dense in `[0, len)`; neither codec
/// defines sequence-boundary tokens, so `bos_id` and `eos_id` stay `None`.
pub trait Vocabulary: Send + Sync {
    fn encode(&self, text: &str) -> Vec<u32>;
    fn decode(&self, ids: &[u32]) -> String;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool;
    fn bos_id(&self) -> Option<u32>;
    fn eos_id(&self) -> Option<u32>;
    fn pad_id(&self) -> Option<u32>;
    fn unk_id(&self) -> Option<u32>;
}
