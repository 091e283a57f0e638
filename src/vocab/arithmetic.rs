use std::collections::HashMap;

use super::Vocabulary;

/// Every symbol an addition question can contain, in id order. The trailing
/// space doubles as the padding symbol.
const SYMBOLS: [char; 13] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', '+', '=', ' ',
];

const PAD_ID: u32 = 12;

/// Closed fixed-alphabet codec for `"{a}+{b}="` questions. Round trips are
/// exact; symbols outside the alphabet are a programmer error and panic.
#[derive(Clone, Debug)]
pub struct ArithmeticVocab {
    id2ch: Vec<char>,
    ch2id: HashMap<char, u32>,
}

impl ArithmeticVocab {
    pub fn new() -> Self {
        let id2ch: Vec<char> = SYMBOLS.to_vec();
        let ch2id = id2ch
            .iter()
            .enumerate()
            .map(|(idx, &ch)| (ch, idx as u32))
            .collect();

        Self { id2ch, ch2id }
    }

    pub fn encode(&self, s: &str) -> Vec<u32> {
        s.chars()
            .map(|ch| match self.ch2id.get(&ch) {
                Some(&id) => id,
                None => panic!("character {ch:?} missing from vocabulary"),
            })
            .collect()
    }

    pub fn decode(&self, ids: &[u32]) -> String {
        ids.iter()
            .map(|&id| {
                let idx = id as usize;
                *self
                    .id2ch
                    .get(idx)
                    .unwrap_or_else(|| panic!("token id {id} out of range"))
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.id2ch.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id2ch.is_empty()
    }

    pub fn contains(&self, ch: char) -> bool {
        self.ch2id.contains_key(&ch)
    }

    pub fn pad(&self) -> u32 {
        PAD_ID
    }
}

impl Default for ArithmeticVocab {
    fn default() -> Self {
        Self::new()
    }
}

impl Vocabulary for ArithmeticVocab {
    fn encode(&self, text: &str) -> Vec<u32> {
        Self::encode(self, text)
    }

    fn decode(&self, ids: &[u32]) -> String {
        Self::decode(self, ids)
    }

    fn len(&self) -> usize {
        Self::len(self)
    }

    fn is_empty(&self) -> bool {
        Self::is_empty(self)
    }

    fn bos_id(&self) -> Option<u32> {
        None
    }

    fn eos_id(&self) -> Option<u32> {
        None
    }

    fn pad_id(&self) -> Option<u32> {
        Some(self.pad())
    }

    fn unk_id(&self) -> Option<u32> {
        None
    }
}
