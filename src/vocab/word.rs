use std::collections::HashMap;
use std::sync::LazyLock;

use anyhow::{Result, anyhow};
use indexmap::IndexSet;
use regex::Regex;

use super::Vocabulary;

/// Word-or-single-punctuation splitter shared by `fit` and `encode`.
static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+|[^\w\s]").expect("token pattern compiles"));

/// Open corpus-derived codec for the text task. Ids follow lexicographic
/// token order, so the assignment is reproducible for a given corpus.
#[derive(Clone, Debug)]
pub struct WordVocab {
    id2tok: Vec<String>,
    tok2id: HashMap<String, u32>,
}

impl WordVocab {
    /// Split the corpus into words and punctuation marks, dedupe, and sort.
    pub fn fit(corpus: &str) -> Result<Self> {
        let mut seen = IndexSet::new();
        for token in tokenize(corpus) {
            seen.insert(token);
        }
        if seen.is_empty() {
            return Err(anyhow!("corpus produced an empty vocabulary"));
        }

        let mut id2tok: Vec<String> = seen.into_iter().map(str::to_owned).collect();
        id2tok.sort();
        let tok2id = id2tok
            .iter()
            .enumerate()
            .map(|(idx, tok)| (tok.clone(), idx as u32))
            .collect();

        Ok(Self { id2tok, tok2id })
    }

    /// Tokens outside the vocabulary are dropped silently.
    pub fn encode(&self, text: &str) -> Vec<u32> {
        tokenize(text)
            .filter_map(|token| self.tok2id.get(token).copied())
            .collect()
    }

    /// Words are joined with single spaces; punctuation attaches to the
    /// preceding text. The original whitespace is not recoverable.
    pub fn decode(&self, ids: &[u32]) -> String {
        let mut text = String::new();
        for &id in ids {
            let idx = id as usize;
            let token = self
                .id2tok
                .get(idx)
                .unwrap_or_else(|| panic!("token id {id} out of range"));

            if !text.is_empty() && is_word(token) {
                text.push(' ');
            }
            text.push_str(token);
        }

        text
    }

    pub fn len(&self) -> usize {
        self.id2tok.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id2tok.is_empty()
    }
}

fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    TOKEN_PATTERN.find_iter(text).map(|m| m.as_str())
}

fn is_word(token: &str) -> bool {
    token.chars().all(|ch| ch.is_alphanumeric() || ch == '_')
}

impl Vocabulary for WordVocab {
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
        None
    }

    fn unk_id(&self) -> Option<u32> {
        None
    }
}
