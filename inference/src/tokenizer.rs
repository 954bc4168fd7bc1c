use crate::{InferenceError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Index written into padding positions.
pub const PAD_INDEX: i64 = 0;

const DEFAULT_FILTERS: &str = "!\"#$%&()*+,-./:;<=>?@[\\]^_`{|}~\t\n";

/// Maps text to vocabulary indices.
pub trait TextTokenizer: Send + Sync {
    fn text_to_sequence(&self, text: &str) -> Vec<i64>;
}

/// Fit a sequence to exactly `length` positions: excess is cut from the end,
/// missing positions are filled with `pad` after the content.
pub fn pad_sequence(mut sequence: Vec<i64>, length: usize, pad: i64) -> Vec<i64> {
    sequence.truncate(length);
    sequence.resize(length, pad);
    sequence
}

// Layout written by a fitted Keras `Tokenizer.to_json()`.
#[derive(Debug, Deserialize)]
struct TokenizerJson {
    config: TokenizerJsonConfig,
}

#[derive(Debug, Deserialize)]
struct TokenizerJsonConfig {
    #[serde(default)]
    num_words: Option<usize>,
    #[serde(default)]
    oov_token: Option<String>,
    #[serde(default = "default_lower")]
    lower: bool,
    #[serde(default)]
    filters: Option<String>,
    word_index: WordIndexField,
}

// Keras stores `word_index` as a JSON document inside a string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WordIndexField {
    Encoded(String),
    Map(HashMap<String, i64>),
}

fn default_lower() -> bool {
    true
}

/// Word-level tokenizer over a fixed, pre-fitted vocabulary.
#[derive(Debug, Clone)]
pub struct VocabTokenizer {
    word_index: HashMap<String, i64>,
    oov_index: Option<i64>,
    num_words: Option<usize>,
    lower: bool,
    filters: String,
}

impl VocabTokenizer {
    pub fn from_file(path: &Path) -> Result<Self> {
        tracing::info!("Loading tokenizer vocabulary from: {:?}", path);

        if !path.exists() {
            return Err(InferenceError::TokenizerLoad(format!(
                "Tokenizer file not found: {:?}",
                path
            )));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            InferenceError::TokenizerLoad(format!("Failed to read tokenizer: {}", e))
        })?;
        let tokenizer = Self::from_json(&content)?;
        tracing::info!(
            "Successfully loaded tokenizer ({} words, oov: {:?})",
            tokenizer.vocab_size(),
            tokenizer.oov_index
        );

        Ok(tokenizer)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let parsed: TokenizerJson = serde_json::from_str(json).map_err(|e| {
            InferenceError::TokenizerLoad(format!("Failed to parse tokenizer: {}", e))
        })?;
        let config = parsed.config;

        let word_index = match config.word_index {
            WordIndexField::Encoded(encoded) => serde_json::from_str(&encoded).map_err(|e| {
                InferenceError::TokenizerLoad(format!("Failed to parse word_index: {}", e))
            })?,
            WordIndexField::Map(map) => map,
        };

        let mut tokenizer = Self::from_word_index(word_index, config.oov_token.as_deref())?;
        tokenizer.num_words = config.num_words;
        tokenizer.lower = config.lower;
        if let Some(filters) = config.filters {
            tokenizer.filters = filters;
        }

        Ok(tokenizer)
    }

    pub fn from_word_index(
        word_index: HashMap<String, i64>,
        oov_token: Option<&str>,
    ) -> Result<Self> {
        if word_index.is_empty() {
            return Err(InferenceError::TokenizerLoad("Vocabulary is empty".to_string()));
        }

        if let Some((word, index)) = word_index.iter().find(|(_, index)| **index <= PAD_INDEX) {
            return Err(InferenceError::TokenizerLoad(format!(
                "Word '{}' has index {}, indices must be positive",
                word, index
            )));
        }

        let oov_index = match oov_token {
            Some(token) => match word_index.get(token) {
                Some(&index) => Some(index),
                None => {
                    tracing::warn!(
                        "OOV token '{}' is not in the vocabulary, unknown words will be dropped",
                        token
                    );
                    None
                }
            },
            None => None,
        };

        Ok(Self {
            word_index,
            oov_index,
            num_words: None,
            lower: true,
            filters: DEFAULT_FILTERS.to_string(),
        })
    }

    pub fn with_num_words(mut self, num_words: Option<usize>) -> Self {
        self.num_words = num_words;
        self
    }

    pub fn vocab_size(&self) -> usize {
        self.word_index.len()
    }

    pub fn oov_index(&self) -> Option<i64> {
        self.oov_index
    }

    fn lookup(&self, word: &str) -> Option<i64> {
        match self.word_index.get(word) {
            Some(&index) => match self.num_words {
                Some(limit) if index as usize >= limit => self.oov_index,
                _ => Some(index),
            },
            None => self.oov_index,
        }
    }
}

impl TextTokenizer for VocabTokenizer {
    fn text_to_sequence(&self, text: &str) -> Vec<i64> {
        let text = if self.lower { text.to_lowercase() } else { text.to_string() };
        let cleaned: String = text
            .chars()
            .map(|c| if self.filters.contains(c) { ' ' } else { c })
            .collect();

        cleaned
            .split_whitespace()
            .filter_map(|word| self.lookup(word))
            .collect()
    }
}
