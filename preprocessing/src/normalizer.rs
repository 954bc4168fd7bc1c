use crate::stopwords::StopWords;
use once_cell::sync::Lazy;
use regex::Regex;

static TAG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("valid tag pattern"));
static NON_LETTER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z]").expect("valid letter pattern"));
static WHITESPACE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

static DEFAULT_NORMALIZER: Lazy<TextNormalizer> = Lazy::new(TextNormalizer::new);

/// Normalize with the bundled English stopword list.
pub fn normalize(text: &str) -> String {
    DEFAULT_NORMALIZER.normalize(text)
}

/// Turns raw review text into lowercase letter-only tokens with short words
/// and stopwords removed.
///
/// Output is always lowercase ASCII letters separated by single spaces, with
/// no token shorter than two letters, so normalizing it again is a no-op.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    stopwords: StopWords,
}

impl TextNormalizer {
    pub fn new() -> Self {
        Self::with_stopwords(StopWords::english())
    }

    pub fn with_stopwords(stopwords: StopWords) -> Self {
        Self { stopwords }
    }

    pub fn stopwords(&self) -> &StopWords {
        &self.stopwords
    }

    pub fn normalize(&self, text: &str) -> String {
        let without_tags = TAG_REGEX.replace_all(text, "");
        let lowered = without_tags.to_lowercase();
        let letters_only = NON_LETTER_REGEX.replace_all(&lowered, " ");
        let without_single = remove_single_letters(&letters_only);
        let collapsed = WHITESPACE_REGEX.replace_all(&without_single, " ");

        self.remove_stopwords(collapsed.trim())
    }

    fn remove_stopwords(&self, text: &str) -> String {
        text.split_whitespace()
            .filter(|word| !self.stopwords.contains(word))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

// Input holds only ASCII letters and spaces, so a one-byte segment is a one-letter word.
fn remove_single_letters(text: &str) -> String {
    text.split(' ')
        .map(|segment| if segment.len() == 1 { "" } else { segment })
        .collect::<Vec<_>>()
        .join(" ")
}
