pub mod cache;
pub mod config;
pub mod error;
pub mod model;
pub mod service;
pub mod tokenizer;

pub use cache::ResponseCache;
pub use config::{InferenceConfig, ModelInputType};
pub use error::{InferenceError, Result};
pub use model::{OnnxSentimentModel, SentimentModel};
pub use service::{PredictionService, NO_REVIEW_MESSAGE};
pub use tokenizer::{pad_sequence, TextTokenizer, VocabTokenizer, PAD_INDEX};

use serde::{Deserialize, Serialize};

/// Probability at or above which a review is labeled positive.
pub const POSITIVE_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Negative,
}

/// Label plus confidence toward that label, as a percentage with two decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub sentiment: Sentiment,
    pub confidence: f64,
}

impl Prediction {
    pub fn from_probability(probability: f64) -> Self {
        let (sentiment, toward_label) = if probability >= POSITIVE_THRESHOLD {
            (Sentiment::Positive, probability)
        } else {
            // The complement is taken at the model's f32 output precision.
            (Sentiment::Negative, f64::from(1.0 - probability as f32))
        };

        Self {
            sentiment,
            confidence: round_to_hundredths(toward_label * 100.0),
        }
    }
}

/// Two decimal places, ties to even on the exact binary value.
fn round_to_hundredths(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}
