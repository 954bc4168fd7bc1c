use crate::cache::ResponseCache;
use crate::config::InferenceConfig;
use crate::model::{check_probability, OnnxSentimentModel, SentimentModel};
use crate::tokenizer::{pad_sequence, TextTokenizer, VocabTokenizer, PAD_INDEX};
use crate::{InferenceError, Prediction, Result};
use preprocessing::{StopWords, TextNormalizer};
use std::sync::Arc;

pub const NO_REVIEW_MESSAGE: &str = "No review provided";

/// Normalizes, tokenizes and classifies reviews, caching serialized responses.
///
/// Everything except the cache is read-only after construction, so one
/// instance is shared by all request handlers.
pub struct PredictionService {
    normalizer: TextNormalizer,
    tokenizer: Box<dyn TextTokenizer>,
    model: Box<dyn SentimentModel>,
    sequence_length: usize,
    cache: ResponseCache,
}

impl PredictionService {
    pub fn new(
        normalizer: TextNormalizer,
        tokenizer: Box<dyn TextTokenizer>,
        model: Box<dyn SentimentModel>,
        config: &InferenceConfig,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            normalizer,
            tokenizer,
            model,
            sequence_length: config.sequence_length,
            cache: ResponseCache::new(config.cache_max_bytes, config.cache_ttl()),
        })
    }

    /// Load the stopword list, tokenizer vocabulary and ONNX model named by `config`.
    pub fn load(config: &InferenceConfig) -> Result<Self> {
        tracing::info!("Initializing prediction service");
        config.validate()?;

        let stopwords = match &config.stopwords_path {
            Some(path) => StopWords::from_file(path)?,
            None => StopWords::english(),
        };
        let tokenizer = VocabTokenizer::from_file(&config.tokenizer_path)?;
        let model = OnnxSentimentModel::new(&config.model_path, config.model_input_type)?;
        tracing::info!("Successfully initialized prediction service");

        Self::new(
            TextNormalizer::with_stopwords(stopwords),
            Box::new(tokenizer),
            Box::new(model),
            config,
        )
    }

    /// Normalized, tokenized and padded form of `review`, exactly `sequence_length` long.
    pub fn encode(&self, review: &str) -> Vec<i64> {
        let normalized = self.normalizer.normalize(review);
        let sequence = self.tokenizer.text_to_sequence(&normalized);
        pad_sequence(sequence, self.sequence_length, PAD_INDEX)
    }

    pub fn classify(&self, review: Option<&str>) -> Result<Prediction> {
        let review = match review {
            Some(review) if !review.is_empty() => review,
            _ => return Err(InferenceError::InvalidInput(NO_REVIEW_MESSAGE.to_string())),
        };

        let sequence = self.encode(review);
        let probability = check_probability(self.model.predict(&sequence)?)?;
        let prediction = Prediction::from_probability(probability);

        tracing::debug!(
            "Sentiment for '{}': {:?} (p: {:.4}, confidence: {:.2})",
            review.chars().take(50).collect::<String>(),
            prediction.sentiment,
            probability,
            prediction.confidence
        );

        Ok(prediction)
    }

    /// Serialized response previously stored under `key`, if still live.
    pub fn cached_response(&self, key: &[u8]) -> Option<Arc<[u8]>> {
        self.cache.get(key)
    }

    /// Serialized prediction for `review`, served from the cache when `key` is live.
    /// Only successful predictions are stored.
    pub fn respond(&self, key: Vec<u8>, review: Option<&str>) -> Result<Arc<[u8]>> {
        if let Some(body) = self.cache.get(&key) {
            tracing::debug!("Response cache hit");
            return Ok(body);
        }

        let prediction = self.classify(review)?;
        let body: Arc<[u8]> = serde_json::to_vec(&prediction)?.into();
        self.cache.insert(key, Arc::clone(&body));

        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Sentiment;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct RecordingModel {
        probability: f64,
        calls: Arc<AtomicUsize>,
        last_sequence: Arc<Mutex<Vec<i64>>>,
    }

    impl SentimentModel for RecordingModel {
        fn predict(&self, sequence: &[i64]) -> Result<f64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_sequence.lock().unwrap() = sequence.to_vec();
            Ok(self.probability)
        }
    }

    fn vocab_tokenizer() -> VocabTokenizer {
        let vocab: HashMap<String, i64> = [
            ("<OOV>", 1),
            ("movie", 2),
            ("absolutely", 3),
            ("great", 4),
            ("wonderful", 5),
        ]
        .into_iter()
        .map(|(word, index)| (word.to_string(), index))
        .collect();
        VocabTokenizer::from_word_index(vocab, Some("<OOV>")).unwrap()
    }

    fn recording_service(
        probability: f64,
    ) -> (PredictionService, Arc<AtomicUsize>, Arc<Mutex<Vec<i64>>>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let last_sequence = Arc::new(Mutex::new(Vec::new()));
        let model = RecordingModel {
            probability,
            calls: Arc::clone(&calls),
            last_sequence: Arc::clone(&last_sequence),
        };
        let service = PredictionService::new(
            TextNormalizer::new(),
            Box::new(vocab_tokenizer()),
            Box::new(model),
            &InferenceConfig::default(),
        )
        .unwrap();

        (service, calls, last_sequence)
    }

    #[test]
    fn test_classify_positive_review() {
        let (service, calls, last_sequence) = recording_service(0.92);

        let prediction = service
            .classify(Some("This movie was absolutely great and wonderful!"))
            .unwrap();

        assert_eq!(prediction.sentiment, Sentiment::Positive);
        assert_eq!(prediction.confidence, 92.0);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let sequence = last_sequence.lock().unwrap().clone();
        assert_eq!(sequence.len(), 100);
        assert_eq!(&sequence[..4], &[2, 3, 4, 5]);
        assert!(sequence[4..].iter().all(|&id| id == PAD_INDEX));
    }

    #[test]
    fn test_classify_negative_review() {
        let (service, _, _) = recording_service(0.1234);

        let prediction = service.classify(Some("Dull, tedious and far too long.")).unwrap();
        assert_eq!(prediction.sentiment, Sentiment::Negative);
        assert_eq!(prediction.confidence, 87.66);
    }

    #[test]
    fn test_classify_rejects_missing_review() {
        let (service, calls, _) = recording_service(0.9);

        for review in [None, Some("")] {
            match service.classify(review) {
                Err(InferenceError::InvalidInput(message)) => {
                    assert_eq!(message, NO_REVIEW_MESSAGE)
                }
                other => panic!("expected InvalidInput, got {:?}", other),
            }
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_review_that_normalizes_to_nothing_is_still_classified() {
        let (service, calls, last_sequence) = recording_service(0.5);

        let prediction = service.classify(Some("and the of 123")).unwrap();
        assert_eq!(prediction.sentiment, Sentiment::Positive);
        assert_eq!(prediction.confidence, 50.0);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(*last_sequence.lock().unwrap(), vec![PAD_INDEX; 100]);
    }

    #[test]
    fn test_encode_length_is_fixed() {
        let (service, _, _) = recording_service(0.5);

        assert_eq!(service.encode("great").len(), 100);

        let long_review = vec!["wonderful"; 500].join(" ");
        let sequence = service.encode(&long_review);
        assert_eq!(sequence.len(), 100);
        assert!(sequence.iter().all(|&id| id == 5));
    }

    #[test]
    fn test_respond_uses_cache() {
        let (service, calls, _) = recording_service(0.92);
        let payload = br#"{"review":"great movie"}"#;
        let key = ResponseCache::request_key("/predict", payload);

        let first = service.respond(key.clone(), Some("great movie")).unwrap();
        let second = service.respond(key.clone(), Some("great movie")).unwrap();

        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(service.cached_response(&key), Some(first.clone()));

        let body: serde_json::Value = serde_json::from_slice(&first).unwrap();
        assert_eq!(body["sentiment"], "Positive");
        assert_eq!(body["confidence"], 92.0);
    }

    #[test]
    fn test_respond_does_not_cache_failures() {
        let (service, _, _) = recording_service(0.92);
        let key = ResponseCache::request_key("/predict", b"{}");

        assert!(service.respond(key.clone(), None).is_err());
        assert!(service.cached_response(&key).is_none());
    }

    #[test]
    fn test_out_of_range_model_output_is_an_error() {
        let (service, _, _) = recording_service(1.5);
        let result = service.classify(Some("great movie"));
        assert!(matches!(result, Err(InferenceError::OnnxInference(_))));
    }

    #[test]
    fn test_load_fails_without_artifacts() {
        let config = InferenceConfig {
            model_path: "missing/model.onnx".into(),
            tokenizer_path: "missing/tokenizer.json".into(),
            ..InferenceConfig::default()
        };

        assert!(PredictionService::load(&config).is_err());
    }

    #[test]
    fn test_load_reports_missing_stopword_file_as_preprocessing_error() {
        let config = InferenceConfig {
            stopwords_path: Some("missing/stopwords.txt".into()),
            ..InferenceConfig::default()
        };

        let result = PredictionService::load(&config);
        assert!(matches!(
            result,
            Err(InferenceError::Preprocessing(preprocessing::PreprocessingError::Io(_)))
        ));
    }
}
