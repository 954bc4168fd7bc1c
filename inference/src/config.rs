use crate::{InferenceError, Result};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Element type of the classifier's input tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelInputType {
    #[default]
    Float32,
    Int32,
    Int64,
}

impl FromStr for ModelInputType {
    type Err = InferenceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "float32" | "f32" | "float" => Ok(Self::Float32),
            "int32" | "i32" => Ok(Self::Int32),
            "int64" | "i64" => Ok(Self::Int64),
            other => Err(InferenceError::Config(format!(
                "Unknown model input type '{}' (expected float32, int32 or int64)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct InferenceConfig {
    pub model_path: PathBuf,
    pub tokenizer_path: PathBuf,
    pub stopwords_path: Option<PathBuf>,
    pub model_input_type: ModelInputType,
    pub sequence_length: usize,
    pub cache_ttl_seconds: u64,
    /// Upper bound on the bytes of request keys and response bodies held in the cache.
    pub cache_max_bytes: u64,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("model.onnx"),
            tokenizer_path: PathBuf::from("tokenizer.json"),
            stopwords_path: None,
            model_input_type: ModelInputType::Float32,
            sequence_length: 100,
            cache_ttl_seconds: 300,
            cache_max_bytes: 16 * 1024 * 1024,
        }
    }
}

impl InferenceConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env_or_default() -> Self {
        let mut config = Self::default();

        if let Ok(path) = std::env::var("MODEL_PATH") {
            config.model_path = PathBuf::from(path);
        }

        if let Ok(path) = std::env::var("TOKENIZER_PATH") {
            config.tokenizer_path = PathBuf::from(path);
        }

        if let Ok(path) = std::env::var("STOPWORDS_PATH") {
            config.stopwords_path = Some(PathBuf::from(path));
        }

        if let Ok(raw) = std::env::var("MODEL_INPUT_TYPE") {
            match raw.parse() {
                Ok(input_type) => config.model_input_type = input_type,
                Err(e) => tracing::warn!("Ignoring MODEL_INPUT_TYPE: {}", e),
            }
        }

        config.sequence_length = env_or("SEQUENCE_LENGTH", config.sequence_length);
        config.cache_ttl_seconds = env_or("CACHE_TTL_SECONDS", config.cache_ttl_seconds);
        config.cache_max_bytes = env_or("CACHE_MAX_BYTES", config.cache_max_bytes);

        config
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }

    pub fn validate(&self) -> Result<()> {
        if self.model_path.as_os_str().is_empty() {
            return Err(InferenceError::Config("Model path cannot be empty".to_string()));
        }

        if self.tokenizer_path.as_os_str().is_empty() {
            return Err(InferenceError::Config("Tokenizer path cannot be empty".to_string()));
        }

        if self.sequence_length == 0 {
            return Err(InferenceError::Config(
                "Sequence length must be greater than zero".to_string(),
            ));
        }

        if self.cache_ttl_seconds == 0 {
            return Err(InferenceError::Config(
                "Cache TTL must be greater than zero".to_string(),
            ));
        }

        if self.cache_max_bytes == 0 {
            return Err(InferenceError::Config(
                "Cache size must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

fn env_or<T: FromStr + Copy + std::fmt::Display>(key: &str, fallback: T) -> T {
    match std::env::var(key) {
        Ok(raw) => match raw.parse::<T>() {
            Ok(parsed) => parsed,
            Err(_) => {
                tracing::warn!("Invalid {}='{}', falling back to {}", key, raw, fallback);
                fallback
            }
        },
        Err(_) => fallback,
    }
}
