use thiserror::Error;

#[derive(Error, Debug)]
pub enum InferenceError {
    #[error("Model loading failed: {0}")]
    ModelLoad(String),

    #[error("Tokenizer loading failed: {0}")]
    TokenizerLoad(String),

    #[error("ONNX inference failed: {0}")]
    OnnxInference(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Input validation failed: {0}")]
    InvalidInput(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Preprocessing error: {0}")]
    Preprocessing(#[from] preprocessing::PreprocessingError),
}

pub type Result<T> = std::result::Result<T, InferenceError>;
