use thiserror::Error;

#[derive(Error, Debug)]
pub enum PreprocessingError {
    #[error("Stopword list error: {0}")]
    StopWords(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for preprocessing operations
pub type Result<T> = std::result::Result<T, PreprocessingError>;
