// Review text preprocessing library

pub mod error;
pub mod normalizer;
pub mod stopwords;

pub use error::{PreprocessingError, Result};
pub use normalizer::{normalize, TextNormalizer};
pub use stopwords::StopWords;
