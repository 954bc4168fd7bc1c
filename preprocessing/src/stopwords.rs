use crate::{PreprocessingError, Result};
use std::collections::HashSet;
use std::path::Path;

const ENGLISH_STOPWORDS: &str = include_str!("../data/stopwords_english.txt");

/// Fixed set of words dropped from normalized text.
#[derive(Debug, Clone, Default)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    /// The bundled NLTK English list.
    pub fn english() -> Self {
        Self::parse(ENGLISH_STOPWORDS)
    }

    /// Load a newline-delimited list. Blank lines and `#` comments are skipped.
    pub fn from_file(path: &Path) -> Result<Self> {
        tracing::info!("Loading stopword list from: {:?}", path);

        let content = std::fs::read_to_string(path)?;
        let stopwords = Self::parse(&content);
        if stopwords.is_empty() {
            return Err(PreprocessingError::StopWords(format!(
                "No stopwords found in {:?}",
                path
            )));
        }

        tracing::info!("Loaded {} stopwords", stopwords.len());
        Ok(stopwords)
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    fn parse(content: &str) -> Self {
        Self::from_words(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#'))
                .map(str::to_lowercase),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_english_list() {
        let stopwords = StopWords::english();

        assert_eq!(stopwords.len(), 179);
        assert!(stopwords.contains("the"));
        assert!(stopwords.contains("and"));
        assert!(stopwords.contains("wouldn't"));
        assert!(!stopwords.contains("movie"));
        assert!(!stopwords.contains("#"));
    }

    #[test]
    fn test_from_file_skips_comments_and_blanks() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# custom list").unwrap();
        writeln!(file, "Movie").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "  film  ").unwrap();

        let stopwords = StopWords::from_file(file.path()).unwrap();
        assert_eq!(stopwords.len(), 2);
        assert!(stopwords.contains("movie"));
        assert!(stopwords.contains("film"));
    }

    #[test]
    fn test_from_file_rejects_empty_list() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# nothing here").unwrap();

        let result = StopWords::from_file(file.path());
        assert!(matches!(result, Err(PreprocessingError::StopWords(_))));
    }

    #[test]
    fn test_from_file_missing() {
        let result = StopWords::from_file(Path::new("does/not/exist.txt"));
        assert!(matches!(result, Err(PreprocessingError::Io(_))));
    }
}
