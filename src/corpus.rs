//! Review corpus input.

use crate::core::types::RawReview;
use crate::error::{Result, SentimentError};
use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::{Path, PathBuf};
use tracing::info;

/// Where the training reviews come from.
pub trait CorpusSource {
    fn load(&self) -> Result<Vec<RawReview>>;
}

impl CorpusSource for Vec<RawReview> {
    fn load(&self) -> Result<Vec<RawReview>> {
        Ok(self.clone())
    }
}

/// CSV file with at least a `review` and a `rating` column, other columns are ignored.
#[derive(Debug, Clone)]
pub struct CsvCorpus {
    path: PathBuf,
}

impl CsvCorpus {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CorpusSource for CsvCorpus {
    fn load(&self) -> Result<Vec<RawReview>> {
        let file = File::open(&self.path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => SentimentError::CorpusNotFound(self.path.clone()),
            _ => SentimentError::Io(e),
        })?;
        let mut csv_reader = csv::Reader::from_reader(BufReader::new(file));

        let mut reviews = Vec::new();
        for (row, result) in csv_reader.deserialize().enumerate() {
            let review: RawReview = result.map_err(|e| {
                SentimentError::InvalidCorpus(format!(
                    "'{}' row {}: {}",
                    self.path.display(),
                    row + 1,
                    e
                ))
            })?;
            reviews.push(review);
        }

        info!("Loaded {} reviews from {:?}", reviews.len(), self.path);
        Ok(reviews)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn reads_review_and_rating_columns() {
        // Given
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "userName,review,rating,date").unwrap();
        writeln!(file, "budi,\"Sangat membantu, mantap\",5,2023-01-01").unwrap();
        writeln!(file, "sari,Aplikasi ini buruk sekali,1,2023-01-02").unwrap();
        writeln!(file, "anon,,3,2023-01-03").unwrap();

        // When
        let reviews = CsvCorpus::new(file.path()).load().unwrap();

        // Then
        assert_eq!(
            reviews,
            vec![
                RawReview::new("Sangat membantu, mantap", 5),
                RawReview::new("Aplikasi ini buruk sekali", 1),
                RawReview::new("", 3),
            ]
        );
    }

    #[test]
    fn missing_file_is_corpus_not_found() {
        let corpus = CsvCorpus::new("/no/such/reviews.csv");
        assert!(matches!(
            corpus.load(),
            Err(SentimentError::CorpusNotFound(path)) if path == PathBuf::from("/no/such/reviews.csv")
        ));
    }

    #[test]
    fn non_numeric_rating_is_invalid_corpus() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "review,rating").unwrap();
        writeln!(file, "bagus,lima").unwrap();
        assert!(matches!(
            CsvCorpus::new(file.path()).load(),
            Err(SentimentError::InvalidCorpus(_))
        ));
    }
}
