pub mod classifier;
pub mod engine;
pub mod normalizer;
pub mod stemmer;
pub mod stopwords;
pub mod traits;
pub mod types;
pub mod vectorizer;
