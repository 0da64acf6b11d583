use sentiment_core::config::Config;
use sentiment_core::corpus::{CorpusSource, CsvCorpus};
use sentiment_core::persistence::{ArtifactStore, FileArtifactStore};
use sentiment_core::{Label, PipelineState, RawReview, SentimentError, SentimentPipeline};
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

const POSITIVE: [&str; 8] = [
    "Sangat membantu, dokter ramah",
    "Pelayanan cepat dan dokter ramah",
    "Aplikasi bagus, sangat membantu",
    "Mantap, konsultasi cepat dan membantu",
    "Dokter ramah, obat cepat sampai",
    "Bagus sekali, pelayanan cepat",
    "Membantu banget, aplikasi bagus",
    "Pelayanan ramah, mantap",
];

const NEGATIVE: [&str; 5] = [
    "Aplikasi buruk, pelayanan lambat",
    "Obat mahal dan lambat sekali",
    "Aplikasi error terus, buruk",
    "Kecewa, aplikasi jelek dan lambat",
    "Buruk, mahal, error",
];

struct Workspace {
    dir: TempDir,
    config: Config,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempdir().unwrap();
        let config = Config {
            corpus_path: dir.path().join("reviews.csv"),
            artifact_dir: dir.path().join("artifacts"),
            resources_dir: Path::new(env!("CARGO_MANIFEST_DIR")).join("resources"),
            ..Config::default()
        };
        write_corpus(&config.corpus_path);
        Self { dir, config }
    }

    fn store(&self) -> FileArtifactStore {
        FileArtifactStore::from_config(&self.config)
    }

    fn corpus(&self) -> CsvCorpus {
        CsvCorpus::new(&self.config.corpus_path)
    }

    fn start(&self) -> SentimentPipeline {
        let mut pipeline = SentimentPipeline::from_config(&self.config).unwrap();
        pipeline.initialize(&self.store(), &self.corpus()).unwrap();
        pipeline
    }
}

fn write_corpus(path: &Path) {
    let mut writer = csv::Writer::from_path(path).unwrap();
    writer.write_record(["userName", "review", "rating"]).unwrap();
    for i in 0..40 {
        let rating = if i % 2 == 0 { "5" } else { "4" };
        writer
            .write_record(["user", POSITIVE[i % POSITIVE.len()], rating])
            .unwrap();
    }
    for i in 0..20 {
        let rating = if i % 2 == 0 { "1" } else { "2" };
        writer
            .write_record(["user", NEGATIVE[i % NEGATIVE.len()], rating])
            .unwrap();
    }
    writer.flush().unwrap();
}

/// Corpus that must never be read.
struct UntouchableCorpus;

impl CorpusSource for UntouchableCorpus {
    fn load(&self) -> sentiment_core::Result<Vec<RawReview>> {
        panic!("corpus read while artifacts exist");
    }
}

const SAMPLE_REVIEWS: [&str; 6] = [
    "Sangat membantu sekali!!! 123",
    "Aplikasi ini buruk sekali",
    "dokter ramah",
    "lambat dan mahal",
    "pelayanan cepat, mantap",
    "error terus",
];

fn labels(pipeline: &SentimentPipeline) -> Vec<Label> {
    SAMPLE_REVIEWS
        .iter()
        .map(|text| pipeline.predict(text).unwrap().label)
        .collect()
}

#[test]
fn first_start_trains_and_persists() {
    // Given
    let workspace = Workspace::new();
    assert!(!workspace.store().exists());

    // When
    let pipeline = workspace.start();

    // Then
    assert_eq!(pipeline.state(), PipelineState::Ready);
    assert!(workspace.store().exists());
    let report = pipeline.training_report().unwrap();
    assert_eq!(report.corpus_size, 60);
    assert_eq!(report.test_size, 12);
    assert_eq!(report.train_size, 48);
    assert!(report.vocabulary_size > 0);
    assert!(report.resampled_size >= report.train_size);
}

#[test]
fn positive_review_with_noise() {
    let workspace = Workspace::new();
    let pipeline = workspace.start();

    let prediction = pipeline.predict("Sangat membantu sekali!!! 123").unwrap();

    assert_eq!(prediction.label, Label::Positive);
    assert_eq!(prediction.normalized_text, "bantu");
    assert!(prediction
        .normalized_text
        .chars()
        .all(|c| c.is_ascii_lowercase() || c == ' '));
}

#[test]
fn negative_review() {
    let workspace = Workspace::new();
    let pipeline = workspace.start();

    let prediction = pipeline.predict("Aplikasi ini buruk sekali").unwrap();

    assert_eq!(prediction.label, Label::Negative);
    assert_eq!(prediction.normalized_text, "aplikasi buruk");
}

#[test]
fn empty_input_is_a_warning_and_keeps_state() {
    let workspace = Workspace::new();
    let pipeline = workspace.start();

    let result = pipeline.predict("   ");

    assert!(matches!(result, Err(SentimentError::EmptyInput)));
    assert!(result.unwrap_err().is_user_correctable());
    assert_eq!(pipeline.state(), PipelineState::Ready);
}

#[test]
fn predict_before_initialize_is_not_ready() {
    let workspace = Workspace::new();
    let pipeline = SentimentPipeline::from_config(&workspace.config).unwrap();
    assert!(matches!(
        pipeline.predict("bagus"),
        Err(SentimentError::NotReady(PipelineState::Uninitialized))
    ));
}

#[test]
fn second_process_loads_without_reading_the_corpus() {
    // Given
    let workspace = Workspace::new();
    let trained = workspace.start();
    fs::remove_file(&workspace.config.corpus_path).unwrap();

    // When
    let mut loaded = SentimentPipeline::from_config(&workspace.config).unwrap();
    loaded
        .initialize(&workspace.store(), &UntouchableCorpus)
        .unwrap();

    // Then
    assert_eq!(loaded.state(), PipelineState::Ready);
    assert!(loaded.training_report().is_none());
    assert_eq!(labels(&loaded), labels(&trained));
}

#[test]
fn deleting_artifacts_forces_equivalent_retraining() {
    // Given
    let workspace = Workspace::new();
    let first = workspace.start();
    let store = workspace.store();
    fs::remove_file(store.model_path()).unwrap();
    fs::remove_file(store.vectorizer_path()).unwrap();

    // When
    let second = workspace.start();

    // Then
    assert!(second.training_report().is_some());
    assert!(store.exists());
    assert_eq!(labels(&second), labels(&first));
}

#[test]
fn corrupt_artifacts_fail_without_retraining() {
    let workspace = Workspace::new();
    workspace.start();
    fs::write(workspace.store().model_path(), b"garbage").unwrap();

    let mut pipeline = SentimentPipeline::from_config(&workspace.config).unwrap();
    let result = pipeline.initialize(&workspace.store(), &UntouchableCorpus);

    let err = result.unwrap_err();
    assert!(matches!(err, SentimentError::ArtifactLoad { .. }));
    assert!(err.is_fatal());
    assert_eq!(pipeline.state(), PipelineState::Failed);
}

#[test]
fn missing_corpus_is_fatal_and_writes_nothing() {
    let workspace = Workspace::new();
    fs::remove_file(&workspace.config.corpus_path).unwrap();

    let mut pipeline = SentimentPipeline::from_config(&workspace.config).unwrap();
    let result = pipeline.initialize(&workspace.store(), &workspace.corpus());

    assert!(matches!(result, Err(SentimentError::CorpusNotFound(_))));
    assert_eq!(pipeline.state(), PipelineState::Failed);
    assert!(!workspace.store().exists());
    assert!(!workspace.dir.path().join("artifacts").exists());
}

#[test]
fn missing_stop_words_is_resource_unavailable() {
    let workspace = Workspace::new();
    let config = Config {
        resources_dir: workspace.dir.path().join("no-resources"),
        ..workspace.config.clone()
    };
    assert!(matches!(
        SentimentPipeline::from_config(&config),
        Err(SentimentError::ResourceUnavailable { .. })
    ));
}

#[test]
fn invalid_config_is_rejected_before_anything_loads() {
    // Given
    let workspace = Workspace::new();
    let config = Config {
        k_neighbors: 0,
        ..workspace.config.clone()
    };

    // When
    let result = SentimentPipeline::from_config(&config);

    // Then
    assert!(matches!(result, Err(SentimentError::Config(_))));
    assert!(!workspace.store().exists());
}
