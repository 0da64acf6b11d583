use clap::Parser;
use crossterm::style::Stylize;
use sentiment_core::config::Config;
use sentiment_core::corpus::CsvCorpus;
use sentiment_core::persistence::FileArtifactStore;
use sentiment_core::{Label, SentimentError, SentimentPipeline};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Sentiment of Indonesian app reviews")]
struct Args {
    /// JSON config file; defaults are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Classify this review and exit
    #[arg(long)]
    text: Option<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let pipeline = match start(&args) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            eprintln!("{} {}", "[FATAL]".red().bold(), e);
            process::exit(1);
        }
    };

    let result = match &args.text {
        Some(text) => {
            classify(&pipeline, text);
            Ok(())
        }
        None => run_interactive(&pipeline),
    };
    if let Err(e) = result {
        eprintln!("{} {}", "[ERROR]".red(), e);
        process::exit(1);
    }
}

fn start(args: &Args) -> sentiment_core::Result<SentimentPipeline> {
    let config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    let mut pipeline = SentimentPipeline::from_config(&config)?;
    let store = FileArtifactStore::from_config(&config);
    let corpus = CsvCorpus::new(&config.corpus_path);
    pipeline.initialize(&store, &corpus)?;

    if let Some(report) = pipeline.training_report() {
        match report.accuracy {
            Some(accuracy) => println!(
                "Trained on {} reviews ({} after oversampling), held-out accuracy {:.2}%",
                report.train_size,
                report.resampled_size,
                accuracy * 100.0
            ),
            None => println!("Trained on {} reviews", report.train_size),
        }
    }
    Ok(pipeline)
}

fn run_interactive(pipeline: &SentimentPipeline) -> io::Result<()> {
    println!("Indonesian review sentiment. Type a review, or 'exit' to quit.");
    println!("---------------------------------------------------------------");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("\n> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim();
        if input == "exit" {
            break;
        }
        classify(pipeline, input);
    }
    Ok(())
}

fn classify(pipeline: &SentimentPipeline, text: &str) {
    match pipeline.predict(text) {
        Ok(prediction) => {
            let label = match prediction.label {
                Label::Positive => prediction.label.as_str().green().bold(),
                Label::Negative => prediction.label.as_str().red().bold(),
            };
            println!("Review:     {}", text);
            println!("Normalized: {}", prediction.normalized_text);
            println!("Sentiment:  {} ({:.1}%)", label, prediction.confidence * 100.0);
        }
        Err(SentimentError::EmptyInput) => {
            println!("{}", "Please enter a review first.".yellow());
        }
        Err(_) => {
            println!("{}", "Could not classify this review.".red());
        }
    }
}
