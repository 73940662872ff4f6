use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::info;
use newscheck::config::{
    DEFAULT_BIND_ADDR, DEFAULT_HISTORY_LIMIT, DEFAULT_HISTORY_PATH, DEFAULT_MODEL_PATH, DEFAULT_VECTORIZER_PATH,
};
use newscheck::web::{self, verdict_message, AppState, EMPTY_INPUT_WARNING, NO_HISTORY};
use newscheck::{AppConfig, ClassificationService, HistoryStore, HistoryView, NewsClassifier, Preprocessing};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Classifier artifact (JSON)
    #[arg(long, env = "NEWSCHECK_MODEL", default_value = DEFAULT_MODEL_PATH)]
    model: PathBuf,

    /// Vectorizer artifact (JSON)
    #[arg(long, env = "NEWSCHECK_VECTORIZER", default_value = DEFAULT_VECTORIZER_PATH)]
    vectorizer: PathBuf,

    /// Expected SHA-256 of the classifier artifact
    #[arg(long, env = "NEWSCHECK_MODEL_SHA256")]
    model_sha256: Option<String>,

    /// Expected SHA-256 of the vectorizer artifact
    #[arg(long, env = "NEWSCHECK_VECTORIZER_SHA256")]
    vectorizer_sha256: Option<String>,

    /// History file (JSON array, created on first classification)
    #[arg(long, env = "NEWSCHECK_HISTORY", default_value = DEFAULT_HISTORY_PATH)]
    history: PathBuf,

    /// Text normalization applied before vectorizing
    #[arg(long, value_enum, env = "NEWSCHECK_PREPROCESSING", default_value_t = Preprocessing::Lowercase)]
    preprocessing: Preprocessing,

    /// Number of recent classifications to display
    #[arg(long, env = "NEWSCHECK_HISTORY_LIMIT", default_value_t = DEFAULT_HISTORY_LIMIT)]
    history_limit: usize,

    /// Show the raw prediction and model classes
    #[arg(long, env = "NEWSCHECK_DIAGNOSTICS")]
    diagnostics: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the web form
    Serve {
        /// Address to listen on
        #[arg(long, env = "NEWSCHECK_BIND", default_value = DEFAULT_BIND_ADDR)]
        bind: SocketAddr,
    },
    /// Classify one text and record it in the history
    Classify {
        /// News text to classify
        text: String,
    },
    /// Print the most recent classifications
    History,
}

impl Args {
    fn config(&self) -> AppConfig {
        let mut config = AppConfig {
            model_path: self.model.clone(),
            vectorizer_path: self.vectorizer.clone(),
            model_sha256: self.model_sha256.clone(),
            vectorizer_sha256: self.vectorizer_sha256.clone(),
            history_path: self.history.clone(),
            history_limit: self.history_limit,
            preprocessing: self.preprocessing,
            diagnostics: self.diagnostics,
            ..AppConfig::default()
        };
        if let Command::Serve { bind } = &self.command {
            config.bind_addr = *bind;
        }
        config
    }
}

fn load_classifier(config: &AppConfig) -> anyhow::Result<NewsClassifier> {
    let start_time = Instant::now();
    info!("Loading artifacts...");

    let classifier = NewsClassifier::builder()
        .with_preprocessing(config.preprocessing)
        .with_model_file(&config.model_path, config.model_sha256.as_deref())?
        .with_vectorizer_file(&config.vectorizer_path, config.vectorizer_sha256.as_deref())?
        .build()?;

    let info = classifier.info();
    info!(
        "=== Artifacts loaded (took {:.2?}): classes {:?}, {} features, preprocessing {} ===",
        start_time.elapsed(),
        info.classes,
        info.n_features,
        info.preprocessing
    );
    Ok(classifier)
}

fn open_service(config: &AppConfig, store: HistoryStore) -> anyhow::Result<ClassificationService> {
    let classifier = load_classifier(config).context("Failed to load classifier artifacts")?;
    ClassificationService::open(Arc::new(classifier), store)
        .with_context(|| format!("Failed to load history from {}", config.history_path.display()))
}

fn print_history(view: &HistoryView) {
    match view {
        HistoryView::Empty => println!("{}", NO_HISTORY),
        HistoryView::Entries(entries) => {
            for entry in entries {
                println!("🕒 {}", entry.timestamp);
                println!("📝 {}", entry.excerpt);
                println!("🔎 Result: {}", entry.result);
                println!("---");
            }
        }
    }
}

async fn classify_once(service: &ClassificationService, text: &str, diagnostics: bool) -> anyhow::Result<()> {
    match service.classify(text).await {
        Ok(classification) => {
            let prediction = &classification.prediction;
            if diagnostics {
                println!("🧪 Raw prediction: {}", prediction.raw_class);
                println!("🧠 Model classes: {:?}", prediction.classes);
            }
            println!(
                "📊 Probabilities → FAKE: {:.4}, REAL: {:.4}",
                prediction.probabilities.fake, prediction.probabilities.real
            );
            println!("{}", verdict_message(prediction.verdict));
            Ok(())
        }
        Err(e) if e.is_validation() => {
            eprintln!("⚠️ {}", EMPTY_INPUT_WARNING);
            Err(e.into())
        }
        Err(e) => Err(e.into()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    newscheck::init_logger();
    let args = Args::parse();
    let config = args.config();
    config.validate()?;

    info!("=== Starting Fake News Detection ===");

    let store = HistoryStore::new(&config.history_path);
    match args.command {
        Command::History => {
            let log = store
                .load()
                .with_context(|| format!("Failed to load history from {}", config.history_path.display()))?;
            print_history(&newscheck::history::recent(&log, config.history_limit));
        }
        Command::Serve { .. } => {
            let service = open_service(&config, store)?;
            let state = AppState {
                service: Arc::new(service),
                history_limit: config.history_limit,
                diagnostics: config.diagnostics,
            };
            web::serve(state, config.bind_addr).await?;
        }
        Command::Classify { text } => {
            let service = open_service(&config, store)?;
            classify_once(&service, &text, config.diagnostics).await?;
        }
    }

    info!("=== Done ===");
    Ok(())
}
