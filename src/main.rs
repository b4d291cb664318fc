//! edward: CLI entry point.
//!
//! Exactly one mode per invocation: a trainer (--training), a transport bot
//! (--bot), or a statement-store export (--export).

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::prelude::*;

use edward::bot;
use edward::config::{
    EngineSettings, GitterCredentials, HipChatCredentials, RedditCredentials, TwitterCredentials,
};
use edward::engine::{EngineClient, ResponseEngine};
use edward::gitter::GitterClient;
use edward::hipchat::HipChatClient;
use edward::reddit::RedditClient;
use edward::training;
use edward::twitter::TwitterClient;

#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
pub enum TrainingMode {
    English,
    WordList,
    Ubuntu,
    Reddit,
    Twitter,
}

#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
pub enum BotMode {
    Gitter,
    Hipchat,
    Voice,
    Feedback,
    Sploit,
}

#[derive(Parser, Debug)]
#[command(name = "edward", version, about = "Chat-bot orchestrator for an external response engine")]
pub struct Args {
    /// Logging verbosity (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    level: String,

    /// Run one training routine
    #[arg(long, value_enum, conflicts_with_all = ["bot", "export"])]
    training: Option<TrainingMode>,

    /// Run one transport bot
    #[arg(long, value_enum, conflicts_with = "export")]
    bot: Option<BotMode>,

    /// Dump the engine's statement store to a file
    #[arg(long, num_args = 0..=1, default_missing_value = "statements.json")]
    export: Option<PathBuf>,

    /// Subreddit for reddit training and the sploit bot
    #[arg(long, default_value = "all")]
    subreddit: String,

    /// Submissions to fetch for reddit training
    #[arg(long, default_value_t = 99)]
    limit: u32,

    /// Word list file for word_list training
    #[arg(long, default_value = "data/word_list.txt")]
    words: PathBuf,

    /// English corpus directory
    #[arg(long, default_value = "corpus/english")]
    corpus_dir: PathBuf,

    /// Extracted Ubuntu Dialogue Corpus directory
    #[arg(long, default_value = "data/ubuntu_dialogs")]
    ubuntu_dir: PathBuf,

    /// Whisper model file for the voice bot
    #[arg(long, default_value = "data/ggml-base.en.bin")]
    whisper_model: PathBuf,

    /// TTS server for the voice bot
    #[arg(long, default_value = "http://localhost:8880")]
    tts_endpoint: String,

    /// Also write logs to a rolling file in this directory
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

fn init_logging(args: &Args) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = |level: &str| {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("edward={level}")))
    };

    let registry = tracing_subscriber::registry().with(
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stdout)
            .with_filter(filter(&args.level)),
    );

    if let Some(ref log_dir) = args.log_dir {
        std::fs::create_dir_all(log_dir).ok();
        let appender = tracing_appender::rolling::daily(log_dir, "edward.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(non_blocking)
                    .with_ansi(false)
                    .with_filter(filter(&args.level)),
            )
            .init();
        Some(guard)
    } else {
        registry.init();
        None
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let _log_guard = init_logging(&args);

    if let Err(e) = run(args).await {
        error!("{e}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), String> {
    let engine = EngineClient::new(EngineSettings::from_env().base_url);

    if let Some(path) = args.export {
        return export(&engine, &path).await;
    }

    match args.training {
        Some(TrainingMode::English) => {
            info!("Teaching bot basic english");
            training::corpus::run(&engine, &args.corpus_dir).await?;
        }
        Some(TrainingMode::WordList) => {
            let words = training::word_list::load_words(&args.words)?;
            training::word_list::run(Arc::new(engine), words).await?;
            return Ok(());
        }
        Some(TrainingMode::Ubuntu) => {
            training::ubuntu::run(&engine, &args.ubuntu_dir).await?;
        }
        Some(TrainingMode::Reddit) => {
            let creds = RedditCredentials::from_env().map_err(|e| e.to_string())?;
            let reddit = RedditClient::login(&creds).await?;
            training::reddit::run(&engine, &reddit, &args.subreddit, args.limit).await?;
        }
        Some(TrainingMode::Twitter) => {
            let creds = TwitterCredentials::from_env().map_err(|e| e.to_string())?;
            let twitter = TwitterClient::login(&creds).await?;
            training::twitter::run(&engine, &twitter).await?;
        }
        None => {}
    }
    if args.training.is_some() {
        return Ok(());
    }

    match args.bot {
        Some(BotMode::Gitter) => {
            let creds = GitterCredentials::from_env().map_err(|e| e.to_string())?;
            let gitter = GitterClient::join(&creds.room, &creds.api_token).await?;
            bot::gitter::run(&engine, &gitter).await
        }
        Some(BotMode::Hipchat) => {
            let creds = HipChatCredentials::from_env().map_err(|e| e.to_string())?;
            let hipchat = HipChatClient::new(&creds);
            bot::hipchat::run(&engine, &hipchat).await
        }
        Some(BotMode::Voice) => {
            bot::voice::run(&engine, &args.whisper_model, &args.tts_endpoint).await
        }
        Some(BotMode::Feedback) => bot::feedback::run(&engine).await,
        Some(BotMode::Sploit) => {
            let creds = RedditCredentials::from_env().map_err(|e| e.to_string())?;
            let reddit = RedditClient::login(&creds).await?;
            bot::sploit::run(&engine, &reddit, &args.subreddit).await
        }
        None => {
            println!("Nothing to do. See 'edward --help' for training and bot modes.");
            Ok(())
        }
    }
}

#[derive(serde::Serialize)]
struct ExportFile {
    exported_at: String,
    statements: Vec<edward::engine::Statement>,
}

/// Dump the engine's statement store to a JSON file.
async fn export<E: ResponseEngine>(engine: &E, path: &PathBuf) -> Result<(), String> {
    let statements = engine.statements().await.map_err(|e| e.to_string())?;
    let count = statements.len();
    let dump = ExportFile {
        exported_at: chrono::Utc::now().to_rfc3339(),
        statements,
    };
    let json = serde_json::to_string_pretty(&dump)
        .map_err(|e| format!("Failed to serialize statements: {e}"))?;
    std::fs::write(path, json).map_err(|e| format!("Failed to write {:?}: {e}", path))?;
    info!("Exported {} statements to {:?}", count, path);
    Ok(())
}
