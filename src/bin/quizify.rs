use anyhow::Context;
use clap::Parser;
use quizify::clients::{GeminiClient, GeminiConfig, GeminiModel};
use quizify::config::Validation;
use quizify::core::QuizGenerator;
use quizify::error::GENERIC_FAILURE_MESSAGE;
use quizify::interceptors::FileInterceptor;
use quizify::quiz::QuizType;
use std::io::Read;
use std::path::PathBuf;
use std::process::exit;
use std::sync::Arc;
use std::time::Duration;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Turn a text document into a quiz", long_about = None)]
#[command(after_help = "ENVIRONMENT VARIABLES:
    GEMINI_API_KEY     API key for the Gemini API (required)
    GEMINI_MODEL       Model id override [default: gemini-1.5-flash]
    GEMINI_BASE_URL    API base URL override
    RUST_LOG           Log filter [default: quizify=info]

EXAMPLES:
    quizify notes.txt                     # Five multiple-choice questions
    quizify notes.txt --type descriptive  # Five free-response questions
    cat notes.txt | quizify -             # Read content from stdin
    quizify notes.txt --transcripts logs  # Keep prompt/response transcripts")]
struct Args {
    /// Text file to build the quiz from, or '-' for stdin
    input: PathBuf,

    /// Quiz type: mcq or descriptive
    #[arg(short = 't', long = "type", default_value = "mcq", value_parser = parse_quiz_type)]
    quiz_type: QuizType,

    /// Model id, overrides GEMINI_MODEL
    #[arg(short, long)]
    model: Option<String>,

    /// Reject multiple-choice questions without 4 options or with an answer outside them
    #[arg(long)]
    strict: bool,

    /// Directory where prompt/response transcripts are written
    #[arg(long)]
    transcripts: Option<PathBuf>,

    /// Give up after this many seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Print a readable listing instead of JSON
    #[arg(long)]
    plain: bool,
}

fn parse_quiz_type(s: &str) -> Result<QuizType, String> {
    s.parse()
}

fn read_input(path: &PathBuf) -> anyhow::Result<String> {
    if path.as_os_str() == "-" {
        let mut content = String::new();
        std::io::stdin().read_to_string(&mut content).context("reading stdin")?;
        return Ok(content);
    }
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("quizify=info"));
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    init_tracing();
    let args = Args::parse();

    let content = read_input(&args.input)?;

    let mut config = GeminiConfig::from_env();
    if let Some(model) = &args.model {
        config = config.with_model(GeminiModel::from(model.as_str()));
    }

    let validation = if args.strict { Validation::Strict } else { Validation::Lenient };
    let mut generator = QuizGenerator::new(GeminiClient::new(config)).with_validation(validation);
    if let Some(dir) = args.transcripts {
        generator = generator.with_interceptor(Arc::new(FileInterceptor::new(dir)));
    }

    let generation = generator.generate_from(&content, args.quiz_type);
    let result = match args.timeout_secs {
        Some(secs) => match tokio::time::timeout(Duration::from_secs(secs), generation).await {
            Ok(result) => result,
            Err(_) => {
                error!(target: "quizify::cli", reason = "timeout", timeout_secs = secs, "Quiz generation timed out");
                eprintln!("{}", GENERIC_FAILURE_MESSAGE);
                exit(1);
            }
        },
        None => generation.await,
    };

    match result {
        Ok(quiz) => {
            if args.plain {
                println!("{}", quiz);
            } else {
                println!("{}", serde_json::to_string_pretty(&quiz)?);
            }
            Ok(())
        }
        Err(e) => {
            error!(target: "quizify::cli", reason = e.reason(), error = %e, "Generation failed");
            eprintln!("{}", e.user_message());
            exit(1);
        }
    }
}
