use clap::{Parser, Subcommand};
use konnekt_assessment_cli::application::{progress_report, record_take, resolve_report, write_schemas};
use konnekt_assessment_cli::infrastructure::{load_answers, load_config, load_questions, FileCaptureDevice};
use konnekt_assessment_cli::{LogConfig, Result};
use konnekt_assessment_core::ItemId;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "konnekt-assess")]
#[command(
    version,
    about = "Konnekt Assessment CLI - question dispatch, progress and schema tooling"
)]
struct Cli {
    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Emit log lines as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    /// Resolver configuration file (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show presentation order and the renderer chosen for each question
    Resolve {
        /// Question file (JSON list or { "questions": [...] })
        #[arg(short = 'f', long)]
        questions: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Report the navigation state a host would receive for saved answers
    Progress {
        #[arg(short = 'f', long)]
        questions: PathBuf,

        /// Saved answer map (JSON object keyed by question id)
        #[arg(short, long)]
        answers: Option<PathBuf>,

        /// Host-controlled question index
        #[arg(short, long)]
        index: Option<usize>,
    },

    /// Store a pre-recorded audio file as the answer to a spoken question
    Record {
        #[arg(short = 'f', long)]
        questions: PathBuf,

        /// Spoken question to answer
        #[arg(long)]
        question_id: String,

        /// Audio file standing in for the microphone
        #[arg(long)]
        audio: PathBuf,

        /// Mime type, guessed from the extension when omitted
        #[arg(long)]
        mime_type: Option<String>,

        /// Length of the take in milliseconds
        #[arg(long, default_value_t = 5_000)]
        duration_ms: u64,
    },

    /// Write JSON schemas for questions, activities, answers and navigation state
    Schema {
        /// Output directory
        #[arg(short, long, default_value = "schemas")]
        out: PathBuf,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut log_config = if cli.verbose {
        LogConfig::dev()
    } else if cli.quiet {
        LogConfig::quiet()
    } else {
        LogConfig::default()
    };
    if cli.json_logs {
        log_config = log_config.with_json();
    }
    if let Err(e) = log_config.init() {
        eprintln!("{}", e);
    }

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Resolve { questions, json } => {
            let questions = load_questions(&questions)?;
            let report = resolve_report(&questions, config);

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                for row in &report {
                    println!("{}", row);
                }
                let unsupported = report.iter().filter(|r| r.renderer.is_none()).count();
                info!("{} questions, {} unsupported", report.len(), unsupported);
            }
        }
        Commands::Progress {
            questions,
            answers,
            index,
        } => {
            let questions = load_questions(&questions)?;
            let answers = match answers {
                Some(path) => load_answers(&path)?,
                None => Default::default(),
            };

            let report = progress_report(questions, answers, index, config);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Record {
            questions,
            question_id,
            audio,
            mime_type,
            duration_ms,
        } => {
            let questions = load_questions(&questions)?;
            let mut device = FileCaptureDevice::new(audio);
            if let Some(mime_type) = mime_type {
                device = device.with_mime_type(mime_type);
            }

            let answers = record_take(
                questions,
                &ItemId::from(question_id),
                &device,
                duration_ms,
                config,
            )
            .await?;
            println!("{}", serde_json::to_string_pretty(&answers)?);
        }
        Commands::Schema { out } => {
            for path in write_schemas(&out)? {
                println!("{}", path.display());
            }
        }
    }

    Ok(())
}
