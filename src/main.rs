use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use mention_tagger::config::{parse_band, Config};
use mention_tagger::matching::fuzzy::{self, Bands};
use mention_tagger::matching::topic::Topic;

/// mention-tagger: find mentions of a topic in segmented documents.
///
/// Matches every sentence against the topic's surface forms at three
/// strengths (exact, strong fuzzy, weak fuzzy) and keeps the strongest
/// evidence for each mention location.
#[derive(Parser)]
#[command(name = "mention-tagger", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Identify mentions in a directory of segmented text files
    Run {
        /// Surface form of the topic (repeat for aliases)
        #[arg(long = "topic", required_unless_present = "pattern")]
        topics: Vec<String>,

        /// Use a raw regex for exact matching instead of surface forms
        #[arg(long, conflicts_with = "topics")]
        pattern: Option<String>,

        /// Directory with one text file per work, one sentence per line
        #[arg(long)]
        text_path: Option<PathBuf>,

        /// Where to write the JSON run report
        #[arg(long)]
        report_path: Option<PathBuf>,

        /// Strong band as "lower,upper" (default: 87.5,100)
        #[arg(long)]
        strong_band: Option<String>,

        /// Weak band as "lower,upper" (default: 80,87.5)
        #[arg(long)]
        weak_band: Option<String>,

        /// Number of documents to match in parallel (default: 8)
        #[arg(long)]
        concurrency: Option<usize>,

        /// How many mentions to preview in the terminal
        #[arg(long, default_value = "20")]
        show: usize,
    },

    /// Show the partial-ratio score of a sentence against a surface form
    Score {
        /// The sentence to score
        sentence: String,

        /// The surface form to compare against
        surface_form: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("mention_tagger=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            topics,
            pattern,
            text_path,
            report_path,
            strong_band,
            weak_band,
            concurrency,
            show,
        } => {
            let mut config = Config::load()?;
            if let Some(path) = text_path {
                config.text_path = path;
            }
            if let Some(path) = report_path {
                config.report_path = path;
            }
            if let Some(raw) = strong_band {
                config.strong_band = parse_band(&raw)?;
            }
            if let Some(raw) = weak_band {
                config.weak_band = parse_band(&raw)?;
            }
            if let Some(n) = concurrency {
                config.concurrency = n;
            }
            config.require_text_path()?;
            config.require_concurrency()?;

            let topic = match pattern {
                Some(p) => Topic::Pattern(p),
                None => Topic::SurfaceForms(topics),
            };
            let bands = config.bands()?;

            run(&config, topic, bands, show).await?;
        }

        Commands::Score {
            sentence,
            surface_form,
        } => {
            let config = Config::load()?;
            let bands = config.bands()?;
            let score =
                fuzzy::partial_ratio(&sentence.to_lowercase(), &surface_form.to_lowercase());
            let partition = bands.classify(score.unwrap_or(0.0));
            mention_tagger::output::terminal::display_score(
                &sentence,
                &surface_form,
                score,
                partition,
            );
        }
    }

    Ok(())
}

/// Match every document in the configured directory and report the results.
async fn run(config: &Config, topic: Topic, bands: Bands, show: usize) -> Result<()> {
    // Compile up front: a malformed topic aborts the run before any work starts
    let compiled = Arc::new(topic.compile()?);
    let paths = mention_tagger::loader::list_documents(&config.text_path)?;

    if paths.is_empty() {
        println!("No documents found in {}", config.text_path.display());
        return Ok(());
    }

    println!(
        "Identifying mentions of {} in {} documents...",
        topic.to_string().bold(),
        paths.len()
    );
    info!(
        strong_lower = bands.strong.lower,
        strong_upper = bands.strong.upper,
        weak_lower = bands.weak.lower,
        weak_upper = bands.weak.upper,
        "Using fuzzy bands"
    );

    let result =
        mention_tagger::pipeline::corpus::run(paths, compiled, bands, config.concurrency).await?;

    mention_tagger::output::terminal::display_stats(&result.stats);
    mention_tagger::output::terminal::display_mentions(&result.mentions, show);

    let report_path = mention_tagger::output::report::write_report(
        &result,
        &topic,
        &bands,
        &config.report_path,
    )?;
    println!("\n{}", format!("Report saved to: {report_path}").bold());

    Ok(())
}
