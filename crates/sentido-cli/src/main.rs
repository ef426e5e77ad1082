mod analyze;
mod dedup;
mod fetch;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "sentido")]
#[command(about = "Comment corpus harvesting, deduplication and RAG analysis")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Harvest the most popular comments of every configured video into a CSV corpus
    Fetch {
        /// Corpus file to write (default: `SENTIDO_CORPUS_PATH`)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Comments read per video before the length filter
        #[arg(long)]
        per_video: Option<usize>,
    },
    /// Remove near-duplicate comments from a corpus file
    Dedup {
        /// Corpus file to read (default: `SENTIDO_CORPUS_PATH`)
        #[arg(long)]
        input: Option<PathBuf>,

        /// Cleaned corpus to write (default: `SENTIDO_CLEAN_CORPUS_PATH`)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Cosine similarity above which a later row is dropped
        #[arg(long)]
        threshold: Option<f32>,
    },
    /// Answer the research questions over the cleaned corpus
    Analyze {
        /// Cleaned corpus to analyze (default: `SENTIDO_CLEAN_CORPUS_PATH`)
        #[arg(long)]
        input: Option<PathBuf>,

        /// Markdown report to write (default: `SENTIDO_REPORT_PATH`)
        #[arg(long)]
        report: Option<PathBuf>,

        /// Build the knowledge base and show retrieval per question without generating answers
        #[arg(long)]
        dry_run: bool,
    },
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("sentido: choose a stage to run: fetch, dedup or analyze (see --help)");
        return Ok(());
    };

    let config = sentido_core::load_config()?;
    init_tracing(&config.log_level);
    tracing::debug!(?config, "loaded configuration");

    match command {
        Commands::Fetch { output, per_video } => {
            fetch::run_fetch(&config, output.as_deref(), per_video).await
        }
        Commands::Dedup {
            input,
            output,
            threshold,
        } => dedup::run_dedup(&config, input.as_deref(), output.as_deref(), threshold),
        Commands::Analyze {
            input,
            report,
            dry_run,
        } => analyze::run_analyze(&config, input.as_deref(), report.as_deref(), dry_run).await,
    }
}
