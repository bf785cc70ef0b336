use anyhow::Result;
use clap::{Parser, Subcommand};
use sift_indexer::build_corpus;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "sift-indexer")]
#[command(about = "Build a TF-IDF inverted index from an HTML corpus", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the index from a directory of {url, content} JSON documents
    Build {
        /// Corpus directory
        #[arg(long)]
        input: PathBuf,
        /// Output index directory
        #[arg(long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { input, output } => {
            let stats = build_corpus(&input, &output)?;
            tracing::info!(
                num_docs = stats.num_docs,
                num_terms = stats.num_terms,
                num_segments = stats.num_segments,
                "index build complete"
            );
            Ok(())
        }
    }
}
