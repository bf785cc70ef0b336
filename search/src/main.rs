use anyhow::Result;
use clap::Parser;
use sift_search::{QueryEngine, DEFAULT_TOP_K};
use std::io::{self, BufRead, Write};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "sift-search")]
#[command(about = "Interactive query loop over a built index", long_about = None)]
struct Args {
    /// Index directory path
    #[arg(long, default_value = "./index")]
    index: String,
    /// Maximum results per query
    #[arg(long, default_value_t = DEFAULT_TOP_K)]
    top_k: usize,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    let engine = QueryEngine::open(&args.index)?;

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("Enter: ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else { break };
        let query = line?;
        let query = query.trim();
        if query == "exit search" {
            break;
        }
        match engine.search(query, args.top_k) {
            Ok(hits) if hits.is_empty() => println!("no results"),
            Ok(hits) => {
                for hit in hits {
                    println!("{}", hit.url);
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "query failed");
                println!("no results");
            }
        }
    }
    Ok(())
}
