use anyhow::Context;
use byteseek::{search, DispatchMode, SearchConfig};
use clap::Parser;
use std::io::{self, BufWriter, Write};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Search for a byte pattern in a file or directory tree, printing every
/// occurrence with its byte offset and surrounding context.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// File or directory to search
    target: PathBuf,

    /// Pattern to search for (1 to 128 bytes)
    pattern: String,

    /// Scan files one at a time instead of concurrently
    #[arg(long)]
    sync: bool,

    /// Number of concurrent scans (default: half the CPU count)
    #[arg(short = 'j', long)]
    threads: Option<NonZeroUsize>,

    /// Print only the run summary instead of individual matches
    #[arg(short, long)]
    stats: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let mut config = SearchConfig::new(&cli.target, cli.pattern.clone().into_bytes());
    config.log_level = cli.log_level.clone();
    if cli.sync {
        config.mode = DispatchMode::Sync;
    }
    if let Some(threads) = cli.threads {
        config.thread_count = threads;
    }

    let stdout = io::stdout();
    let mut out: Box<dyn Write> = if cli.stats {
        Box::new(io::sink())
    } else {
        Box::new(BufWriter::new(stdout.lock()))
    };

    let summary = search(&config, &mut out)
        .with_context(|| format!("searching {}", cli.target.display()))?;
    out.flush()?;

    if cli.stats {
        println!(
            "Found {} matches in {} files ({} skipped)",
            summary.total_matches, summary.files_searched, summary.files_skipped
        );
    }
    Ok(())
}
