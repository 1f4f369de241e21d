use std::num::NonZeroUsize;
use std::path::PathBuf;

/// Fallback thread count when hardware parallelism cannot be determined
/// (or halving it would leave nothing).
pub const DEFAULT_THREAD_COUNT: usize = 2;

/// How the dispatcher hands files to the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DispatchMode {
    /// One file at a time, written straight to the shared output.
    /// Uses very little memory, but slow for many large files.
    Sync,
    /// Batches of concurrent scans with per-task output buffers.
    /// Faster, at the cost of one window plus one buffer per in-flight scan.
    #[default]
    Concurrent,
}

/// Configuration for a search run.
///
/// Built in memory by the caller (the CLI maps its arguments onto this);
/// there is no configuration file.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// The byte pattern to search for (1..=128 bytes, validated at run start)
    pub pattern: Vec<u8>,

    /// File or directory to search
    pub root_path: PathBuf,

    /// Dispatch mode for directory targets
    pub mode: DispatchMode,

    /// Upper bound on simultaneously in-flight scans in concurrent mode.
    /// Defaults to half the available hardware parallelism; override for
    /// reproducible tests.
    pub thread_count: NonZeroUsize,

    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl SearchConfig {
    pub fn new(root_path: impl Into<PathBuf>, pattern: impl Into<Vec<u8>>) -> Self {
        Self {
            pattern: pattern.into(),
            root_path: root_path.into(),
            mode: DispatchMode::default(),
            thread_count: default_thread_count(),
            log_level: default_log_level(),
        }
    }
}

/// Half the hardware parallelism, so that blocking reads do not
/// oversubscribe the machine; falls back to a small constant.
pub fn default_thread_count() -> NonZeroUsize {
    NonZeroUsize::new(num_cpus::get() / 2)
        .unwrap_or_else(|| NonZeroUsize::new(DEFAULT_THREAD_COUNT).unwrap())
}

fn default_log_level() -> String {
    "warn".to_string()
}
