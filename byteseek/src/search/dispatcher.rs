use ignore::WalkBuilder;
use rayon::prelude::*;
use std::fs;
use std::io::Write;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::{DispatchMode, SearchConfig};
use crate::errors::{SearchError, SearchResult};
use crate::filters::is_searchable_file;
use crate::results::SearchSummary;
use crate::search::matcher::Needle;
use crate::search::scanner::{WindowScanner, BUF_LEN_MAX};

/// Files below this size are scanned inline even in concurrent mode;
/// task launch overhead would dominate the scan itself.
pub(crate) const ASYNC_SIZE_THRESHOLD: u64 = 100 * BUF_LEN_MAX as u64;

/// Searches every occurrence of the configured pattern under the root
/// target, writing one line per match to `out`.
///
/// The root may be a single searchable file or a directory; directories
/// are recursed depth-first and symbolic links are never followed. Lines
/// belonging to one file are never interleaved with another file's, and
/// within a file they are in ascending offset order.
///
/// Configuration problems (empty or oversized pattern, missing target)
/// fail before any scanning starts. A file that cannot be opened or sized
/// is reported and skipped; the rest of the run continues.
pub fn search<W: Write>(config: &SearchConfig, out: &mut W) -> SearchResult<SearchSummary> {
    let needle = Needle::new(config.pattern.clone())?;
    info!(
        "Starting search for {}-byte pattern under {}",
        needle.len(),
        config.root_path.display()
    );

    let root = config.root_path.as_path();
    let meta =
        fs::symlink_metadata(root).map_err(|_| SearchError::file_not_found(root))?;

    let scanner = WindowScanner::new(&needle);
    let mut summary = SearchSummary::new();

    if meta.is_file() {
        scan_one(&scanner, root, out, &mut summary);
    } else if meta.is_dir() {
        match config.mode {
            DispatchMode::Sync => dispatch_sync(&scanner, root, out, &mut summary)?,
            DispatchMode::Concurrent => {
                dispatch_concurrent(&scanner, root, config.thread_count, out, &mut summary)?
            }
        }
    } else {
        // Symlink roots and special files are configuration errors, not
        // skippable entries.
        return Err(SearchError::target_not_searchable(root));
    }

    info!(
        "Search complete: {} matches in {} files ({} skipped)",
        summary.total_matches, summary.files_searched, summary.files_skipped
    );
    Ok(summary)
}

/// Walks every searchable regular file under `root`, invoking `on_file`
/// with the path and its size. Entries that cannot be read or sized are
/// reported and counted; the returned count is the number skipped.
///
/// Both dispatch flavors are handlers over this one traversal.
fn walk_files<F>(root: &Path, mut on_file: F) -> SearchResult<usize>
where
    F: FnMut(&Path, u64) -> SearchResult<()>,
{
    let mut builder = WalkBuilder::new(root);
    builder
        .standard_filters(false)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b));

    let mut skipped = 0;
    for entry in builder.build() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                skipped += 1;
                continue;
            }
        };
        let path = entry.path();
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }
        if !is_searchable_file(path) {
            continue;
        }
        let size = match entry.metadata() {
            Ok(meta) => meta.len(),
            Err(e) => {
                warn!("Could not get the size of {}: {}", path.display(), e);
                skipped += 1;
                continue;
            }
        };
        on_file(path, size)?;
    }
    Ok(skipped)
}

/// Scans one file into the shared output, recording the outcome.
fn scan_one<W: Write + ?Sized>(
    scanner: &WindowScanner<'_>,
    path: &Path,
    out: &mut W,
    summary: &mut SearchSummary,
) {
    match scanner.scan_file(path, out) {
        Ok(matches) => summary.add_scanned(matches),
        Err(e) => {
            warn!("Skipping {}: {}", path.display(), e);
            summary.add_skipped();
        }
    }
}

/// One file at a time, straight into the shared output. One window's worth
/// of memory total, strictly traversal order.
fn dispatch_sync<W: Write>(
    scanner: &WindowScanner<'_>,
    root: &Path,
    out: &mut W,
    summary: &mut SearchSummary,
) -> SearchResult<()> {
    let skipped = walk_files(root, |path, _size| {
        scan_one(scanner, path, out, summary);
        Ok(())
    })?;
    summary.files_skipped += skipped;
    Ok(())
}

/// Batches of up to `thread_count` concurrent scans, each writing to a
/// private buffer; the batch is flushed to the shared output in submission
/// order, so concurrent scans never interleave their lines. Small files
/// bypass the batch and are scanned inline during traversal.
fn dispatch_concurrent<W: Write>(
    scanner: &WindowScanner<'_>,
    root: &Path,
    thread_count: NonZeroUsize,
    out: &mut W,
    summary: &mut SearchSummary,
) -> SearchResult<()> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(thread_count.get())
        .build()
        .map_err(|e| SearchError::thread_pool_error(e.to_string()))?;
    debug!("Concurrent dispatch with {} threads", thread_count);

    let batch_cap = thread_count.get();
    let mut batch: Vec<PathBuf> = Vec::with_capacity(batch_cap);

    let skipped = walk_files(root, |path, size| {
        if size < ASYNC_SIZE_THRESHOLD {
            scan_one(scanner, path, out, summary);
        } else {
            batch.push(path.to_path_buf());
            if batch.len() >= batch_cap {
                flush_batch(&pool, scanner, &mut batch, out, summary)?;
            }
        }
        Ok(())
    })?;
    summary.files_skipped += skipped;

    // Remaining partial batch after traversal.
    flush_batch(&pool, scanner, &mut batch, out, summary)
}

/// Runs every task in the batch on the pool, then writes each task's
/// private buffer to the shared output in submission order. A failed scan
/// contributes no output; its error is reported from the worker.
fn flush_batch<W: Write>(
    pool: &rayon::ThreadPool,
    scanner: &WindowScanner<'_>,
    batch: &mut Vec<PathBuf>,
    out: &mut W,
    summary: &mut SearchSummary,
) -> SearchResult<()> {
    if batch.is_empty() {
        return Ok(());
    }
    debug!("Flushing batch of {} deferred scans", batch.len());

    let outcomes: Vec<(Vec<u8>, Option<usize>)> = pool.install(|| {
        batch
            .par_iter()
            .map(|path| {
                let mut buf = Vec::new();
                match scanner.scan_file(path, &mut buf) {
                    Ok(matches) => (buf, Some(matches)),
                    Err(e) => {
                        warn!("Skipping {}: {}", path.display(), e);
                        (Vec::new(), None)
                    }
                }
            })
            .collect()
    });

    for (buf, matches) in outcomes {
        out.write_all(&buf)?;
        match matches {
            Some(matches) => summary.add_scanned(matches),
            None => summary.add_skipped(),
        }
    }
    batch.clear();
    Ok(())
}
