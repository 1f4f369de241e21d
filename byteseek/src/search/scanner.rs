use std::cmp;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::{debug, trace};

use crate::errors::{SearchError, SearchResult};
use crate::filters::display_name;
use crate::search::matcher::Needle;

/// Context width printed on each side of a match.
pub const AFFIX_LEN: usize = 3;
/// Upper bound on the window buffer, independent of file size.
pub const BUF_LEN_MAX: usize = 500 * 1024;

/// Smallest window that leaves room for one affix on each side of a
/// minimal match. The windowing algorithm depends on `2 * AFFIX_LEN`
/// being strictly smaller than this.
pub(crate) fn min_window_len(needle_len: usize) -> usize {
    2 * AFFIX_LEN + needle_len + 2
}

/// Bytes carried from the tail of one window to the head of the next, so
/// a match that starts in the reserved tail is rediscovered whole, with
/// full context, in the following pass.
fn carry_len(needle_len: usize) -> usize {
    AFFIX_LEN + needle_len + 2
}

/// Reads until `buf` is full or the source is exhausted.
fn read_full<R: Read>(source: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match source.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Writes context bytes with `\n` and `\t` rendered as two-character
/// escapes; everything else passes through verbatim.
fn write_escaped<W: Write + ?Sized>(out: &mut W, bytes: &[u8]) -> std::io::Result<()> {
    for &b in bytes {
        match b {
            b'\n' => out.write_all(b"\\n")?,
            b'\t' => out.write_all(b"\\t")?,
            _ => out.write_all(&[b])?,
        }
    }
    Ok(())
}

/// Streams a byte source through a bounded window and reports every
/// occurrence of the needle, including occurrences that straddle window
/// boundaries.
///
/// Peak memory per scan is one window, at most [`BUF_LEN_MAX`] bytes,
/// regardless of source size. The needle is borrowed, so one needle can
/// serve any number of concurrent scanners.
#[derive(Debug, Clone, Copy)]
pub struct WindowScanner<'n> {
    needle: &'n Needle,
}

impl<'n> WindowScanner<'n> {
    pub fn new(needle: &'n Needle) -> Self {
        Self { needle }
    }

    /// Opens `path` and scans it, reporting matches under the file's
    /// quote-trimmed base name. Returns the number of matches emitted.
    pub fn scan_file<W: Write + ?Sized>(&self, path: &Path, out: &mut W) -> SearchResult<usize> {
        trace!("Scanning file: {}", path.display());
        let file = File::open(path).map_err(|e| SearchError::from_io(e, path))?;
        let size_hint = file
            .metadata()
            .map_err(|e| SearchError::from_io(e, path))?
            .len();
        let name = display_name(path);
        self.scan(&name, file, size_hint, out)
    }

    /// Scans `source` from start to end exactly once, writing one line per
    /// occurrence to `out`:
    ///
    /// ```text
    /// <name>(<offset>):<prefix>...<suffix>
    /// ```
    ///
    /// in ascending offset order. `size_hint` only tunes the window size
    /// (clamped to `[min_window_len, BUF_LEN_MAX]`); correctness does not
    /// depend on it.
    ///
    /// All but the final pass hold back an `AFFIX_LEN` reserve at the tail
    /// of the window, and the trailing carry region is copied to the head
    /// before each refill. A match first seen in the reserve is therefore
    /// reported from the next window instead, exactly once and with full
    /// context. Matches may overlap: after a hit the cursor advances by one
    /// byte, not by the needle length.
    pub fn scan<R: Read, W: Write + ?Sized>(
        &self,
        name: &str,
        mut source: R,
        size_hint: u64,
        out: &mut W,
    ) -> SearchResult<usize> {
        let needle_len = self.needle.len();
        let hint = usize::try_from(size_hint).unwrap_or(BUF_LEN_MAX);
        let buf_len = hint.clamp(min_window_len(needle_len), BUF_LEN_MAX);
        let mut buffer = vec![0u8; buf_len];

        // Valid bytes in the window.
        let mut window_len = 0usize;
        // Prefix of the window eligible for starting a new match search.
        let mut hay_len = 0usize;
        // Absolute offset of the window start in the source.
        let mut window_pos_in_file = 0u64;
        // Bytes carried over from the previous window.
        let mut padding = 0usize;
        // Next search cursor within the window.
        let mut hay_start = 0usize;
        let mut eof = false;
        let mut matches = 0usize;

        while !eof || hay_len < window_len {
            if !eof {
                window_pos_in_file += (window_len - padding) as u64;
                let wanted = buf_len - padding;
                let read_len = read_full(&mut source, &mut buffer[padding..buf_len])?;
                eof = read_len < wanted;
                window_len = padding + read_len;

                // Hold back the trailing reserve; those bytes may belong to
                // a match continuing into the next window. A window no
                // larger than the reserve is the whole remaining source.
                hay_len = if window_len <= AFFIX_LEN {
                    window_len
                } else {
                    window_len - AFFIX_LEN
                };
            } else {
                // Source exhausted: the final pass searches the reserve too,
                // and terminates the loop.
                hay_len = window_len;
            }

            while hay_start + needle_len <= hay_len {
                let Some(found) = self.needle.find(&buffer[hay_start..hay_len]) else {
                    break;
                };
                let pos = hay_start + found;

                let prefix = &buffer[pos.saturating_sub(AFFIX_LEN)..pos];
                let suffix_start = pos + needle_len;
                let suffix_end = cmp::min(suffix_start + AFFIX_LEN, window_len);
                let suffix = &buffer[suffix_start..suffix_end];

                write!(out, "{}({}):", name, window_pos_in_file + pos as u64)?;
                write_escaped(out, prefix)?;
                out.write_all(b"...")?;
                write_escaped(out, suffix)?;
                out.write_all(b"\n")?;
                matches += 1;

                hay_start = pos + 1;
            }

            padding = carry_len(needle_len);
            if !eof {
                buffer.copy_within(window_len - padding..window_len, 0);
                // Carried bytes below AFFIX_LEN were already searched in the
                // previous window; starting there also guarantees a full
                // prefix for any match found in the carry.
                hay_start = AFFIX_LEN;
            }
        }

        debug!("Found {} matches in {}", matches, name);
        Ok(matches)
    }
}
