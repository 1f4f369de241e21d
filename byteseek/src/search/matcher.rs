use memchr::memmem;

use crate::errors::{SearchError, SearchResult};

/// Maximum length of the search pattern, in bytes.
pub const MAX_NEEDLE_LEN: usize = 128;

/// The validated, immutable search pattern.
///
/// Construction checks the 1..=128 byte bound and precomputes a
/// [`memmem::Finder`], so every window pass reuses the same searcher
/// tables. A `Needle` is never mutated after construction and is shared
/// read-only by all concurrent scans.
#[derive(Debug, Clone)]
pub struct Needle {
    bytes: Box<[u8]>,
    finder: memmem::Finder<'static>,
}

impl Needle {
    /// Validates and builds a needle from raw pattern bytes.
    pub fn new(pattern: impl Into<Vec<u8>>) -> SearchResult<Self> {
        let bytes: Vec<u8> = pattern.into();
        if bytes.is_empty() {
            return Err(SearchError::EmptyPattern);
        }
        if bytes.len() > MAX_NEEDLE_LEN {
            return Err(SearchError::PatternTooLong { len: bytes.len() });
        }
        let finder = memmem::Finder::new(&bytes).into_owned();
        Ok(Self {
            bytes: bytes.into_boxed_slice(),
            finder,
        })
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false for a validated needle.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Position of the first occurrence of the pattern in `haystack`, if any.
    pub fn find(&self, haystack: &[u8]) -> Option<usize> {
        self.finder.find(haystack)
    }
}
