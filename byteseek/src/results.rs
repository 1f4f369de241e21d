/// Aggregate counters for a whole search run.
///
/// Match records themselves are streamed to the output sink as they are
/// found and never retained; only these totals travel back to the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchSummary {
    /// Files the scanner ran to completion on
    pub files_searched: usize,
    /// Files skipped because they could not be opened or sized
    pub files_skipped: usize,
    /// Total number of match records emitted
    pub total_matches: usize,
}

impl SearchSummary {
    pub fn new() -> Self {
        Default::default()
    }

    /// Records one completed scan and the matches it emitted.
    pub fn add_scanned(&mut self, matches: usize) {
        self.files_searched += 1;
        self.total_matches += matches;
    }

    /// Records a file that had to be skipped.
    pub fn add_skipped(&mut self) {
        self.files_skipped += 1;
    }

    /// Merges counters from another summary into this one.
    pub fn merge(&mut self, other: SearchSummary) {
        self.files_searched += other.files_searched;
        self.files_skipped += other.files_skipped;
        self.total_matches += other.total_matches;
    }
}
