//! Running counters for one scan.

/// All counters from §4.6, plus the rejection breakdown from §7's error
/// table. Every field is a plain running total so the accumulator can be
/// serialized directly for `--json` output by the CLI layer.
#[derive(Debug, Clone, Default)]
pub struct Stats {
    pub directories_visited: u64,
    pub files_visited: u64,
    pub inodes_admitted: u64,
    pub comparisons: u64,
    pub hashes_computed: u64,

    pub current_hardlinked_bytes: u64,
    pub additional_bytes_saveable: u64,

    pub too_small: u64,
    pub too_large: u64,
    pub non_regular_skipped: u64,
    pub unequal_file_times: u64,
    pub unequal_modes: u64,
    pub unequal_ownership: u64,
    pub unequal_xattr: u64,
    pub unequal_names: u64,
    pub content_mismatches: u64,
    pub indeterminate_comparisons: u64,

    pub remaining_unlinkable: u64,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_bytes_saveable(&self) -> u64 {
        self.current_hardlinked_bytes + self.additional_bytes_saveable
    }
}
