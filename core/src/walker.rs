//! The walker contract (§6): a finite, non-restartable pull iterator the
//! core consumes until exhaustion. The walker itself — directory
//! recursion, `--match`/`--exclude` filtering — is an external
//! collaborator; this crate only defines the shape it must have.

use crate::stat::{InodeId, StatSnapshot, XattrFingerprint};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct WalkEntry {
    pub path: PathBuf,
    pub id: InodeId,
    pub stat: StatSnapshot,
    pub xattr: XattrFingerprint,
}

/// A pull source of already-filtered `(pathname, stat, xattr)` triples.
/// Implementations have already applied basename `--match`/`--exclude`
/// filters; the core does not re-filter.
pub trait WalkSource {
    fn next_entry(&mut self) -> Option<WalkEntry>;
}

impl<I: Iterator<Item = WalkEntry>> WalkSource for I {
    fn next_entry(&mut self) -> Option<WalkEntry> {
        self.next()
    }
}
