//! The concrete directory walker: wraps `walkdir::WalkDir`, skips
//! symlinks, and applies `--match`/`--exclude` basename regexes before
//! anything reaches the core (§6's walker contract).

use crate::xattrs;
use hardlinkable_core::{StatSnapshot, WalkEntry, WalkSource, XattrFingerprint};
use regex::Regex;
use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use walkdir::WalkDir;

#[derive(Debug, Clone, Default)]
pub struct NameFilters {
    pub include: Vec<Regex>,
    pub exclude: Vec<Regex>,
}

impl NameFilters {
    fn excludes(&self, name: &str) -> bool {
        self.exclude.iter().any(|re| re.is_match(name))
    }

    fn matches(&self, name: &str) -> bool {
        self.include.is_empty() || self.include.iter().any(|re| re.is_match(name))
    }
}

pub struct FsWalker {
    inner: Box<dyn Iterator<Item = walkdir::DirEntry>>,
    filters: Rc<NameFilters>,
    track_xattr: bool,
    directories_visited: Rc<Cell<u64>>,
}

impl FsWalker {
    /// Builds a walker rooted at each of `roots`. Symlinks — to files or
    /// to directories — are never followed (§9's resolved open question);
    /// directories whose basename matches an `--exclude` pattern are
    /// pruned before descent; files whose basename fails `--match`/
    /// `--exclude` are filtered out in `next_entry`.
    pub fn new(roots: &[PathBuf], filters: NameFilters, track_xattr: bool) -> Self {
        let filters = Rc::new(filters);
        let mut iters: Vec<Box<dyn Iterator<Item = walkdir::DirEntry>>> = Vec::new();
        for root in roots {
            let filters = filters.clone();
            let walk = WalkDir::new(root)
                .follow_links(false)
                .into_iter()
                .filter_entry(move |entry| {
                    if !entry.file_type().is_dir() {
                        return true;
                    }
                    match entry.file_name().to_str() {
                        Some(name) => !filters.excludes(name),
                        None => true,
                    }
                })
                .filter_map(|res| res.ok());
            iters.push(Box::new(walk));
        }
        Self {
            inner: Box::new(iters.into_iter().flatten()),
            filters,
            track_xattr,
            directories_visited: Rc::new(Cell::new(0)),
        }
    }

    /// A counter that keeps updating even after the walker itself has been
    /// moved into and consumed by `run_scan`/`run_scan_cancellable`, which
    /// take ownership of the `WalkSource` and never hand it back.
    pub fn directories_visited_counter(&self) -> Rc<Cell<u64>> {
        self.directories_visited.clone()
    }
}

impl WalkSource for FsWalker {
    fn next_entry(&mut self) -> Option<WalkEntry> {
        loop {
            let entry = self.inner.next()?;
            let path = entry.path();
            let file_type = entry.file_type();

            if file_type.is_symlink() {
                continue;
            }
            if file_type.is_dir() {
                self.directories_visited.set(self.directories_visited.get() + 1);
                continue;
            }

            let meta = match entry.metadata() {
                Ok(m) => m,
                Err(_) => continue,
            };
            if !meta.file_type().is_file() {
                continue;
            }
            if !basename_included(path, &self.filters) {
                continue;
            }

            let id = StatSnapshot::dev_ino(&meta);
            let stat = StatSnapshot::from_metadata(&meta);
            let xattr = if self.track_xattr {
                xattrs::fingerprint(path)
            } else {
                XattrFingerprint::absent()
            };

            return Some(WalkEntry {
                path: path.to_path_buf(),
                id,
                stat,
                xattr,
            });
        }
    }
}

/// Applies the name filters to one final-component path. Used by the
/// walker above indirectly through `filter_entry`/`next_entry`, and
/// exposed standalone for the regex-matching unit tests.
pub fn basename_included(path: &Path, filters: &NameFilters) -> bool {
    let name = match path.file_name().and_then(|n| n.to_str()) {
        Some(n) => n,
        None => return true,
    };
    filters.matches(name) && !filters.excludes(name)
}
