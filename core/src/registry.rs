//! The canonical inode -> pathnames mapping, with simulated state tracking
//! as the plan is built.

use crate::policy::MatchingPolicy;
use crate::stat::{InodeId, StatSnapshot, XattrFingerprint};
use std::collections::HashMap;
use std::path::PathBuf;

/// Outcome of offering a pathname to the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdmitVerdict {
    /// A new inode record was created.
    Admitted,
    /// The inode was already known; the pathname was appended to it.
    AlreadyKnown,
    RejectedNonRegular,
    RejectedTooSmall,
    RejectedTooLarge,
}

/// One inode's discovered pathnames and stat/xattr snapshot, plus the
/// simulated state the planner mutates as it works out a plan.
///
/// Invariants: `paths` is never empty while the record exists; `paths.len()
/// <= simulated_nlink`; `simulated_nlink <= LINK_MAX` for the owning
/// device.
#[derive(Debug, Clone)]
pub struct InodeRecord {
    pub id: InodeId,
    pub stat: StatSnapshot,
    pub xattr: XattrFingerprint,
    pub paths: Vec<PathBuf>,
    pub simulated_nlink: u64,
}

impl InodeRecord {
    pub fn basename(&self) -> Option<std::ffi::OsString> {
        self.paths
            .first()
            .and_then(|p| p.file_name())
            .map(|n| n.to_os_string())
    }
}

#[derive(Debug, Default)]
pub struct InodeRegistry {
    records: HashMap<InodeId, InodeRecord>,
    /// Order inodes were first admitted in. `HashMap` iteration order is
    /// unspecified and varies run to run (`RandomState`); `iter()` walks
    /// this instead so two scans of an identical tree enumerate inodes
    /// identically, which `CandidateIndex` relies on for stable bucketing.
    order: Vec<InodeId>,
}

impl InodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admits a discovered `(pathname, stat, xattr)` triple. Non-regular
    /// files and files outside `[min_size, max_size]` are rejected without
    /// creating or touching a record.
    pub fn admit(
        &mut self,
        path: PathBuf,
        id: InodeId,
        stat: StatSnapshot,
        xattr: XattrFingerprint,
        policy: &MatchingPolicy,
    ) -> AdmitVerdict {
        if !stat.is_regular {
            return AdmitVerdict::RejectedNonRegular;
        }
        if stat.size < policy.min_size {
            return AdmitVerdict::RejectedTooSmall;
        }
        if let Some(max) = policy.max_size {
            if stat.size > max {
                return AdmitVerdict::RejectedTooLarge;
            }
        }

        match self.records.get_mut(&id) {
            Some(record) => {
                record.paths.push(path);
                AdmitVerdict::AlreadyKnown
            }
            None => {
                self.records.insert(
                    id,
                    InodeRecord {
                        id,
                        stat,
                        xattr,
                        paths: vec![path],
                        simulated_nlink: stat.nlink,
                    },
                );
                self.order.push(id);
                AdmitVerdict::Admitted
            }
        }
    }

    pub fn get(&self, id: InodeId) -> Option<&InodeRecord> {
        self.records.get(&id)
    }

    pub fn get_mut(&mut self, id: InodeId) -> Option<&mut InodeRecord> {
        self.records.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Walks inodes in first-admitted order, skipping any that were later
    /// removed entirely (e.g. by `migrate_path` emptying their path list).
    pub fn iter(&self) -> impl Iterator<Item = &InodeRecord> {
        self.order.iter().filter_map(move |id| self.records.get(id))
    }

    /// Migrates a pathname from `target`'s record to `source`'s record.
    /// Drops `target`'s record entirely once its path list empties —
    /// a record with zero paths has no reason to exist (§3 invariant).
    pub fn migrate_path(&mut self, source: InodeId, target: InodeId, path: &PathBuf) {
        let mut dropped = false;
        if let Some(rec) = self.records.get_mut(&target) {
            if let Some(pos) = rec.paths.iter().position(|p| p == path) {
                rec.paths.remove(pos);
            }
            dropped = rec.paths.is_empty();
        }
        if dropped {
            self.records.remove(&target);
        }
        if let Some(rec) = self.records.get_mut(&source) {
            rec.paths.push(path.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stat() -> StatSnapshot {
        StatSnapshot {
            size: 10,
            mtime_secs: 0,
            mtime_nanos: 0,
            mode: 0o100644,
            uid: 0,
            gid: 0,
            nlink: 1,
            is_regular: true,
        }
    }

    #[test]
    fn iter_walks_in_admission_order_regardless_of_inode_number() {
        let mut registry = InodeRegistry::new();
        let policy = MatchingPolicy::default();
        // Admitted out of numeric order, on purpose.
        let ids = [InodeId::new(1, 50), InodeId::new(1, 3), InodeId::new(1, 200)];
        for (i, id) in ids.iter().enumerate() {
            registry.admit(
                PathBuf::from(format!("/f{i}")),
                *id,
                stat(),
                XattrFingerprint::absent(),
                &policy,
            );
        }

        let seen: Vec<InodeId> = registry.iter().map(|r| r.id).collect();
        assert_eq!(seen, ids);
    }

    #[test]
    fn iter_skips_records_dropped_by_migration() {
        let mut registry = InodeRegistry::new();
        let policy = MatchingPolicy::default();
        let a = InodeId::new(1, 1);
        let b = InodeId::new(1, 2);
        registry.admit(PathBuf::from("/a"), a, stat(), XattrFingerprint::absent(), &policy);
        registry.admit(PathBuf::from("/b"), b, stat(), XattrFingerprint::absent(), &policy);

        registry.migrate_path(a, b, &PathBuf::from("/b"));

        let seen: Vec<InodeId> = registry.iter().map(|r| r.id).collect();
        assert_eq!(seen, vec![a]);
    }
}
