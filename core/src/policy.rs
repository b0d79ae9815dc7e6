//! Matching policy and the equivalence key it derives.

use crate::stat::{StatSnapshot, XattrFingerprint};
use std::ffi::OsString;

/// Which attributes must match before two files are even considered for
/// content comparison. `content_only` supersedes the time/perms/xattr/
/// ownership requirements below it; `require_same_name` is independent of
/// `content_only` and can be combined with it.
#[derive(Debug, Clone)]
pub struct MatchingPolicy {
    pub require_same_name: bool,
    pub ignore_perms: bool,
    pub ignore_time: bool,
    pub ignore_xattr: bool,
    pub content_only: bool,
    pub min_size: u64,
    pub max_size: Option<u64>,
}

impl Default for MatchingPolicy {
    fn default() -> Self {
        Self {
            require_same_name: false,
            ignore_perms: false,
            ignore_time: false,
            ignore_xattr: false,
            content_only: false,
            min_size: 1,
            max_size: None,
        }
    }
}

impl MatchingPolicy {
    pub fn checks_time(&self) -> bool {
        !self.content_only && !self.ignore_time
    }

    pub fn checks_perms(&self) -> bool {
        !self.content_only && !self.ignore_perms
    }

    /// Ownership (uid/gid) rides along with permissions: both are part of
    /// "the file looks administratively identical", neither makes sense
    /// without the other under `content_only`.
    pub fn checks_ownership(&self) -> bool {
        !self.content_only && !self.ignore_perms
    }

    pub fn checks_xattr(&self) -> bool {
        !self.content_only && !self.ignore_xattr
    }
}

/// The tuple of attributes that must be identical before two inodes are
/// candidates for content comparison. Two inodes can only be linkable if
/// their keys are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EquivalenceKey {
    pub size: u64,
    pub mtime: Option<(i64, u32)>,
    pub mode: Option<u32>,
    pub uid: Option<u32>,
    pub gid: Option<u32>,
    pub xattr: Option<XattrFingerprint>,
    pub basename: Option<OsString>,
}

impl EquivalenceKey {
    pub fn derive(
        stat: &StatSnapshot,
        xattr: &XattrFingerprint,
        basename: Option<&OsString>,
        policy: &MatchingPolicy,
    ) -> Self {
        Self {
            size: stat.size,
            mtime: policy
                .checks_time()
                .then_some((stat.mtime_secs, stat.mtime_nanos)),
            mode: policy.checks_perms().then_some(stat.perm_bits()),
            uid: policy.checks_ownership().then_some(stat.uid),
            gid: policy.checks_ownership().then_some(stat.gid),
            xattr: policy.checks_xattr().then(|| xattr.clone()),
            basename: policy.require_same_name.then(|| basename.cloned()).flatten(),
        }
    }
}
