//! Decides whether two inodes are linkable: attribute checks first, then a
//! digest pre-filter, then (only if both pass) an actual content read.

use crate::digest::{Digest, DigestCache};
use crate::error::ScanError;
use crate::policy::MatchingPolicy;
use crate::registry::InodeRegistry;
use crate::stat::InodeId;
use crate::stats::Stats;
use std::fs::File;
use std::io::Read;

/// Block size used when streaming file contents for comparison. The spec
/// only requires "≥ 8 KiB"; 64 KiB amortizes syscall overhead without
/// holding an unreasonable amount of memory per open comparison.
const BLOCK_SIZE: usize = 64 * 1024;

pub struct EqualityOracle<'a> {
    policy: &'a MatchingPolicy,
}

impl<'a> EqualityOracle<'a> {
    pub fn new(policy: &'a MatchingPolicy) -> Self {
        Self { policy }
    }

    /// Returns `Ok(true)` if `a` and `b` are linkable under the active
    /// policy, `Ok(false)` if they are provably not, and `Err` only for an
    /// I/O failure encountered while reading content (callers must treat
    /// that as "not equal" per §7, not propagate it out of the planner).
    pub fn equal(
        &self,
        registry: &InodeRegistry,
        digests: &mut DigestCache,
        stats: &mut Stats,
        a: InodeId,
        b: InodeId,
    ) -> Result<bool, ScanError> {
        let ra = registry.get(a).expect("candidate index holds a stale InodeId");
        let rb = registry.get(b).expect("candidate index holds a stale InodeId");

        if ra.stat.size < self.policy.min_size || rb.stat.size < self.policy.min_size {
            stats.too_small += 1;
            return Ok(false);
        }
        if let Some(max) = self.policy.max_size {
            if ra.stat.size > max || rb.stat.size > max {
                stats.too_large += 1;
                return Ok(false);
            }
        }

        if self.policy.checks_time()
            && (ra.stat.mtime_secs, ra.stat.mtime_nanos) != (rb.stat.mtime_secs, rb.stat.mtime_nanos)
        {
            stats.unequal_file_times += 1;
            return Ok(false);
        }
        if self.policy.checks_perms() && ra.stat.perm_bits() != rb.stat.perm_bits() {
            stats.unequal_modes += 1;
            return Ok(false);
        }
        if self.policy.checks_ownership() && (ra.stat.uid != rb.stat.uid || ra.stat.gid != rb.stat.gid) {
            stats.unequal_ownership += 1;
            return Ok(false);
        }
        if self.policy.checks_xattr() && ra.xattr != rb.xattr {
            stats.unequal_xattr += 1;
            return Ok(false);
        }
        if self.policy.require_same_name && ra.basename() != rb.basename() {
            stats.unequal_names += 1;
            return Ok(false);
        }

        if digests.definitely_unequal(a, b) {
            return Ok(false);
        }

        stats.comparisons += 1;
        match self.compare_content(ra, rb, digests, stats) {
            Ok(equal) => {
                if !equal {
                    stats.content_mismatches += 1;
                }
                Ok(equal)
            }
            Err(e) => {
                stats.indeterminate_comparisons += 1;
                Err(e)
            }
        }
    }

    fn compare_content(
        &self,
        ra: &crate::registry::InodeRecord,
        rb: &crate::registry::InodeRecord,
        digests: &mut DigestCache,
        stats: &mut Stats,
    ) -> Result<bool, ScanError> {
        let path_a = &ra.paths[0];
        let path_b = &rb.paths[0];
        let mut fa = open(path_a)?;
        let mut fb = open(path_b)?;

        let mut buf_a = vec![0u8; BLOCK_SIZE];
        let mut buf_b = vec![0u8; BLOCK_SIZE];
        let mut first_block = true;

        loop {
            let na = read_block(&mut fa, &mut buf_a, path_a)?;
            let nb = read_block(&mut fb, &mut buf_b, path_b)?;

            if first_block {
                digests.record(ra.id, Digest::of_block(&buf_a[..na]));
                digests.record(rb.id, Digest::of_block(&buf_b[..nb]));
                stats.hashes_computed += 2;
                first_block = false;
            }

            if na != nb || buf_a[..na] != buf_b[..nb] {
                return Ok(false);
            }
            if na == 0 {
                // Simultaneous EOF; size equality (already guaranteed by
                // the equivalence key) means one EOF implies the other.
                return Ok(true);
            }
        }
    }
}

fn open(path: &std::path::Path) -> Result<File, ScanError> {
    File::open(path).map_err(|source| ScanError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn read_block(file: &mut File, buf: &mut [u8], path: &std::path::Path) -> Result<usize, ScanError> {
    let mut total = 0;
    while total < buf.len() {
        match file.read(&mut buf[total..]) {
            Ok(0) => break,
            Ok(n) => total += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(source) => {
                return Err(ScanError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        }
    }
    Ok(total)
}
