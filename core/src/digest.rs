//! Lazily-populated first-block digest cache, scoped to one scan.

use crate::stat::InodeId;
use std::collections::{HashMap, HashSet};
use twox_hash::XxHash64;
use std::hash::Hasher;

/// Fixed seed so repeated runs over the same tree produce byte-identical
/// digests (and therefore byte-identical plans, per the determinism
/// invariant). Any constant works; this one has no special meaning.
const SEED: u64 = 0x68_61_72_64_6c_69_6e_6b;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest(pub u64);

impl Digest {
    pub fn of_block(block: &[u8]) -> Self {
        let mut hasher = XxHash64::with_seed(SEED);
        hasher.write(block);
        Digest(hasher.finish())
    }
}

/// `InodeId -> set of digests`. An inode accrues a digest only as a side
/// effect of actually reading its content during a comparison; this cache
/// is owned by one scan and never shared across scans or processes.
#[derive(Debug, Default)]
pub struct DigestCache {
    digests: HashMap<InodeId, HashSet<Digest>>,
}

impl DigestCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, id: InodeId, digest: Digest) {
        self.digests.entry(id).or_default().insert(digest);
    }

    pub fn get(&self, id: InodeId) -> Option<&HashSet<Digest>> {
        self.digests.get(&id)
    }

    /// True only when both inodes have cached digests and those sets are
    /// disjoint — the "different first block, can't possibly be equal"
    /// shortcut that lets the oracle skip a full content read.
    pub fn definitely_unequal(&self, a: InodeId, b: InodeId) -> bool {
        match (self.digests.get(&a), self.digests.get(&b)) {
            (Some(da), Some(db)) => da.is_disjoint(db),
            _ => false,
        }
    }
}
