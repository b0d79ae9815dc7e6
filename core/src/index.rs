//! Buckets inodes by equivalence key so pairwise comparison is confined to
//! inodes that could possibly be linkable.

use crate::policy::{EquivalenceKey, MatchingPolicy};
use crate::registry::InodeRecord;
use crate::stat::InodeId;
use std::collections::HashMap;

/// Insertion-ordered bucket map. A plain `HashMap<EquivalenceKey, Vec<_>>`
/// would not guarantee the "stable ordering across runs" requirement
/// (§4.2) since hash iteration order is unspecified; this keeps buckets in
/// a `Vec` in first-seen order and uses the map only to find a bucket's
/// index in O(1).
#[derive(Debug, Default)]
pub struct CandidateIndex {
    order: Vec<EquivalenceKey>,
    slot: HashMap<EquivalenceKey, usize>,
    buckets: Vec<Vec<InodeId>>,
}

impl CandidateIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, record: &InodeRecord, policy: &MatchingPolicy) {
        let key = EquivalenceKey::derive(&record.stat, &record.xattr, record.basename().as_ref(), policy);
        match self.slot.get(&key) {
            Some(&idx) => self.buckets[idx].push(record.id),
            None => {
                let idx = self.buckets.len();
                self.slot.insert(key.clone(), idx);
                self.order.push(key);
                self.buckets.push(vec![record.id]);
            }
        }
    }

    /// Yields buckets with at least two members, in insertion order.
    pub fn buckets(&self) -> impl Iterator<Item = &[InodeId]> {
        self.buckets.iter().filter(|b| b.len() >= 2).map(|b| b.as_slice())
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.iter().filter(|b| b.len() >= 2).count()
    }
}
