//! Top-level orchestration: walker -> registry -> candidate index ->
//! equality oracle -> union-find -> planner (§2's data flow).

use crate::digest::DigestCache;
use crate::index::CandidateIndex;
use crate::linkmax::LinkMaxTable;
use crate::oracle::EqualityOracle;
use crate::planner::{LinkOp, LinkPlan, LinkPlanner};
use crate::policy::MatchingPolicy;
use crate::registry::{AdmitVerdict, InodeRegistry};
use crate::stats::Stats;
use crate::unionfind::UnionFind;
use crate::walker::WalkSource;
use log::{debug, info};
use std::path::PathBuf;

/// The full result of one scan: the plan (possibly partial, if cancelled
/// before completion) and the final counters.
#[derive(Debug, Default)]
pub struct ScanOutput {
    pub plan: LinkPlan,
    pub stats: Stats,
    pub cancelled: bool,
}

/// Cooperative cancellation, checked at phase boundaries and at bucket
/// boundaries within the comparison phase (§5). `()` never cancels.
pub trait CancelToken {
    fn is_cancelled(&self) -> bool;
}

impl CancelToken for () {
    fn is_cancelled(&self) -> bool {
        false
    }
}

impl<F: Fn() -> bool> CancelToken for F {
    fn is_cancelled(&self) -> bool {
        self()
    }
}

pub fn run_scan<W: WalkSource>(walker: W, policy: &MatchingPolicy) -> ScanOutput {
    run_scan_cancellable(walker, policy, &())
}

pub fn run_scan_cancellable<W: WalkSource, C: CancelToken>(
    mut walker: W,
    policy: &MatchingPolicy,
    cancel: &C,
) -> ScanOutput {
    let mut registry = InodeRegistry::new();
    let mut link_max = LinkMaxTable::new();
    let mut stats = Stats::new();

    // --- Phase 1: walk + admit ---
    while let Some(entry) = walker.next_entry() {
        stats.files_visited += 1;
        link_max.probe(entry.id.dev, &entry.path);
        match registry.admit(entry.path, entry.id, entry.stat, entry.xattr, policy) {
            AdmitVerdict::Admitted => stats.inodes_admitted += 1,
            AdmitVerdict::RejectedNonRegular => stats.non_regular_skipped += 1,
            AdmitVerdict::RejectedTooSmall => stats.too_small += 1,
            AdmitVerdict::RejectedTooLarge => stats.too_large += 1,
            AdmitVerdict::AlreadyKnown => {}
        }
    }
    if cancel.is_cancelled() {
        return ScanOutput { plan: LinkPlan::default(), stats, cancelled: true };
    }
    info!(
        "walked {} files, admitted {} inodes",
        stats.files_visited, stats.inodes_admitted
    );

    for rec in registry.iter() {
        stats.current_hardlinked_bytes += rec.stat.nlink.saturating_sub(1) * rec.stat.size;
    }

    // --- Phase 2: index ---
    let mut index = CandidateIndex::new();
    for rec in registry.iter() {
        index.insert(rec, policy);
    }
    if cancel.is_cancelled() {
        return ScanOutput { plan: LinkPlan::default(), stats, cancelled: true };
    }
    debug!("{} candidate buckets", index.bucket_count());

    // --- Phase 3: compare + union ---
    let oracle = EqualityOracle::new(policy);
    let mut digests = DigestCache::new();
    let mut groups: Vec<Vec<_>> = Vec::new();

    for bucket in index.buckets() {
        if cancel.is_cancelled() {
            return ScanOutput { plan: LinkPlan::default(), stats, cancelled: true };
        }

        let mut uf = UnionFind::new(bucket.iter().copied());
        let mut reps: Vec<_> = Vec::new();

        for &id in bucket {
            let mut joined = false;
            for &rep in &reps {
                match oracle.equal(&registry, &mut digests, &mut stats, rep, id) {
                    Ok(true) => {
                        uf.union(rep, id);
                        joined = true;
                        break;
                    }
                    Ok(false) => continue,
                    // I/O failure mid-compare: treat the pair as non-equal
                    // and keep checking other representatives (§4.5's
                    // "indeterminate" failure semantics).
                    Err(_) => continue,
                }
            }
            if !joined {
                reps.push(id);
            }
        }

        for group in uf.groups() {
            if group.len() >= 2 {
                groups.push(group);
            }
        }
    }
    if cancel.is_cancelled() {
        return ScanOutput { plan: LinkPlan::default(), stats, cancelled: true };
    }

    // --- Phase 4: plan ---
    let planner = LinkPlanner::new(&link_max);
    let mut plan = LinkPlan::default();
    for group in &groups {
        let group_plan = planner.plan_group(&mut registry, group, &mut stats);
        plan.ops.extend(group_plan.ops);
        plan.unlinkable.extend(group_plan.unlinkable);
    }

    stats.remaining_unlinkable = registry.len() as u64;
    info!("planned {} link ops, {} inodes remaining", plan.ops.len(), stats.remaining_unlinkable);

    ScanOutput { plan, stats, cancelled: false }
}

/// Convenience accessor mirroring the JSON schema's `linkable_pairs`: the
/// `(from, to)` pathname pairs a plan would create, without exposing
/// `LinkOp`'s inode fields to callers that only want display data.
pub fn linkable_pairs(plan: &LinkPlan) -> Vec<(PathBuf, PathBuf)> {
    plan.ops.iter().map(|op: &LinkOp| (op.from_path.clone(), op.to_path.clone())).collect()
}
