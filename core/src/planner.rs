//! Greedy per-group link ordering: minimizes `link(2)` calls, respects
//! `LINK_MAX`, and keeps the registry's simulated state exact as it goes.

use crate::linkmax::LinkMaxTable;
use crate::registry::InodeRegistry;
use crate::stat::InodeId;
use crate::stats::Stats;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkOp {
    pub from_path: PathBuf,
    pub to_path: PathBuf,
    pub from_inode: InodeId,
    pub to_inode: InodeId,
}

#[derive(Debug, Default)]
pub struct LinkPlan {
    pub ops: Vec<LinkOp>,
    /// Pathnames that could not be joined to any source because every
    /// group member hit `LINK_MAX` on its device.
    pub unlinkable: Vec<PathBuf>,
}

pub struct LinkPlanner<'a> {
    link_max: &'a LinkMaxTable,
}

impl<'a> LinkPlanner<'a> {
    pub fn new(link_max: &'a LinkMaxTable) -> Self {
        Self { link_max }
    }

    /// Plans one equivalence group (all members already proven mutually
    /// equal by the union-find). Mutates the registry's simulated state
    /// (`simulated_nlink`, path migration) as it emits ops so later groups
    /// and a second planning pass both observe the post-plan state.
    pub fn plan_group(&self, registry: &mut InodeRegistry, group: &[InodeId], stats: &mut Stats) -> LinkPlan {
        let mut plan = LinkPlan::default();
        if group.len() < 2 {
            return plan;
        }

        let mut members = group.to_vec();
        members.sort_by(|a, b| {
            let na = registry.get(*a).expect("group member vanished").simulated_nlink;
            let nb = registry.get(*b).expect("group member vanished").simulated_nlink;
            nb.cmp(&na).then(a.cmp(b))
        });

        let mut source_idx = 0usize;
        let mut exhausted = false;

        for target_pos in 1..members.len() {
            let target = members[target_pos];
            if exhausted {
                if let Some(rec) = registry.get(target) {
                    plan.unlinkable.extend(rec.paths.iter().cloned());
                }
                continue;
            }

            // Snapshot: iterating while migrating would otherwise mutate
            // the very list being walked.
            let target_paths: Vec<PathBuf> = match registry.get(target) {
                Some(rec) => rec.paths.clone(),
                None => continue,
            };
            let mut charged = false;
            let mut remaining = target_paths.into_iter();

            while let Some(path) = remaining.next() {
                if !self.find_capacity(&members, registry, &mut source_idx, target_pos) {
                    exhausted = true;
                    plan.unlinkable.push(path);
                    plan.unlinkable.extend(remaining);
                    break;
                }

                let source = members[source_idx];
                if !charged {
                    charged = true;
                    stats.additional_bytes_saveable +=
                        registry.get(target).expect("target vanished mid-group").stat.size;
                }

                let source_path = registry
                    .get(source)
                    .expect("source vanished mid-group")
                    .paths[0]
                    .clone();
                plan.ops.push(LinkOp {
                    from_path: source_path,
                    to_path: path.clone(),
                    from_inode: source,
                    to_inode: target,
                });

                registry.migrate_path(source, target, &path);
                if let Some(r) = registry.get_mut(source) {
                    r.simulated_nlink += 1;
                }
                if let Some(r) = registry.get_mut(target) {
                    r.simulated_nlink -= 1;
                }
            }
        }

        plan
    }

    /// Ensures `members[source_idx]` has spare `LINK_MAX` capacity,
    /// promoting the member with the most remaining headroom if not.
    /// Returns `false` if no member has any capacity left.
    ///
    /// Candidates at or after `target_pos` are excluded from the
    /// promotion search: they haven't been absorbed into a source yet and
    /// may still become targets themselves later in this loop, so picking
    /// one here would let a not-yet-visited member become its own source
    /// once `migrate_path` later empties and drops its record.
    fn find_capacity(
        &self,
        members: &[InodeId],
        registry: &InodeRegistry,
        source_idx: &mut usize,
        target_pos: usize,
    ) -> bool {
        let current = members[*source_idx];
        let cur_rec = registry.get(current).expect("source vanished");
        if cur_rec.simulated_nlink < self.link_max.get(current.dev) {
            return true;
        }

        let mut best: Option<(usize, u64)> = None;
        for (i, &m) in members.iter().enumerate() {
            if i >= target_pos {
                continue;
            }
            let rec = match registry.get(m) {
                Some(r) => r,
                None => continue,
            };
            let cap = self.link_max.get(m.dev);
            if rec.simulated_nlink < cap {
                let headroom = cap - rec.simulated_nlink;
                if best.map_or(true, |(_, best_headroom)| headroom > best_headroom) {
                    best = Some((i, headroom));
                }
            }
        }

        match best {
            Some((i, _)) => {
                *source_idx = i;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::MatchingPolicy;
    use crate::stat::{InodeId, StatSnapshot, XattrFingerprint};
    use std::path::PathBuf;

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

    fn registry_of(n: usize) -> (InodeRegistry, Vec<InodeId>) {
        let mut registry = InodeRegistry::new();
        let policy = MatchingPolicy::default();
        let mut ids = Vec::new();
        for i in 0..n {
            let id = InodeId::new(1, i as u64 + 1);
            ids.push(id);
            registry.admit(
                PathBuf::from(format!("/f{i}")),
                id,
                stat(),
                XattrFingerprint::absent(),
                &policy,
            );
        }
        (registry, ids)
    }

    #[test]
    fn exhausted_link_max_never_promotes_an_unvisited_member() {
        let (mut registry, ids) = registry_of(4);
        let mut link_max = LinkMaxTable::new();
        link_max.set_for_test(1, 2);
        let planner = LinkPlanner::new(&link_max);
        let mut stats = Stats::default();

        let plan = planner.plan_group(&mut registry, &ids, &mut stats);

        assert!(plan.ops.iter().all(|op| op.from_inode != op.to_inode));
        assert_eq!(plan.ops.len(), 1);
        assert_eq!(plan.unlinkable.len(), 2);
    }

    #[test]
    fn promotion_picks_an_already_absorbed_source_with_headroom() {
        let (mut registry, ids) = registry_of(3);
        let mut link_max = LinkMaxTable::new();
        link_max.set_for_test(1, 10);
        let planner = LinkPlanner::new(&link_max);
        let mut stats = Stats::default();

        let plan = planner.plan_group(&mut registry, &ids, &mut stats);

        assert_eq!(plan.ops.len(), 2);
        assert!(plan.unlinkable.is_empty());
        assert!(plan.ops.iter().all(|op| op.from_inode != op.to_inode));
    }
}
