//! Result rendering: a human-readable text block by default, or a
//! `serde_json`-backed schema under `--json` (§4.6's counters plus the
//! `linkable_pairs` list).

use hardlinkable_core::{LinkPlan, Stats};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Serialize)]
pub struct PairOut {
    pub from: PathBuf,
    pub to: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct ReportJson {
    pub directories_visited: u64,
    pub files_visited: u64,
    pub inodes_admitted: u64,
    pub comparisons: u64,
    pub hashes_computed: u64,
    pub current_hardlinked_bytes: u64,
    pub additional_bytes_saveable: u64,
    pub total_bytes_saveable: u64,
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
    pub links_planned: u64,
    pub links_performed: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkable_pairs: Option<Vec<PairOut>>,
}

impl ReportJson {
    pub fn build(stats: &Stats, plan: &LinkPlan, links_performed: u64, include_pairs: bool) -> Self {
        Self {
            directories_visited: stats.directories_visited,
            files_visited: stats.files_visited,
            inodes_admitted: stats.inodes_admitted,
            comparisons: stats.comparisons,
            hashes_computed: stats.hashes_computed,
            current_hardlinked_bytes: stats.current_hardlinked_bytes,
            additional_bytes_saveable: stats.additional_bytes_saveable,
            total_bytes_saveable: stats.total_bytes_saveable(),
            too_small: stats.too_small,
            too_large: stats.too_large,
            non_regular_skipped: stats.non_regular_skipped,
            unequal_file_times: stats.unequal_file_times,
            unequal_modes: stats.unequal_modes,
            unequal_ownership: stats.unequal_ownership,
            unequal_xattr: stats.unequal_xattr,
            unequal_names: stats.unequal_names,
            content_mismatches: stats.content_mismatches,
            indeterminate_comparisons: stats.indeterminate_comparisons,
            remaining_unlinkable: stats.remaining_unlinkable,
            links_planned: plan.ops.len() as u64,
            links_performed,
            linkable_pairs: include_pairs.then(|| {
                plan.ops
                    .iter()
                    .map(|op| PairOut {
                        from: op.from_path.clone(),
                        to: op.to_path.clone(),
                    })
                    .collect()
            }),
        }
    }
}

pub fn render_json(stats: &Stats, plan: &LinkPlan, links_performed: u64, include_pairs: bool) -> String {
    let report = ReportJson::build(stats, plan, links_performed, include_pairs);
    serde_json::to_string_pretty(&report).expect("ReportJson is always serializable")
}

/// Human-readable rendering used by default. `show_stats = false`
/// (`--no-stats`/`-q`) suppresses everything but the plan summary line.
pub fn render_text(stats: &Stats, plan: &LinkPlan, links_performed: u64, dry_run: bool, show_stats: bool) -> String {
    use std::fmt::Write;
    let mut out = String::new();

    if dry_run {
        let _ = writeln!(out, "{} link(s) would be created (dry run)", plan.ops.len());
    } else {
        let _ = writeln!(out, "{} link(s) created", links_performed);
    }

    if !show_stats {
        return out;
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Directories visited:       {}", stats.directories_visited);
    let _ = writeln!(out, "Files visited:              {}", stats.files_visited);
    let _ = writeln!(out, "Inodes admitted:            {}", stats.inodes_admitted);
    let _ = writeln!(out, "Comparisons performed:       {}", stats.comparisons);
    let _ = writeln!(out, "Content hashes computed:     {}", stats.hashes_computed);
    let _ = writeln!(out);
    let _ = writeln!(out, "Already hardlinked bytes:   {}", stats.current_hardlinked_bytes);
    let _ = writeln!(out, "Additional bytes saveable:  {}", stats.additional_bytes_saveable);
    let _ = writeln!(out, "Total bytes saveable:       {}", stats.total_bytes_saveable());
    let _ = writeln!(out);
    let _ = writeln!(out, "Skipped (too small):         {}", stats.too_small);
    let _ = writeln!(out, "Skipped (too large):         {}", stats.too_large);
    let _ = writeln!(out, "Skipped (non-regular):       {}", stats.non_regular_skipped);
    let _ = writeln!(out, "Rejected (time):             {}", stats.unequal_file_times);
    let _ = writeln!(out, "Rejected (mode):             {}", stats.unequal_modes);
    let _ = writeln!(out, "Rejected (ownership):        {}", stats.unequal_ownership);
    let _ = writeln!(out, "Rejected (xattr):            {}", stats.unequal_xattr);
    let _ = writeln!(out, "Rejected (name):             {}", stats.unequal_names);
    let _ = writeln!(out, "Content mismatches:          {}", stats.content_mismatches);
    let _ = writeln!(out, "Indeterminate comparisons:   {}", stats.indeterminate_comparisons);
    let _ = writeln!(out, "Remaining unlinkable inodes: {}", stats.remaining_unlinkable);

    out
}
