use anyhow::Result;
use hardlinkable::cli;
use hardlinkable::fsdriver::RealLinkExecutor;
use hardlinkable::logging::init_logs;
use hardlinkable::output::{render_json, render_text};
use hardlinkable::walk::FsWalker;
use hardlinkable_core::{run_scan, LinkExecutor};
use indicatif::{ProgressBar, ProgressStyle};
use log::warn;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("hardlinkable: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let args = cli::parse()?;
    init_logs(args.verbosity);

    let track_xattr = !args.policy.content_only && !args.policy.ignore_xattr;
    let walker = FsWalker::new(&args.roots, args.filters, track_xattr);
    let dirs_counter = walker.directories_visited_counter();

    let progress = if args.no_progress {
        None
    } else {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message("scanning...");
        bar.enable_steady_tick(std::time::Duration::from_millis(120));
        Some(bar)
    };

    let mut output = run_scan(walker, &args.policy);
    output.stats.directories_visited = dirs_counter.get();

    if let Some(bar) = &progress {
        bar.finish_and_clear();
    }

    let mut links_performed = 0u64;
    if args.enable_linking {
        let mut exec = RealLinkExecutor;
        for op in &output.plan.ops {
            match exec.link(op) {
                Ok(()) => links_performed += 1,
                Err(e) => warn!("{e}"),
            }
        }
    }

    let rendered = if args.json {
        render_json(&output.stats, &output.plan, links_performed, args.verbosity >= 2)
    } else {
        render_text(
            &output.stats,
            &output.plan,
            links_performed,
            !args.enable_linking,
            args.show_stats,
        )
    };
    print!("{rendered}");

    Ok(ExitCode::SUCCESS)
}
