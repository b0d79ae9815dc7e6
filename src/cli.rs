//! Command-line surface, built with the `clap` builder API the same way
//! the original `main.rs` did (`command!()` + `arg!`), extended with
//! `Arg::new` where a flag needs behavior `arg!` can't express (repeated
//! `-v`, multi-valued `--match`/`--exclude`).

use crate::size::parse_size;
use crate::walk::NameFilters;
use anyhow::{anyhow, Result};
use clap::{arg, command, Arg, ArgAction};
use regex::Regex;
use std::path::PathBuf;

pub struct Args {
    pub roots: Vec<PathBuf>,
    pub enable_linking: bool,
    pub show_stats: bool,
    pub verbosity: u8,
    pub no_progress: bool,
    pub json: bool,
    pub filters: NameFilters,
    pub policy: hardlinkable_core::MatchingPolicy,
}

pub fn parse() -> Result<Args> {
    let matches = command!()
        .arg(
            arg!([roots] ... "Directories to scan")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(arg!(--"enable-linking" "Actually perform the hardlinks (default is dry-run)").action(ArgAction::SetTrue))
        .arg(arg!(-q --"no-stats" "Suppress the summary statistics block").action(ArgAction::SetTrue))
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Increase log verbosity (repeatable up to 3 times)")
                .action(ArgAction::Count),
        )
        .arg(arg!(--"no-progress" "Disable the progress bar").action(ArgAction::SetTrue))
        .arg(arg!(--json "Emit machine-readable JSON instead of text").action(ArgAction::SetTrue))
        .arg(arg!(-f --"same-name" "Require matching basenames before linking").action(ArgAction::SetTrue))
        .arg(arg!(-p --"ignore-perms" "Ignore permission/ownership differences").action(ArgAction::SetTrue))
        .arg(arg!(-t --"ignore-time" "Ignore modification-time differences").action(ArgAction::SetTrue))
        .arg(arg!(--"ignore-xattr" "Ignore extended-attribute differences").action(ArgAction::SetTrue))
        .arg(arg!(-c --"content-only" "Only compare file content, ignoring all metadata").action(ArgAction::SetTrue))
        .arg(arg!(-s --"min-size" <SIZE> "Skip files smaller than SIZE").required(false))
        .arg(arg!(-S --"max-size" <SIZE> "Skip files larger than SIZE").required(false))
        .arg(
            Arg::new("match")
                .short('m')
                .long("match")
                .help("Only consider files whose basename matches this regex (repeatable)")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("exclude")
                .short('x')
                .long("exclude")
                .help("Skip files or directories whose basename matches this regex (repeatable)")
                .action(ArgAction::Append),
        )
        .get_matches();

    let roots: Vec<PathBuf> = matches
        .get_many::<PathBuf>("roots")
        .ok_or_else(|| anyhow!("at least one directory is required"))?
        .cloned()
        .collect();

    let min_size = match matches.get_one::<String>("min-size") {
        Some(raw) => parse_size(raw)?,
        None => 1,
    };
    let max_size = match matches.get_one::<String>("max-size") {
        Some(raw) => Some(parse_size(raw)?),
        None => None,
    };

    let include = compile_patterns(matches.get_many::<String>("match"))?;
    let exclude = compile_patterns(matches.get_many::<String>("exclude"))?;

    let policy = hardlinkable_core::MatchingPolicy {
        require_same_name: matches.get_flag("same-name"),
        ignore_perms: matches.get_flag("ignore-perms"),
        ignore_time: matches.get_flag("ignore-time"),
        ignore_xattr: matches.get_flag("ignore-xattr"),
        content_only: matches.get_flag("content-only"),
        min_size,
        max_size,
    };

    Ok(Args {
        roots,
        enable_linking: matches.get_flag("enable-linking"),
        show_stats: !matches.get_flag("no-stats"),
        verbosity: *matches.get_one::<u8>("verbose").unwrap_or(&0),
        no_progress: matches.get_flag("no-progress"),
        json: matches.get_flag("json"),
        filters: NameFilters { include, exclude },
        policy,
    })
}

fn compile_patterns(raw: Option<clap::parser::ValuesRef<'_, String>>) -> Result<Vec<Regex>> {
    match raw {
        None => Ok(Vec::new()),
        Some(values) => values
            .map(|s| Regex::new(s).map_err(|e| anyhow!("invalid regex `{s}`: {e}")))
            .collect(),
    }
}
