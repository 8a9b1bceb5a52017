//! User-facing console output.
//! Colored prefixes are used only when the stream is a TTY; rename tables go
//! to stdout so they can be piped, diagnostics go to stderr.

use owo_colors::OwoColorize;
use std::path::Path;

use crate::engine::Step;
use crate::entry::RenamePair;

fn is_tty() -> bool {
    atty::is(atty::Stream::Stdout)
}

fn is_tty_err() -> bool {
    atty::is(atty::Stream::Stderr)
}

pub fn print_info(msg: &str) {
    if is_tty() {
        println!("{} {}", "info:".cyan().bold(), msg);
    } else {
        println!("info: {}", msg);
    }
}

pub fn print_warn(msg: &str) {
    if is_tty_err() {
        eprintln!("{} {}", "warn:".yellow().bold(), msg);
    } else {
        eprintln!("warn: {}", msg);
    }
}

pub fn print_error(msg: &str) {
    if is_tty_err() {
        eprintln!("{} {}", "error:".red().bold(), msg);
    } else {
        eprintln!("error: {}", msg);
    }
}

pub fn print_success(msg: &str) {
    if is_tty() {
        println!("{} {}", "ok:".green().bold(), msg);
    } else {
        println!("ok: {}", msg);
    }
}

/// Plain line without a prefix, for output users may script against.
pub fn print_user(msg: &str) {
    println!("{}", msg);
}

/// Format `old -> new` rows with the left column padded to the widest name.
pub fn format_rows<'a, I>(rows: I) -> Vec<String>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let rows: Vec<(&str, &str)> = rows.into_iter().collect();
    let width = rows.iter().map(|(old, _)| old.chars().count()).max().unwrap_or(0);
    rows.iter()
        .map(|(old, new)| {
            let pad = width - old.chars().count();
            format!("    {old}{} -> {new}", " ".repeat(pad))
        })
        .collect()
}

fn pair_rows(pairs: &[RenamePair]) -> impl Iterator<Item = (&str, &str)> {
    pairs.iter().map(|p| (p.source.name(), p.target.name()))
}

fn step_name(path: &Path) -> &str {
    path.file_name().and_then(|n| n.to_str()).unwrap_or_default()
}

/// Show the planned mapping. Verbose prints every pair; otherwise only counts.
pub fn print_mapping(dir: &Path, included: &[RenamePair], ignored: &[RenamePair], verbose: bool) {
    if verbose {
        print_user(&format!("Directory: {}\n", dir.display()));
        print_user("The following names will be changed:");
        for line in format_rows(pair_rows(included)) {
            print_user(&line);
        }
        if !ignored.is_empty() {
            print_user("The following names are unchanged:");
            for line in format_rows(pair_rows(ignored)) {
                print_user(&line);
            }
        }
    }
    print_user(&format!("{} name(s) will be changed", included.len()));
    print_user(&format!("{} name(s) will be ignored", ignored.len()));
}

/// Report the steps that completed, in execution order.
pub fn print_changes(log: &[Step], verbose: bool) {
    if verbose {
        print_user("Changes performed:");
        for line in format_rows(log.iter().map(|s| (step_name(&s.from), step_name(&s.to)))) {
            print_user(&line);
        }
    }
    print_success(&format!("{} rename step(s) performed", log.len()));
}

/// List steps on stderr, e.g. the completed prefix of a failed run.
pub fn print_steps(title: &str, steps: &[Step]) {
    eprintln!("{title}");
    if steps.is_empty() {
        eprintln!("    (none)");
    }
    for line in format_rows(steps.iter().map(|s| (step_name(&s.from), step_name(&s.to)))) {
        eprintln!("{line}");
    }
}
