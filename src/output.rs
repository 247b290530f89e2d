use std::path::{Path, PathBuf};

use colored::Colorize;

use crate::utils::{display_path, format_size};

pub fn print_banner() {
    println!(
        "{}",
        concat!("tidycache v", env!("CARGO_PKG_VERSION"), " - cache & temp folder cleaner")
            .bold()
            .cyan()
    );
    println!();
}

pub fn print_scan_header(roots: &[PathBuf], max_depth: usize) {
    let depth = if max_depth == 0 {
        "unlimited".to_string()
    } else {
        max_depth.to_string()
    };
    println!("{}", format!("=== Scanning (depth: {depth}) ===").bold().white());
    for root in roots {
        println!("  {}", display_path(root).dimmed());
    }
    println!();
}

pub fn print_candidate(path: &Path, size: u64, keyword: Option<&str>, selected: bool) {
    let mark = if selected { "[x]".green() } else { "[ ]".dimmed() };
    let tag = keyword.map(|k| format!("({k})")).unwrap_or_default();
    println!(
        "  {} {:>10}  {}  {}",
        mark,
        format_size(size).yellow(),
        display_path(path),
        tag.dimmed()
    );
}

pub fn print_found_total(count: usize, total: u64) {
    println!();
    println!(
        "  {} {}",
        format!("Found {count} folders:").bold(),
        format_size(total).green()
    );
}

pub fn print_selection_total(selected: usize, selected_bytes: u64, total: u64) {
    println!(
        "  {} {} [{} / {}]",
        "Selected:".bold(),
        selected,
        format_size(selected_bytes).green(),
        format_size(total)
    );
    println!();
}

pub fn print_warning(msg: &str) {
    eprintln!("{} {}", "Warning:".red().bold(), msg.red());
}

pub fn print_info(msg: &str) {
    println!("{} {}", "Info:".cyan().bold(), msg);
}

pub fn print_dry_run_footer() {
    println!(
        "{}",
        "This was a dry run. Run `tidycache clean --confirm` to delete."
            .yellow()
            .bold()
    );
}

pub fn print_delete_error(path: &Path, err: &str) {
    println!(
        "  {} {}: {}",
        "Failed".red().bold(),
        display_path(path).dimmed(),
        err.red()
    );
}

pub fn print_clean_summary(attempted: usize, failed: usize, freed: u64) {
    let line = format!(
        "Deleted {} of {} folders, {} freed.",
        attempted - failed,
        attempted,
        format_size(freed)
    );
    if failed == 0 {
        println!("{} {}", "Cleaned!".green().bold(), line.green());
    } else {
        println!(
            "{} {} {}",
            "Cleaned with errors.".yellow().bold(),
            line,
            format!("{failed} failed.").red()
        );
    }
}

pub fn print_cancelled(what: &str) {
    println!("{}", format!("{what} cancelled.").yellow().bold());
}

pub fn print_admin_required() {
    eprintln!(
        "{}",
        "Administrator required: this tool needs Administrator privileges to clean AppData folders."
            .red()
            .bold()
    );
    eprintln!("Please run as Administrator and try again.");
}

pub fn print_debug_info(platform: &str, elevated: bool, will_block: bool) {
    println!("{}", "=== Debug Info ===".bold().white());
    println!("  Platform:             {platform}");
    println!("  Elevated:             {elevated}");
    println!("  Requires elevation:   {will_block}");
    println!();
}
