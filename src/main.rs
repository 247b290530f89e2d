use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tidycache::app::App;
use tidycache::cli::{Cli, Command, ScanArgs};
use tidycache::{output, privilege, roots, utils};
use tidycache::{Config, DeletionOutcome, DirectoryClassifier, ScanEngine, ScanRequest};

fn init_logging(verbose: bool) {
    let default = if verbose { "tidycache=debug" } else { "tidycache=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// CLI flags win over the config file, which wins over platform defaults.
fn build_request(args: &ScanArgs, config: &Config) -> ScanRequest {
    let max_depth = args.depth.unwrap_or(config.max_depth);
    let roots: Vec<PathBuf> = if !args.roots.is_empty() {
        args.roots.clone()
    } else if let Some(roots) = &config.roots {
        roots.clone()
    } else {
        roots::default_roots()
    };
    ScanRequest::new(roots, max_depth)
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

fn print_results(app: &App, classifier: &DirectoryClassifier) {
    let store = app.store();
    for candidate in store.sorted_by_size() {
        let name = candidate
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        output::print_candidate(
            &candidate.path,
            candidate.size_bytes,
            classifier.matched_keyword(&name),
            store.is_selected(&candidate.path),
        );
    }
    output::print_found_total(store.len(), store.total_bytes());
}

fn run_scan(app: &mut App, request: ScanRequest, json: bool) -> Result<()> {
    if !json {
        output::print_scan_header(request.roots(), request.max_depth());
    }
    let summary = app.scan(request).context("scan failed")?;

    if json {
        let sorted = app.store().sorted_by_size();
        println!("{}", serde_json::to_string_pretty(&sorted)?);
        return Ok(());
    }

    print_results(app, &DirectoryClassifier::default());
    if summary.cancelled {
        output::print_cancelled("Scan");
    }
    Ok(())
}

fn run_clean(
    app: &mut App,
    request: ScanRequest,
    confirm_delete: bool,
    yes: bool,
    min_size: Option<&str>,
    rescan: bool,
) -> Result<()> {
    let min_bytes = match min_size {
        Some(s) => utils::parse_size(s).map_err(anyhow::Error::msg)?,
        None => 0,
    };

    output::print_scan_header(request.roots(), request.max_depth());
    let summary = app.scan(request.clone()).context("scan failed")?;
    if summary.cancelled {
        output::print_cancelled("Scan");
        return Ok(());
    }

    app.store_mut().select_where(|c| c.size_bytes >= min_bytes);
    print_results(app, &DirectoryClassifier::default());
    let store = app.store();
    output::print_selection_total(store.selected_count(), store.selected_bytes(), store.total_bytes());

    if store.selected_count() == 0 {
        output::print_info("Nothing selected.");
        return Ok(());
    }
    if !confirm_delete {
        output::print_dry_run_footer();
        return Ok(());
    }
    let prompt = format!(
        "This will permanently delete {} folders. Continue?",
        store.selected_count()
    );
    if !yes && !confirm(&prompt)? {
        output::print_info("Aborted.");
        return Ok(());
    }

    let report = app.clean_selected().context("deletion failed")?;
    for result in &report.results {
        if let DeletionOutcome::Failed(reason) = &result.outcome {
            output::print_delete_error(&result.path, &reason.to_string());
        }
    }
    output::print_clean_summary(report.results.len(), report.failed(), report.bytes_freed);
    if report.cancelled {
        output::print_cancelled("Deletion");
        return Ok(());
    }

    if rescan {
        println!();
        output::print_info("Rescanning...");
        let summary = app.scan(request).context("rescan failed")?;
        output::print_found_total(summary.total as usize, app.store().total_bytes());
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.debug {
        output::print_debug_info(
            std::env::consts::OS,
            privilege::is_elevated(),
            privilege::missing_required_elevation(),
        );
    }
    if privilege::missing_required_elevation() && !cli.skip_admin_check {
        output::print_admin_required();
        std::process::exit(1);
    }

    let config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;

    let json = matches!(cli.command, Command::Scan { json: true, .. });
    let mut app = App::new(ScanEngine::new(DirectoryClassifier::default()), !json);
    let interrupt = app.interrupt();
    ctrlc::set_handler(move || {
        if !interrupt.trigger() {
            std::process::exit(130);
        }
    })
    .context("failed to install Ctrl-C handler")?;

    if !json {
        output::print_banner();
    }

    match cli.command {
        Command::Scan { scan, json } => run_scan(&mut app, build_request(&scan, &config), json),
        Command::Clean {
            scan,
            confirm,
            yes,
            min_size,
            no_rescan,
        } => {
            let request = build_request(&scan, &config);
            if request.roots().is_empty() {
                output::print_warning("No scan roots found.");
                return Ok(());
            }
            run_clean(
                &mut app,
                request,
                confirm,
                yes,
                min_size.as_deref(),
                config.rescan_after_delete && !no_rescan,
            )
        }
    }
}
