use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "tidycache",
    about = "Find and remove cache, temp and crash-dump folders in your profile",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log engine activity to stderr
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Print platform and privilege information before running
    #[arg(long, global = true)]
    pub debug: bool,

    /// Run even without administrator rights on Windows
    #[arg(long, global = true)]
    pub skip_admin_check: bool,

    /// Config file (default: <config dir>/tidycache/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ScanArgs {
    /// Levels below each root to descend into; 0 means unlimited
    #[arg(long, env = "TIDYCACHE_DEPTH")]
    pub depth: Option<usize>,

    /// Root directory to scan (repeatable). Replaces the profile defaults.
    #[arg(long = "root", value_name = "PATH")]
    pub roots: Vec<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List disposable folders (no deletion)
    Scan {
        #[command(flatten)]
        scan: ScanArgs,

        /// Print candidates as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete disposable folders (requires --confirm to actually delete)
    Clean {
        #[command(flatten)]
        scan: ScanArgs,

        /// Actually delete. Without this flag, behaves like scan.
        #[arg(long)]
        confirm: bool,

        /// Skip the interactive confirmation
        #[arg(long, short)]
        yes: bool,

        /// Only select folders at least this large (e.g. "10MB", "1GiB")
        #[arg(long)]
        min_size: Option<String>,

        /// Do not scan again after deleting
        #[arg(long)]
        no_rescan: bool,
    },
}
