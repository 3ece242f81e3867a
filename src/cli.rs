use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "obsync")]
#[command(version)]
#[command(about = "Reconcile declared observability configuration against a running instance", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Remote instance URL (overrides config)
    #[arg(long, env = "OBSYNC_URL", global = true)]
    pub url: Option<String>,

    /// API token (overrides config)
    #[arg(long, env = "OBSYNC_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Push declared resources to the remote instance
    Apply(ApplyArgs),

    /// Preview what apply would change
    Diff(DiffArgs),

    /// Summarize declared resources against remote state
    Status(StatusArgs),

    /// Write remote resources back into the local store
    Pull(PullArgs),

    /// Manage context configuration
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show config file location and current values
    Show,

    /// Write a starter config file
    Init {
        /// Remote instance URL
        #[arg(long)]
        url: String,

        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Parser)]
pub struct ApplyArgs {
    /// Only this kind or resource (format: "Kind" or "Kind.name")
    pub target: Option<String>,

    /// Resources directory (overrides config)
    #[arg(short, long)]
    pub dir: Option<PathBuf>,

    /// Show planned actions without pushing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Number of parallel reconciliation jobs
    #[arg(short, long, default_value = "4")]
    pub jobs: usize,
}

#[derive(Parser)]
pub struct DiffArgs {
    /// Only this kind or resource (format: "Kind" or "Kind.name")
    pub target: Option<String>,

    /// Resources directory (overrides config)
    #[arg(short, long)]
    pub dir: Option<PathBuf>,
}

#[derive(Parser)]
pub struct StatusArgs {
    /// Only this kind or resource (format: "Kind" or "Kind.name")
    pub target: Option<String>,

    /// Resources directory (overrides config)
    #[arg(short, long)]
    pub dir: Option<PathBuf>,
}

#[derive(Parser)]
pub struct PullArgs {
    /// Only pull this kind
    #[arg(short, long)]
    pub kind: Option<String>,

    /// Resources directory (overrides config)
    #[arg(short, long)]
    pub dir: Option<PathBuf>,
}
