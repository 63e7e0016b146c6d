//! Clap derive structures for the `homepilot` CLI.

use clap::{Args, Parser, Subcommand, ValueEnum};

use homepilot_core::Characteristic;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// homepilot -- control Rademacher blinds through a Homepilot hub
#[derive(Debug, Parser)]
#[command(
    name = "homepilot",
    version,
    about = "Control Homepilot blinds from the command line",
    long_about = "Discovers window-covering actuators on a Rademacher Homepilot hub,\n\
        reads their position and obstruction state, and moves them.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Hub base URL (overrides the config file)
    #[arg(long, short = 'u', env = "HOMEPILOT_URL", global = true)]
    pub url: Option<String>,

    /// Present positions inverted (100 - hub value)
    #[arg(long, short = 'i', global = true)]
    pub inverted: bool,

    /// Request timeout in seconds
    #[arg(long, env = "HOMEPILOT_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(long, short = 'o', default_value = "table", global = true)]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// Plain text, one value per line (scripting)
    Plain,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the blinds found on the hub
    #[command(alias = "ls")]
    Discover,

    /// Read one characteristic of a blind
    Get(GetArgs),

    /// Move a blind to a position
    Set(SetArgs),

    /// Inspect or create the configuration file
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct GetArgs {
    /// Hub device id
    pub did: String,

    /// Characteristic to read
    #[arg(default_value = "current-position")]
    pub characteristic: Characteristic,
}

#[derive(Debug, Args)]
pub struct SetArgs {
    /// Hub device id
    pub did: String,

    /// Target position, 0-100
    #[arg(allow_negative_numbers = true)]
    pub position: i64,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file path
    Path,

    /// Show the effective configuration
    Show,

    /// Write a config file
    Init(InitArgs),
}

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,

    /// Unregister accessories whose device vanished from the hub
    #[arg(long)]
    pub prune_missing: bool,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    pub shell: clap_complete::Shell,
}
