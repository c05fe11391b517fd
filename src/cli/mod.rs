use std::path::PathBuf;

use clap::{value_parser, ArgAction, Args, Parser, Subcommand, ValueEnum};

/// hostca - SSH host certificate authority management tool
#[derive(Parser, Debug)]
#[command(author, version, about = "hostca - SSH host certificate authority management tool", long_about = None)]
pub struct Cli {
    /// Authority root directory
    #[arg(long, default_value = ".", value_name = "DIR", value_parser = value_parser!(PathBuf))]
    pub root: PathBuf,

    /// Global log level
    #[arg(long, default_value = "info")]
    pub log_level: LogLevel,

    /// Log to file (in addition to stdout)
    #[arg(long, action = ArgAction::SetTrue, default_value_t = false)]
    pub log_file: bool,

    /// Log file path (default: <root>/hostca.log)
    #[arg(long, value_name = "FILE", value_parser = value_parser!(PathBuf))]
    pub log_file_path: Option<PathBuf>,

    /// Suppress non-error logs
    #[arg(long, action = ArgAction::SetTrue, default_value_t = false)]
    pub quiet: bool,

    /// Subcommands
    #[command(subcommand)]
    pub command: Command,
}

/// Log level
#[derive(Copy, Clone, Debug, ValueEnum, Eq, PartialEq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Convert to `tracing::Level`
    pub fn to_level_filter(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Issue a host certificate for one host directory
    Issue(IssueArgs),

    /// Show the certificate inventory across all host directories
    List(ListArgs),

    /// Rebuild the distributable known_hosts files
    KnownHosts,
}

/// Certificate issuance arguments
#[derive(Args, Debug)]
pub struct IssueArgs {
    /// Host directory containing the hostname list and *_key.pub files
    #[arg(required = true, value_name = "HOST_DIR")]
    pub host_dir: PathBuf,

    /// Skip the interactive confirmation gate
    #[arg(short = 'y', long, action = ArgAction::SetTrue)]
    pub yes: bool,
}

/// Inventory report arguments
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Output the report as JSON
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,
}
