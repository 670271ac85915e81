//! Command-line interface definition.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Bookmark launcher dashboard with an offline favicon cache.
#[derive(Debug, Parser)]
#[command(name = "keydash", version)]
pub struct Cli {
    /// Bookmarks file (TOML) rendered by the dashboard.
    #[arg(long, default_value = "bookmarks.toml")]
    pub bookmarks: PathBuf,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Render the dashboard with resolved icons (default).
    Dash,
    /// Walk the icon candidates for a domain and report the winner.
    Probe {
        /// Domain to probe, e.g. example.com
        domain: String,
    },
    /// Remove every cached icon entry.
    Clear,
}
