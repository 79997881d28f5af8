use clap::{ArgAction, Parser, Subcommand};
use core_runtime::config::DEFAULT_ROOT_DIR;
use core_runtime::logging::LogFormat;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "spotify-fbc", version)]
#[command(about = "Edit Spotify playlists as directories of text files", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Root directory of the playlist tree
    #[arg(long, global = true, default_value = DEFAULT_ROOT_DIR)]
    pub root: PathBuf,

    /// Spotify access token with playlist read/modify scopes
    #[arg(long, global = true, env = "SPOTIFY_ACCESS_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Log output format: pretty, json or compact
    #[arg(long, global = true, default_value = "compact")]
    pub log_format: LogFormat,

    /// Custom tracing filter, e.g. "core_sync=debug"
    #[arg(long, global = true)]
    pub log_filter: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write every remote playlist into the local tree
    Pull,

    /// Make the remote playlists match the local tree
    Push {
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Show what push would change
    #[command(alias = "diff")]
    Compare,

    /// Delete playlist records whose directory was removed
    Clean,
}
