//! CLI argument definitions for the handoff binary.
//!
//! Uses `clap` with derive macros. Priority resolution for shared settings:
//! CLI args > env vars > config file > defaults.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Deferred action handoff between a voice agent and the ordering app.
#[derive(Parser, Debug)]
#[command(name = "handoff", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the shared store database.
    #[arg(short = 'd', long = "data-dir", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Leave a pending action for the application (agent side).
    Submit {
        #[command(subcommand)]
        action: SubmitAction,
    },
    /// List pending actions without consuming them.
    Pending {
        /// Print entries as JSON lines.
        #[arg(long)]
        json: bool,
    },
    /// Signal that the application finished launching and route what is pending.
    Ready,
    /// Run an application session, reading lifecycle events from stdin.
    ///
    /// Accepts one event per line: `ready`, `foreground`, or `exit`.
    Run,
}

#[derive(Subcommand, Debug)]
pub enum SubmitAction {
    /// Order a food item from a restaurant.
    Order {
        #[arg(long = "food-item")]
        food_item: String,
        #[arg(long)]
        restaurant: String,
        #[arg(long, default_value_t = 1)]
        quantity: u32,
    },
    /// Search for food.
    Search { query: String },
    /// Reorder the last order.
    Reorder,
    /// Check the status of the current order.
    CheckStatus,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > HANDOFF_CONFIG env var > ~/.handoff/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("HANDOFF_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the data directory.
    ///
    /// Priority: --data-dir flag > HANDOFF_DATA_DIR env var > config file value.
    pub fn resolve_data_dir(&self, config_data_dir: &str) -> PathBuf {
        if let Some(ref p) = self.data_dir {
            return p.clone();
        }
        if let Ok(p) = std::env::var("HANDOFF_DATA_DIR") {
            return PathBuf::from(p);
        }
        expand_home(config_data_dir)
    }

    /// Resolve the log filter.
    ///
    /// Priority: --log-level flag > config file value. `RUST_LOG` overrides both
    /// when the subscriber is built.
    pub fn resolve_log_level(&self, config_log_level: &str) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| config_log_level.to_string())
    }
}

fn home_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    let home = std::env::var("USERPROFILE");
    #[cfg(not(target_os = "windows"))]
    let home = std::env::var("HOME");
    home.ok().map(PathBuf::from)
}

fn default_config_path() -> PathBuf {
    match home_dir() {
        Some(home) => home.join(".handoff").join("config.toml"),
        None => PathBuf::from("config.toml"),
    }
}

/// Expand a leading `~/` to the user's home directory.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(rest)
    } else {
        PathBuf::from(path)
    }
}
