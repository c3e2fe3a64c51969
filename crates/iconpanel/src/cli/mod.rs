//! CLI subcommands — run the panel, inspect routing, show configuration.

mod config_cmd;
mod route;
mod run;

use std::path::Path;

use clap::Subcommand;
use serde::Serialize;

pub(super) use crate::RUNNING;
pub(super) use crate::panel::TerminalPanel;
pub(super) use iconpanel_lib::config::Config;
pub(super) use iconpanel_lib::error::Result;

const PADDING: usize = 2;

/// Compute alignment width for a command's key-value output.
/// Ensures at least PADDING spaces after the longest key in either level,
/// with top-level and indent values aligned to the same column.
pub(super) fn kv_width(top: &[&str], indent: &[&str]) -> usize {
    let top_max = top.iter().map(|k| k.len()).max().unwrap_or(0);
    let indent_max = indent.iter().map(|k| k.len()).max().unwrap_or(0);
    let top_need = if top.is_empty() { 0 } else { top_max + PADDING };
    // Indent keys lose 2 chars of inner width to the "  " prefix
    let indent_need = if indent.is_empty() {
        0
    } else {
        indent_max + PADDING + 2
    };
    top_need.max(indent_need)
}

pub(super) fn format_kv(key: &str, value: impl std::fmt::Display, w: usize) -> String {
    format!("{key:<width$}{value}", width = w)
}

pub(super) fn kv(key: &str, value: impl std::fmt::Display, w: usize) {
    println!("{}", format_kv(key, value, w));
}

pub(super) fn kv_indent(key: &str, value: impl std::fmt::Display, w: usize) {
    println!("  {}", format_kv(key, value, w - 2));
}

/// Load config from `custom_path` if given, else the platform default.
/// Parse problems are logged and defaults used.
pub(super) fn load_config(custom_path: Option<&Path>) -> Config {
    match custom_path {
        Some(path) => {
            let (config, warnings) = Config::load_from(path);
            for w in &warnings {
                log::warn!("{w}");
            }
            config
        }
        None => Config::load(),
    }
}

// ── JSON output structs ──

#[derive(Serialize)]
pub(super) struct ConfigOutput {
    pub config_file: Option<String>,
    pub config_file_exists: bool,
    pub settings: Config,
}

#[derive(Serialize)]
pub(super) struct RouteOutput {
    pub code: i32,
    pub routine: String,
}

#[derive(Subcommand)]
pub enum Command {
    /// Register the dispatcher on a terminal panel and feed it event codes
    Run {
        /// Comma-separated event codes to press, instead of reading stdin
        #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
        events: Option<Vec<i32>>,
        /// Skip all pacing delays
        #[arg(long)]
        fast: bool,
        /// Seed for the random routine (overrides config)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Show which routine an event code selects
    Route {
        /// Event code (any integer)
        #[arg(allow_negative_numbers = true)]
        code: i32,
    },

    /// Show current configuration and file path
    Config {
        /// Write the default configuration to the config file
        #[arg(long)]
        init: bool,
        /// With --init, replace an existing config file
        #[arg(long, requires = "init")]
        force: bool,
    },
}

/// Warn if `--json` was passed to a command that doesn't support it.
fn warn_json_unsupported(cmd_name: &str) {
    log::warn!("--json is not supported for `{cmd_name}` (ignored)");
}

pub fn run(cmd: Command, json: bool, config_path: Option<&Path>) -> Result<()> {
    match cmd {
        Command::Run { events, fast, seed } => {
            if json {
                warn_json_unsupported("run");
            }
            let config = load_config(config_path);
            run::cmd_run(&config, events, fast, seed)
        }
        Command::Route { code } => route::cmd_route(code, json),
        Command::Config { init: true, force } => {
            if json {
                warn_json_unsupported("config --init");
            }
            config_cmd::cmd_config_init(config_path, force)
        }
        Command::Config { init: false, .. } => config_cmd::cmd_config(json, config_path),
    }
}
