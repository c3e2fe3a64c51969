//! `config` subcommand — show current configuration and file path.

use std::path::Path;

use iconpanel_lib::PanelError;

use super::{Config, ConfigOutput, Result, kv, kv_indent, kv_width};

/// Write the default configuration to `custom_path` or the platform path.
///
/// An existing file is left untouched unless `force` is set.
pub(super) fn cmd_config_init(custom_path: Option<&Path>, force: bool) -> Result<()> {
    let Some(path) = custom_path.map(|p| p.to_path_buf()).or_else(Config::path) else {
        return Err(PanelError::Config("no config directory".into()));
    };
    if path.exists() && !force {
        return Err(PanelError::Config(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    Config::default().save_to(&path)?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

pub(super) fn cmd_config(json: bool, custom_path: Option<&Path>) -> Result<()> {
    let config = super::load_config(custom_path);
    let config_path = custom_path.map(|p| p.to_path_buf()).or_else(Config::path);
    let config_exists = config_path.as_ref().is_some_and(|p| p.exists());

    if json {
        let output = ConfigOutput {
            config_file: config_path.as_ref().map(|p| p.display().to_string()),
            config_file_exists: config_exists,
            settings: config,
        };
        let text = serde_json::to_string_pretty(&output).map_err(std::io::Error::other)?;
        println!("{text}");
        return Ok(());
    }

    // Human-readable output
    let w = kv_width(
        &["Config file:"],
        &[
            "toggle_delay_ms:",
            "random_delay_ms:",
            "seed:",
            "show_icons:",
        ],
    );

    match &config_path {
        Some(p) => {
            if config_exists {
                kv("Config file:", format_args!("{} (loaded)", p.display()), w);
            } else {
                kv(
                    "Config file:",
                    format_args!("{} (not found, using defaults)", p.display()),
                    w,
                );
            }
        }
        None => kv("Config file:", "(no config directory)", w),
    }
    println!();

    println!("Settings:");
    kv_indent("toggle_delay_ms:", config.toggle_delay_ms, w);
    kv_indent("random_delay_ms:", config.random_delay_ms, w);
    match config.seed {
        Some(s) => kv_indent("seed:", s, w),
        None => kv_indent("seed:", "(random)", w),
    }
    kv_indent("show_icons:", config.show_icons, w);

    let problems = config.validate();
    if !problems.is_empty() {
        println!();
        println!("Problems:");
        for p in &problems {
            println!("  {p}");
        }
    }
    Ok(())
}
