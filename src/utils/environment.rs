use std::path::PathBuf;

use anyhow::{Context, Result};

/// Directory name used under the platform config and cache roots
pub const APP_DIR_NAME: &str = "snapshot-timeline";

pub const CONFIG_FILE_NAME: &str = "config.json";

pub const TUI_LOG_FILE_NAME: &str = "tui.log";

/// `{config_dir}/snapshot-timeline`
pub fn app_config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .context("Could not determine the user config directory")
}

/// `{config_dir}/snapshot-timeline/config.json`
pub fn default_config_path() -> Result<PathBuf> {
    Ok(app_config_dir()?.join(CONFIG_FILE_NAME))
}

/// `{cache_dir}/snapshot-timeline/tui.log`
pub fn tui_log_path() -> Result<PathBuf> {
    dirs::cache_dir()
        .map(|dir| dir.join(APP_DIR_NAME).join(TUI_LOG_FILE_NAME))
        .context("Could not determine the user cache directory")
}
