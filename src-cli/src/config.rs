use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use linemark_core::services::CodeViewOptions;
use linemark_core::services::code_view::{CODE_VIEW_OVERSCAN, SLOW_LOADING_LINE_COUNT};
use row_host::{DEFAULT_ESTIMATED_ROW_HEIGHT, DEFAULT_OVERSCAN, RowHostConfig};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    #[serde(default)]
    pub rows: RowsConfig,
    #[serde(default)]
    pub code_view: CodeViewConfig,
}

/// [rows] section: generic lists (file tree, diff rows)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowsConfig {
    #[serde(default = "default_estimated_row_height")]
    pub estimated_row_height: f64,
    #[serde(default = "default_overscan")]
    pub overscan: usize,
}

/// [code_view] section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeViewConfig {
    #[serde(default = "default_slow_loading_line_count")]
    pub slow_loading_line_count: usize,
    #[serde(default = "default_code_view_overscan")]
    pub overscan: usize,
    #[serde(default)]
    pub allow_slow_pages: bool,
}

fn default_estimated_row_height() -> f64 {
    DEFAULT_ESTIMATED_ROW_HEIGHT
}

fn default_overscan() -> usize {
    DEFAULT_OVERSCAN
}

fn default_slow_loading_line_count() -> usize {
    SLOW_LOADING_LINE_COUNT
}

fn default_code_view_overscan() -> usize {
    CODE_VIEW_OVERSCAN
}

impl Default for RowsConfig {
    fn default() -> Self {
        Self {
            estimated_row_height: default_estimated_row_height(),
            overscan: default_overscan(),
        }
    }
}

impl Default for CodeViewConfig {
    fn default() -> Self {
        Self {
            slow_loading_line_count: default_slow_loading_line_count(),
            overscan: default_code_view_overscan(),
            allow_slow_pages: false,
        }
    }
}

impl ViewerConfig {
    pub fn row_host_config(&self) -> RowHostConfig {
        RowHostConfig::default()
            .with_estimated_row_height(self.rows.estimated_row_height)
            .with_overscan(self.rows.overscan)
    }

    /// Code lines share the row estimate but mount more rows around the viewport.
    pub fn code_row_host_config(&self) -> RowHostConfig {
        self.row_host_config().with_overscan(self.code_view.overscan)
    }

    pub fn code_view_options(&self) -> CodeViewOptions {
        CodeViewOptions {
            slow_loading_line_count: self.code_view.slow_loading_line_count,
            allow_slow_pages: self.code_view.allow_slow_pages,
        }
    }
}

/// `~/.config/linemark/config.toml` (platform equivalent).
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("linemark").join("config.toml"))
}

pub fn parse_config(content: &str) -> Result<ViewerConfig> {
    toml::from_str(content).context("invalid viewer config")
}

/// Load config from `explicit` if given, else from the default location.
/// Priority: `--config` file > global config file > built-in defaults.
/// A missing `--config` file is an error; a missing global file is not.
pub fn load_config(explicit: Option<&Path>) -> Result<ViewerConfig> {
    if let Some(path) = explicit {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        return parse_config(&content);
    }

    let Some(path) = default_config_path() else {
        return Ok(ViewerConfig::default());
    };
    match std::fs::read_to_string(&path) {
        Ok(content) => {
            log::debug!("using config {}", path.display());
            parse_config(&content)
        }
        Err(_) => Ok(ViewerConfig::default()),
    }
}
