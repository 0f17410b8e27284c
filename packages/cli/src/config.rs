use anyhow::Context;
use folio_layout::{LayoutOptions, DEFAULT_COLUMNS};
use folio_registry::PluginRegistry;
use folio_renderer::RenderOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "folio.config.json";

/// Folio configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Supported languages
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,

    /// Language used when none is given (defaults to the first language)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_lang: Option<String>,

    /// Grid column count
    #[serde(default = "default_columns")]
    pub columns: u32,

    #[serde(default = "default_true")]
    pub allow_move_in_edit_mode: bool,

    #[serde(default = "default_true")]
    pub allow_resize_in_edit_mode: bool,
}

fn default_languages() -> Vec<String> {
    vec!["en".to_string()]
}

fn default_columns() -> u32 {
    DEFAULT_COLUMNS
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &Path) -> anyhow::Result<Self> {
        let config_path = Self::path_in(cwd);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Invalid config file {}", config_path.display()))?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    pub fn path_in(cwd: &Path) -> PathBuf {
        cwd.join(DEFAULT_CONFIG_NAME)
    }

    pub fn default_lang(&self) -> &str {
        self.default_lang
            .as_deref()
            .or_else(|| self.languages.first().map(String::as_str))
            .unwrap_or("en")
    }

    pub fn layout(&self) -> LayoutOptions {
        LayoutOptions::with_columns(self.columns)
    }

    pub fn render_options(&self, registry: PluginRegistry) -> RenderOptions {
        let mut options = RenderOptions::new(registry)
            .with_languages(self.languages.iter().cloned())
            .with_layout(self.layout());
        options.allow_move_in_edit_mode = self.allow_move_in_edit_mode;
        options.allow_resize_in_edit_mode = self.allow_resize_in_edit_mode;
        options
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            languages: default_languages(),
            default_lang: None,
            columns: DEFAULT_COLUMNS,
            allow_move_in_edit_mode: true,
            allow_resize_in_edit_mode: true,
        }
    }
}
