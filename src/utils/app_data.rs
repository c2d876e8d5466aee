use crate::query::options::{Fields, SearchOptions};
use crate::query::scorer::ScoringWeights;
use anyhow::{Context, Result, bail};
use ignore::WalkBuilder;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

const APP_NAME: &str = "docsift";
const CONFIG_FILE: &str = "config.json";

/// File name the documentation generator gives its search index
pub const SEARCH_INDEX_FILE: &str = "search_index.js";

/// Application configuration stored in the config directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Default maximum number of results
    #[serde(default = "default_limit")]
    pub limit: i64,

    /// Fields searched by default
    #[serde(default)]
    pub fields: Fields,

    /// Matches scoring below this are discarded
    #[serde(default)]
    pub min_score: f32,

    /// Character budget for result snippets
    #[serde(default = "default_snippet_width")]
    pub snippet_width: usize,

    /// Per-field scoring weights
    #[serde(default)]
    pub weights: ScoringWeights,

    /// Colorize terminal output
    #[serde(default = "default_color")]
    pub color: bool,
}

fn default_limit() -> i64 {
    10
}

fn default_snippet_width() -> usize {
    crate::output::DEFAULT_SNIPPET_WIDTH
}

fn default_color() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            fields: Fields::default(),
            min_score: 0.0,
            snippet_width: default_snippet_width(),
            weights: ScoringWeights::default(),
            color: default_color(),
        }
    }
}

impl AppConfig {
    /// Load config from the config directory, or return default if not found
    pub fn load() -> Result<Self> {
        let config_path = get_config_path()?;
        Self::load_from(&config_path)
    }

    /// Load config from an explicit path, or return default if it does not exist
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = fs::read_to_string(config_path)
                .with_context(|| format!("Failed to read config file {}", config_path.display()))?;
            let config: AppConfig = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file {}", config_path.display()))?;
            tracing::debug!(path = %config_path.display(), "loaded config");
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to the config directory
    pub fn save(&self) -> Result<PathBuf> {
        let config_path = get_config_path()?;
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    /// Save config to an explicit path
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)
            .context("Failed to serialize config")?;
        fs::write(config_path, content)
            .context("Failed to write config file")?;
        Ok(())
    }

    /// Search options derived from the configured defaults
    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            limit: self.limit,
            fields: self.fields,
            min_score: self.min_score,
            categories: None,
        }
    }
}

/// Get the path to the config file
pub fn get_config_path() -> Result<PathBuf> {
    let base = dirs::config_dir().context("Could not determine config directory")?;
    Ok(base.join(APP_NAME).join(CONFIG_FILE))
}

/// Resolve a user-supplied path to a search index file.
///
/// A file is returned as is. A directory (typically a documentation build
/// output) is walked for `search_index.js`; when several versions are
/// present, the most recently modified one wins, ties broken by path order.
pub fn find_search_index(path: &Path) -> Result<PathBuf> {
    if path.is_file() {
        return Ok(path.to_path_buf());
    }
    if !path.is_dir() {
        bail!("No such file or directory: {}", path.display());
    }

    let mut best: Option<(SystemTime, PathBuf)> = None;

    // Build directories are usually git-ignored, so skip ignore-file filtering
    let walker = WalkBuilder::new(path).standard_filters(false).build();
    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                tracing::warn!("skipping unreadable path: {}", err);
                continue;
            }
        };

        if entry.file_name() != SEARCH_INDEX_FILE {
            continue;
        }
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        let mtime = entry
            .metadata()
            .ok()
            .and_then(|m| m.modified().ok())
            .unwrap_or(SystemTime::UNIX_EPOCH);
        let candidate = entry.into_path();

        let replace = match &best {
            None => true,
            Some((best_mtime, best_path)) => {
                mtime > *best_mtime || (mtime == *best_mtime && candidate < *best_path)
            }
        };
        if replace {
            best = Some((mtime, candidate));
        }
    }

    match best {
        Some((_, found)) => {
            tracing::debug!(path = %found.display(), "discovered search index");
            Ok(found)
        }
        None => bail!(
            "No {} found under {}",
            SEARCH_INDEX_FILE,
            path.display()
        ),
    }
}
