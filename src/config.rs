use std::path::{Path, PathBuf};

use color_eyre::{Result, eyre::Context};
use serde::Deserialize;

const DEFAULT_CONFIG: &str = r#"# playlist-sync configuration
#
# Every key is optional; command-line flags take precedence.

# Directory holding the music library.
# source = "~/Music"

# Directory to mirror the playlist into, e.g. a mounted player.
# dest = "/media/player/Music"

# Rewrite file and directory names to lowercase ASCII-friendly form.
# normalize_names = false

# Never delete files from the destination.
# no_delete = false
"#;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    dest: Option<String>,
    #[serde(default)]
    pub normalize_names: bool,
    #[serde(default)]
    pub no_delete: bool,
}

impl Config {
    /// Load config from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Get the default config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|path| path.join("playlist-sync").join("config.toml"))
    }

    /// Load the default config file, or fall back to an empty config if there is none
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => {
                log::debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Write a commented default config file, unless one already exists
    pub fn create_default() -> Result<PathBuf> {
        let path = Self::config_path()
            .ok_or_else(|| color_eyre::eyre::eyre!("Could not determine config directory"))?;

        if path.exists() {
            log::info!("Config file already exists at: {}", path.display());
            return Ok(path);
        }

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        std::fs::write(&path, DEFAULT_CONFIG)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(path)
    }

    /// Expand ~ to home directory
    fn expand_path(path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix("~/")
            && let Some(home) = dirs::home_dir()
        {
            return home.join(rest);
        }
        PathBuf::from(path)
    }

    /// Get expanded source directory
    pub fn source_path(&self) -> Option<PathBuf> {
        self.source.as_deref().map(Self::expand_path)
    }

    /// Get expanded destination directory
    pub fn dest_path(&self) -> Option<PathBuf> {
        self.dest.as_deref().map(Self::expand_path)
    }
}
