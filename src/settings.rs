//! Command line tool settings with persistence
//!
//! Settings are read from `~/.config/scenebake/settings.toml` unless a path is
//! given on the command line.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Context;
use scenebake_assets::LoaderOptions;
use serde::{Deserialize, Serialize};
use tracing::{info, warn, Level};

/// All tool settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Model loaded when none is given on the command line
    pub model: Option<PathBuf>,
    /// Animation files loaded after the model
    pub animations: Vec<PathBuf>,
    /// Frame sampled after loading
    pub sample_frame: Option<f32>,
    /// Maximum log level (error, warn, info, debug, trace)
    pub log_level: String,
    pub loader: LoaderOptions,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model: None,
            animations: Vec::new(),
            sample_frame: None,
            log_level: "info".into(),
            loader: LoaderOptions::default(),
        }
    }
}

/// Where the settings came from, reported once logging is running
#[derive(Debug)]
pub enum SettingsOrigin {
    Defaults,
    File(PathBuf),
    Fallback(PathBuf, anyhow::Error),
}

impl SettingsOrigin {
    pub fn log(&self) {
        match self {
            SettingsOrigin::Defaults => info!("No settings file found, using defaults"),
            SettingsOrigin::File(path) => info!("Loaded settings from {:?}", path),
            SettingsOrigin::Fallback(path, e) => {
                warn!("Failed to load settings from {:?}: {:#}, using defaults", path, e)
            }
        }
    }
}

impl Settings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("scenebake"))
    }

    /// Get the default settings file path
    fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.toml"))
    }

    /// Parse settings from TOML text
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        toml::from_str(content).context("Failed to parse settings")
    }

    /// Read settings from a file
    pub fn read(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&content)
    }

    /// Load settings from `explicit` or the default location, falling back to
    /// defaults when the file is missing or broken
    pub fn load(explicit: Option<&Path>) -> (Self, SettingsOrigin) {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match Self::settings_path() {
                Some(path) if path.exists() => path,
                _ => return (Self::default(), SettingsOrigin::Defaults),
            },
        };

        match Self::read(&path) {
            Ok(settings) => (settings, SettingsOrigin::File(path)),
            Err(e) => (Self::default(), SettingsOrigin::Fallback(path, e)),
        }
    }

    /// Maximum log level, raised to debug when `verbose` is set
    pub fn level(&self, verbose: bool) -> Level {
        if verbose {
            return Level::DEBUG;
        }
        Level::from_str(self.log_level.trim()).unwrap_or(Level::INFO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(Settings::parse("").unwrap(), Settings::default());
    }

    #[test]
    fn parses_all_fields() {
        let settings = Settings::parse(
            r#"
            model = "assets/hero.json"
            animations = ["assets/walk.json", "assets/run.json"]
            sample_frame = 12.5
            log_level = "debug"

            [loader]
            uv_set = 1
            strip_texture_directories = false
            "#,
        )
        .unwrap();
        assert_eq!(settings.model, Some(PathBuf::from("assets/hero.json")));
        assert_eq!(settings.animations.len(), 2);
        assert_eq!(settings.sample_frame, Some(12.5));
        assert_eq!(settings.loader.uv_set, 1);
        assert!(!settings.loader.strip_texture_directories);
        assert_eq!(settings.level(false), Level::DEBUG);
    }

    #[test]
    fn partial_loader_table_keeps_defaults() {
        let settings = Settings::parse("[loader]\nuv_set = 2\n").unwrap();
        assert_eq!(settings.loader.uv_set, 2);
        assert!(settings.loader.strip_texture_directories);
    }

    #[test]
    fn broken_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join(format!(
            "scenebake_settings_{}.toml",
            std::process::id()
        ));
        fs::write(&path, "log_level = [").unwrap();
        let (settings, origin) = Settings::load(Some(&path));
        fs::remove_file(&path).ok();
        assert_eq!(settings, Settings::default());
        assert!(matches!(origin, SettingsOrigin::Fallback(_, _)));
    }

    #[test]
    fn missing_explicit_file_falls_back_to_defaults() {
        let (settings, origin) = Settings::load(Some(Path::new("/nonexistent/settings.toml")));
        assert_eq!(settings, Settings::default());
        assert!(matches!(origin, SettingsOrigin::Fallback(_, _)));
    }

    #[test]
    fn level_parsing() {
        let mut settings = Settings::default();
        assert_eq!(settings.level(false), Level::INFO);
        assert_eq!(settings.level(true), Level::DEBUG);
        settings.log_level = "WARN".into();
        assert_eq!(settings.level(false), Level::WARN);
        settings.log_level = "loud".into();
        assert_eq!(settings.level(false), Level::INFO);
    }
}
