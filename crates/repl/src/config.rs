//! User configuration
//!
//! Loaded from `~/.config/tcalc/config.toml` (or `--config`). Every key is
//! optional; missing keys keep their defaults.
//!
//! ```toml
//! [display]
//! columns = 4
//! auto_display = true
//!
//! [repl]
//! prompt = ">"
//! history = true
//! startup_file = "state.txt"
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tcalc_core::{DEFAULT_COLUMNS, DisplaySettings};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    /// Tensor elements per displayed row
    pub columns: usize,
    /// Print the top of the stack after each displaying command
    pub auto_display: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            columns: DEFAULT_COLUMNS,
            auto_display: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReplConfig {
    pub prompt: String,
    /// Persist line history between sessions
    pub history: bool,
    /// State file replayed before the first prompt
    pub startup_file: Option<PathBuf>,
}

impl Default for ReplConfig {
    fn default() -> Self {
        ReplConfig {
            prompt: ">".to_string(),
            history: true,
            startup_file: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub display: DisplayConfig,
    pub repl: ReplConfig,
}

impl Config {
    /// Parse configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        let config: Config =
            toml::from_str(toml_str).map_err(|e| format!("Failed to parse config: {}", e))?;
        if config.display.columns == 0 {
            return Err("Failed to parse config: display.columns must be at least 1".to_string());
        }
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, String> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        Self::from_toml(&text)
    }

    /// `~/.config/tcalc/config.toml`, if a home directory is known
    pub fn default_path() -> Option<PathBuf> {
        home::home_dir().map(|d| d.join(".config").join("tcalc").join("config.toml"))
    }

    pub fn display_settings(&self) -> DisplaySettings {
        DisplaySettings {
            columns: self.display.columns,
            auto_display: self.display.auto_display,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.display.columns, 4);
        assert!(config.display.auto_display);
        assert_eq!(config.repl.prompt, ">");
        assert!(config.repl.history);
        assert!(config.repl.startup_file.is_none());
    }

    #[test]
    fn test_partial_config() {
        let config = Config::from_toml(
            r#"
[display]
columns = 8

[repl]
startup_file = "state.txt"
"#,
        )
        .unwrap();
        assert_eq!(config.display.columns, 8);
        assert!(config.display.auto_display);
        assert_eq!(config.repl.startup_file, Some(PathBuf::from("state.txt")));
        assert_eq!(config.repl.prompt, ">");
    }

    #[test]
    fn test_zero_columns_rejected() {
        let err = Config::from_toml("[display]\ncolumns = 0\n").unwrap_err();
        assert!(err.contains("columns"));
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(Config::from_toml("[display]\ncolumnz = 3\n").is_err());
    }

    #[test]
    fn test_wrong_type_rejected() {
        assert!(Config::from_toml("[display]\nauto_display = \"yes\"\n").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[display]\nauto_display = false\n").unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(
            config.display_settings(),
            DisplaySettings {
                columns: 4,
                auto_display: false
            }
        );
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(&dir.path().join("nope.toml")).unwrap_err();
        assert!(err.starts_with("Failed to read"));
    }
}
