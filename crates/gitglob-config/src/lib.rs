//! # gitglob-config
//!
//! Configuration management for gitglob.
//!
//! Loads configuration from:
//! 1. `~/.gitglob/config.toml` (global)
//! 2. `.gitglob/config.toml` (project-local, overrides global)
//! 3. Environment variables (highest priority)

#[macro_use]
pub mod logging;
pub mod testing;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

pub use logging::{init_logging, LogLevel, LoggingHandle};

/// Project-local config path, relative to the working directory
pub const PROJECT_CONFIG_PATH: &str = ".gitglob/config.toml";

/// Rules file used when nothing else is configured
pub const DEFAULT_IGNORE_FILE: &str = ".gitignore";

pub const ENV_IGNORE_FILE: &str = "GITGLOB_IGNORE_FILE";
pub const ENV_STRICT: &str = "GITGLOB_STRICT";
pub const ENV_LOG_LEVEL: &str = "GITGLOB_LOG_LEVEL";

/// Global config instance, loaded on first use unless `reload` ran first
static CONFIG: OnceCell<RwLock<Config>> = OnceCell::new();

fn global() -> &'static RwLock<Config> {
    CONFIG.get_or_init(|| RwLock::new(Config::load().unwrap_or_default()))
}

/// Get global config (read-only)
pub fn config() -> std::sync::RwLockReadGuard<'static, Config> {
    global().read().unwrap_or_else(PoisonError::into_inner)
}

/// Reload config from disk. Loads exactly once per call.
pub fn reload() -> Result<(), ConfigError> {
    let new_config = Config::load()?;
    if let Err(fresh) = CONFIG.set(RwLock::new(new_config)) {
        let new_config = fresh.into_inner().unwrap_or_else(PoisonError::into_inner);
        *global().write().unwrap_or_else(PoisonError::into_inner) = new_config;
    }
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub rules: RulesConfig,
    pub log: LogConfig,
}

impl Config {
    /// Load config from standard locations
    pub fn load() -> Result<Self, ConfigError> {
        let global = Self::global_config_path();
        let mut config = Self::load_from(global.as_deref(), Path::new(PROJECT_CONFIG_PATH))?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load the global and project layers from explicit paths.
    /// Missing files are skipped. Environment overrides are not applied.
    pub fn load_from(global: Option<&Path>, project: &Path) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        if let Some(global_path) = global {
            if global_path.exists() {
                log_config_debug!("Loading global config", path = %global_path.display());
                let contents = std::fs::read_to_string(global_path)?;
                config = toml::from_str(&contents)?;
            }
        }

        if project.exists() {
            log_config_debug!("Loading project config", path = %project.display());
            let contents = std::fs::read_to_string(project)?;
            let project_layer: ConfigLayer = toml::from_str(&contents)?;
            config.merge(project_layer);
        }

        Ok(config)
    }

    /// Global config path: ~/.gitglob/config.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".gitglob/config.toml"))
    }

    /// Merge a project layer. Every key it sets wins, including defaults.
    fn merge(&mut self, layer: ConfigLayer) {
        if let Some(ignore_file) = layer.rules.ignore_file {
            self.rules.ignore_file = ignore_file;
        }
        if let Some(extra) = layer.rules.extra {
            self.rules.extra = extra;
        }
        if let Some(strict) = layer.rules.strict {
            self.rules.strict = strict;
        }
        if let Some(level) = layer.log.level {
            self.log.level = level;
        }
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup. Unparseable values are ignored.
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup(ENV_IGNORE_FILE) {
            self.rules.ignore_file = PathBuf::from(path);
        }
        if let Some(strict) = lookup(ENV_STRICT) {
            match strict.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.rules.strict = true,
                "0" | "false" | "no" | "off" => self.rules.strict = false,
                other => log_config_warn!("Ignoring invalid strict override", value = other),
            }
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            match level.parse() {
                Ok(level) => self.log.level = level,
                Err(err) => log_config_warn!("Ignoring invalid log level override", error = %err),
            }
        }
    }

    /// Generate default config TOML string
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Config::default()).unwrap_or_default()
    }
}

/// Where rule lines come from and how they are compiled
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Rules file read by default
    pub ignore_file: PathBuf,
    /// Extra rule lines appended after the file's lines
    pub extra: Vec<String>,
    /// Fail on the first rule with an invalid pattern instead of dropping it
    pub strict: bool,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            ignore_file: PathBuf::from(DEFAULT_IGNORE_FILE),
            extra: Vec::new(),
            strict: false,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: LogLevel,
}

/// A config file as written: keys left out stay `None`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigLayer {
    rules: RulesLayer,
    log: LogLayer,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RulesLayer {
    ignore_file: Option<PathBuf>,
    extra: Option<Vec<String>>,
    strict: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LogLayer {
    level: Option<LogLevel>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.rules.ignore_file, PathBuf::from(".gitignore"));
        assert!(config.rules.extra.is_empty());
        assert!(!config.rules.strict);
        assert_eq!(config.log.level, LogLevel::Warn);
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[rules]"));
        assert!(toml_str.contains("[log]"));
        assert!(toml_str.contains(".gitignore"));
        assert!(toml_str.contains("level = \"warn\""));
    }

    #[test]
    fn test_merge_keeps_unset_fields() {
        let mut config: Config = toml::from_str(
            r#"
[rules]
ignore_file = "global.ignore"
extra = ["*.tmp"]
"#,
        )
        .unwrap();
        let project: ConfigLayer = toml::from_str(
            r#"
[log]
level = "debug"
"#,
        )
        .unwrap();

        config.merge(project);
        assert_eq!(config.rules.ignore_file, PathBuf::from("global.ignore"));
        assert_eq!(config.rules.extra, vec!["*.tmp"]);
        assert_eq!(config.log.level, LogLevel::Debug);
    }

    #[test]
    fn test_merge_can_restore_defaults() {
        let mut config: Config = toml::from_str(
            r#"
[rules]
ignore_file = "global.ignore"
extra = ["*.tmp"]
strict = true

[log]
level = "debug"
"#,
        )
        .unwrap();
        let project: ConfigLayer = toml::from_str(
            r#"
[rules]
ignore_file = ".gitignore"
extra = []
strict = false

[log]
level = "warn"
"#,
        )
        .unwrap();

        config.merge(project);
        assert_eq!(config.rules.ignore_file, PathBuf::from(".gitignore"));
        assert!(config.rules.extra.is_empty());
        assert!(!config.rules.strict);
        assert_eq!(config.log.level, LogLevel::Warn);
    }

    #[test]
    fn test_overrides_from_lookup() {
        let vars: HashMap<&str, &str> = [
            (ENV_IGNORE_FILE, "custom.ignore"),
            (ENV_STRICT, "true"),
            (ENV_LOG_LEVEL, "trace"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides_from(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(config.rules.ignore_file, PathBuf::from("custom.ignore"));
        assert!(config.rules.strict);
        assert_eq!(config.log.level, LogLevel::Trace);
    }

    #[test]
    fn test_invalid_overrides_are_ignored() {
        let mut config = Config::default();
        config.apply_overrides_from(|key| match key {
            ENV_STRICT => Some("maybe".to_string()),
            ENV_LOG_LEVEL => Some("loud".to_string()),
            _ => None,
        });
        assert!(!config.rules.strict);
        assert_eq!(config.log.level, LogLevel::Warn);
    }
}
