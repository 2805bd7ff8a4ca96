//! Test fixtures for rule files and project configs.
//!
//! # Usage
//!
//! ```ignore
//! use gitglob_config::testing::RuleFixture;
//!
//! let fixture = RuleFixture::new()?;
//! let rules_path = fixture.write_rules(&["/target", "*.swp"])?;
//! fixture.write_project_config("[rules]\nstrict = true\n")?;
//! ```

use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};
use tempfile::TempDir;

/// Atomic counter for unique fixture IDs
static FIXTURE_COUNTER: AtomicU32 = AtomicU32::new(0);

/// Isolated project directory holding a rules file and optional config
pub struct RuleFixture {
    /// Temporary directory (dropped on cleanup)
    _temp_dir: TempDir,
    /// Project root; a stand-in for the working directory
    pub project_root: PathBuf,
    /// Stand-in for the home directory, for global config
    pub home_dir: PathBuf,
    /// Unique fixture ID
    pub fixture_id: u32,
}

impl RuleFixture {
    /// Create a new isolated fixture
    pub fn new() -> anyhow::Result<Self> {
        let fixture_id = FIXTURE_COUNTER.fetch_add(1, Ordering::Relaxed);
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path();

        let project_root = root.join(format!("project-{fixture_id}"));
        let home_dir = root.join("home");
        std::fs::create_dir_all(&project_root)?;
        std::fs::create_dir_all(&home_dir)?;

        Ok(Self {
            _temp_dir: temp_dir,
            project_root,
            home_dir,
            fixture_id,
        })
    }

    /// Path of the default rules file (`.gitignore`) in the project
    pub fn rules_path(&self) -> PathBuf {
        self.project_root.join(crate::DEFAULT_IGNORE_FILE)
    }

    /// Path of the project-local config
    pub fn project_config_path(&self) -> PathBuf {
        self.project_root.join(crate::PROJECT_CONFIG_PATH)
    }

    /// Path of the global config under the fake home directory
    pub fn global_config_path(&self) -> PathBuf {
        self.home_dir.join(".gitglob").join("config.toml")
    }

    /// Write `lines` to the default rules file, newline separated
    pub fn write_rules(&self, lines: &[&str]) -> anyhow::Result<PathBuf> {
        self.write_file(crate::DEFAULT_IGNORE_FILE, lines.join("\n").as_bytes())
    }

    /// Write raw content to a file relative to the project root
    pub fn write_file(&self, relative_path: &str, content: &[u8]) -> anyhow::Result<PathBuf> {
        let path = self.project_root.join(relative_path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, content)?;
        Ok(path)
    }

    pub fn write_project_config(&self, toml: &str) -> anyhow::Result<PathBuf> {
        self.write_file(crate::PROJECT_CONFIG_PATH, toml.as_bytes())
    }

    pub fn write_global_config(&self, toml: &str) -> anyhow::Result<PathBuf> {
        let path = self.global_config_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, toml)?;
        Ok(path)
    }

    /// Load config layers from this fixture instead of the real locations
    pub fn load_config(&self) -> Result<crate::Config, crate::ConfigError> {
        let global = self.global_config_path();
        crate::Config::load_from(Some(global.as_path()), &self.project_config_path())
    }
}
