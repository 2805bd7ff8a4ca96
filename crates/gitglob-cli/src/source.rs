//! Rule source resolution: CLI flags layered over configuration.

use std::path::PathBuf;

use anyhow::{Context, Result};
use gitglob::{RuleSet, RuleSetBuilder};
use gitglob_config::{log_cli_info, Config};

/// Where the rule lines for this invocation come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSource {
    /// Rules file, `None` when only inline rules are used
    pub file: Option<PathBuf>,
    /// Inline rules appended after the file's lines
    pub extra: Vec<String>,
    pub strict: bool,
}

impl RuleSource {
    /// Flags win over config. Inline `--rule` lines come after configured extras.
    pub fn resolve(
        config: &Config,
        file: Option<PathBuf>,
        no_file: bool,
        rules: Vec<String>,
        strict: bool,
    ) -> Self {
        let file = if no_file {
            None
        } else {
            Some(file.unwrap_or_else(|| config.rules.ignore_file.clone()))
        };

        let mut extra = config.rules.extra.clone();
        extra.extend(rules);

        Self {
            file,
            extra,
            strict: strict || config.rules.strict,
        }
    }

    pub fn load(&self) -> Result<RuleSet> {
        let mut builder = RuleSetBuilder::new().strict(self.strict);
        if let Some(path) = &self.file {
            builder = builder
                .add_file(path)
                .with_context(|| format!("Failed to read rules file: {}", path.display()))?;
        }

        let rules = builder
            .add_lines(&self.extra)
            .build()
            .context("Failed to compile rules")?;

        log_cli_info!(
            "Loaded rules",
            count = rules.len(),
            dropped = rules.diagnostics().len()
        );
        Ok(rules)
    }
}
