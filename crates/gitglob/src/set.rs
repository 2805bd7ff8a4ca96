//! Rule sets and path matching

use std::borrow::Cow;
use std::fmt;
use std::fs;
use std::path::{Path, MAIN_SEPARATOR};

use tracing::{debug, trace, warn};

use crate::rule::CompiledRule;
use crate::{IgnoreError, Result};

/// A rule line that was dropped because its expression failed to compile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleDiagnostic {
    pub line: usize,
    pub rule: String,
    pub message: String,
}

impl fmt::Display for RuleDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: `{}`: {}", self.line, self.rule, self.message)
    }
}

/// Ordered, immutable collection of compiled rules.
///
/// Rules keep the order their lines had in the input. Safe to share across
/// threads once built.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<CompiledRule>,
    diagnostics: Vec<RuleDiagnostic>,
}

impl RuleSet {
    /// Compile in-memory rule lines.
    ///
    /// Never fails in lenient mode; a line with an invalid expression is
    /// dropped and recorded in [`RuleSet::diagnostics`].
    pub fn compile_lines<I, S>(lines: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        RuleSetBuilder::new().add_lines(lines).build()
    }

    /// Read `path`, split it on `\n` and compile the lines.
    pub fn compile_file(path: impl AsRef<Path>) -> Result<Self> {
        RuleSetBuilder::new().add_file(path)?.build()
    }

    /// Returns true if `path` is ignored.
    ///
    /// Native separators are normalized to `/`. Every rule is evaluated in
    /// order: a match sets the result, and a negated match clears it again.
    pub fn matches_path(&self, path: &str) -> bool {
        let path = normalize_separators(path);
        let mut matched = false;
        for rule in &self.rules {
            if rule.is_match(&path) {
                matched = true;
                if rule.is_negated() {
                    matched = false;
                }
            }
        }
        trace!(path = %path, matched, "Evaluated path");
        matched
    }

    /// [`RuleSet::matches_path`] for `Path` values. Non-UTF-8 bytes are replaced.
    pub fn matches(&self, path: impl AsRef<Path>) -> bool {
        self.matches_path(&path.as_ref().to_string_lossy())
    }

    /// The rule that decided the outcome for `path`: the last one that
    /// matched, negated or not. `None` if no rule matched.
    pub fn explain(&self, path: &str) -> Option<&CompiledRule> {
        let path = normalize_separators(path);
        self.rules.iter().rev().find(|rule| rule.is_match(&path))
    }

    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    /// Lines dropped during a lenient build
    pub fn diagnostics(&self) -> &[RuleDiagnostic] {
        &self.diagnostics
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn normalize_separators(path: &str) -> Cow<'_, str> {
    if MAIN_SEPARATOR == '/' || !path.contains(MAIN_SEPARATOR) {
        Cow::Borrowed(path)
    } else {
        Cow::Owned(path.replace(MAIN_SEPARATOR, "/"))
    }
}

/// Collects rule lines and compiles them into a [`RuleSet`].
///
/// Line numbers run continuously across everything added, starting at 1.
#[derive(Debug, Clone, Default)]
pub struct RuleSetBuilder {
    lines: Vec<String>,
    strict: bool,
}

impl RuleSetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// In strict mode the first invalid expression aborts [`RuleSetBuilder::build`]
    /// instead of being dropped.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn add_line(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }

    pub fn add_lines<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.lines
            .extend(lines.into_iter().map(|line| line.as_ref().to_string()));
        self
    }

    /// Append the lines of a rules file. Content is decoded lossily; only
    /// the read itself can fail.
    pub fn add_file(self, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        debug!(path = %path.display(), bytes = bytes.len(), "Read rules file");
        let contents = String::from_utf8_lossy(&bytes);
        Ok(self.add_lines(contents.split('\n')))
    }

    pub fn build(&self) -> Result<RuleSet> {
        let mut rules = Vec::new();
        let mut diagnostics = Vec::new();

        for (idx, text) in self.lines.iter().enumerate() {
            match CompiledRule::compile(idx + 1, text) {
                None => {}
                Some(Ok(rule)) => rules.push(rule),
                Some(Err(IgnoreError::InvalidPattern { line, rule, source })) if !self.strict => {
                    warn!(line, rule = %rule, error = %source, "Dropping rule with invalid pattern");
                    diagnostics.push(RuleDiagnostic {
                        line,
                        rule,
                        message: source.to_string(),
                    });
                }
                Some(Err(err)) => return Err(err),
            }
        }

        debug!(
            rules = rules.len(),
            dropped = diagnostics.len(),
            strict = self.strict,
            "Built rule set"
        );
        Ok(RuleSet { rules, diagnostics })
    }
}
