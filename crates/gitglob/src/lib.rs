//! # gitglob
//!
//! Compiles ignore-file rules (the `.gitignore` line syntax) into a path
//! predicate.
//!
//! Each non-blank, non-comment line becomes one [`CompiledRule`]: a regular
//! expression plus a negation flag. A [`RuleSet`] evaluates a path against
//! every rule in file order; the last rule that matches decides the outcome,
//! and a negated rule flips a prior match back to "not ignored".
//!
//! ```ignore
//! use gitglob::RuleSet;
//!
//! let rules = RuleSet::compile_lines(["/target", "*.swp", "!keep.swp"])?;
//! assert!(rules.matches_path("target/debug/app"));
//! assert!(!rules.matches_path("keep.swp"));
//! ```
//!
//! The crate does no directory walking and keeps no file-system state.
//! Reading a rules file is the only I/O it performs.

mod rule;
mod set;

pub use rule::{translate, CompiledRule, Translated};
pub use set::{RuleDiagnostic, RuleSet, RuleSetBuilder};

use std::io;
use std::path::Path;

use thiserror::Error;

/// Errors produced while building a [`RuleSet`]
#[derive(Error, Debug)]
pub enum IgnoreError {
    /// Reading the rules file failed. The underlying error is passed through as-is.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// A rule produced an expression the regex engine rejected.
    /// Only returned by a strict [`RuleSetBuilder`].
    #[error("invalid pattern on line {line} (`{rule}`): {source}")]
    InvalidPattern {
        line: usize,
        rule: String,
        source: regex::Error,
    },
}

pub type Result<T> = std::result::Result<T, IgnoreError>;

/// Anything that can answer "is this path ignored?"
pub trait IgnoreParser {
    /// Returns true if `path` is targeted by the compiled rules
    fn matches_path(&self, path: &str) -> bool;
}

impl IgnoreParser for RuleSet {
    fn matches_path(&self, path: &str) -> bool {
        RuleSet::matches_path(self, path)
    }
}

/// Compile in-memory rule lines. Invalid lines are dropped, not fatal.
pub fn compile_lines<I, S>(lines: I) -> Result<RuleSet>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    RuleSet::compile_lines(lines)
}

/// Read a rules file and compile its lines.
pub fn compile_file(path: impl AsRef<Path>) -> Result<RuleSet> {
    RuleSet::compile_file(path)
}
