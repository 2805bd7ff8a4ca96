//! Rule compiler
//!
//! Rewrites a single ignore-file line into a regular expression. The rewrite
//! is a fixed sequence of text substitutions; later steps rely on the escapes
//! introduced by earlier ones, so the order below must not change.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::{IgnoreError, Result};

/// Stands in for an escaped `*` while bare stars are expanded.
const MAGIC_STAR: &str = "#$~";

/// A wildcard extension below a literal directory segment, e.g. `foo/*.wat`
static NESTED_EXTENSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([^/+])/.*\*\.").expect("valid nested extension regex"));

/// Output of [`translate`]: expression source text plus negation flag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translated {
    pub expr: String,
    pub negate: bool,
}

/// Translate one rule line into regular expression source.
///
/// Returns `None` for lines that produce no rule: blank lines, comments,
/// and a bare `!` with nothing after it.
pub fn translate(line: &str) -> Option<Translated> {
    // Also drops stray carriage returns
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let (line, negate) = match line.strip_prefix('!') {
        Some(rest) => (rest, true),
        None => (line, false),
    };
    if negate && line.is_empty() {
        warn!(rule = "!", "Negation marker without a pattern, skipping");
        return None;
    }

    let line = line.strip_prefix('/').unwrap_or(line);

    let mut text = String::with_capacity(line.len() + 1);
    if NESTED_EXTENSION.is_match(line) {
        text.push('/');
    }
    text.push_str(&line.replace('.', r"\."));

    if text.starts_with("/**/") {
        text.remove(0);
    }
    let text = text
        .replace("/**/", "(/|/.+/)")
        .replace("**/", &format!("(|.{MAGIC_STAR}/)"))
        .replace("/**", &format!("(|/.{MAGIC_STAR})"))
        .replace(r"\*", &format!(r"\{MAGIC_STAR}"))
        .replace('*', "([^/]*)")
        .replace('?', r"\?")
        .replace(MAGIC_STAR, "*");
    let text = escape_unparsed_braces(&text);

    let body = if text.ends_with('/') {
        format!("{text}(|.*)$")
    } else {
        format!("{text}(|/.*)$")
    };
    let expr = match body.strip_prefix('/') {
        Some(anchored) => format!("^(|/){anchored}"),
        None => format!("^(|.*/){body}"),
    };

    Some(Translated { expr, negate })
}

/// Make brace and angle-bracket handling agree with RE2.
///
/// A `{` that does not open a `{n}`, `{n,}` or `{n,m}` repeat is a literal
/// there, and so is an unpaired `}`. `\<` and `\>` are literal angle brackets
/// rather than word boundaries.
fn escape_unparsed_braces(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(ch) = rest.chars().next() {
        match ch {
            '\\' => {
                let next = rest[1..].chars().next();
                match next {
                    Some(c @ ('<' | '>')) => out.push(c),
                    Some(c) => {
                        out.push('\\');
                        out.push(c);
                    }
                    None => out.push('\\'),
                }
                rest = &rest[1 + next.map_or(0, char::len_utf8)..];
                continue;
            }
            '{' => {
                if let Some(span) = repeat_span(rest) {
                    out.push_str(span);
                    rest = &rest[span.len()..];
                    continue;
                }
                out.push_str(r"\{");
            }
            '}' => out.push_str(r"\}"),
            _ => out.push(ch),
        }
        rest = &rest[ch.len_utf8()..];
    }
    out
}

/// The `{...}` prefix of `rest` if it is a well-formed repeat
fn repeat_span(rest: &str) -> Option<&str> {
    let body = rest.strip_prefix('{')?;
    let end = body.find('}')?;
    let inner = &body[..end];
    let is_number = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    let valid = match inner.split_once(',') {
        Some((min, max)) => is_number(min) && (max.is_empty() || is_number(max)),
        None => is_number(inner),
    };
    valid.then(|| &rest[..end + 2])
}

/// One compiled rule line
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pattern: Regex,
    negate: bool,
    source: String,
    line: usize,
}

impl CompiledRule {
    /// Compile `text`, found on 1-based line `line`.
    ///
    /// `None` means the line yields no rule. `Some(Err(_))` means the
    /// generated expression was rejected by the regex engine.
    pub fn compile(line: usize, text: &str) -> Option<Result<Self>> {
        let Translated { expr, negate } = translate(text)?;
        let source = text.trim().to_string();

        let compiled = match Regex::new(&expr) {
            Ok(pattern) => {
                debug!(line, rule = %source, expr = %expr, negate, "Compiled rule");
                Ok(Self {
                    pattern,
                    negate,
                    source,
                    line,
                })
            }
            Err(err) => Err(IgnoreError::InvalidPattern {
                line,
                rule: source,
                source: err,
            }),
        };
        Some(compiled)
    }

    /// The generated regular expression
    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    /// True for `!` rules, which re-include paths
    pub fn is_negated(&self) -> bool {
        self.negate
    }

    /// The rule as written, trimmed
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn line(&self) -> usize {
        self.line
    }

    /// Test an already-normalized path against this rule alone
    pub fn is_match(&self, path: &str) -> bool {
        self.pattern.is_match(path)
    }
}
