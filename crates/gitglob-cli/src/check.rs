//! `gitglob check`: report whether paths are ignored

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;
use gitglob::RuleSet;
use gitglob_config::log_match_debug;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Paths to test, relative to the rules file's directory
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<String>,

    /// Emit a JSON array instead of text
    #[arg(long)]
    pub json: bool,

    /// Print nothing; exit 0 if any path is ignored, 1 otherwise
    #[arg(short, long, conflicts_with = "json")]
    pub quiet: bool,
}

/// Outcome for one path
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct CheckReport<'a> {
    pub path: &'a str,
    pub ignored: bool,
    /// The last rule that matched, if any
    pub rule: Option<&'a str>,
    pub line: Option<usize>,
}

pub fn evaluate<'a>(rules: &'a RuleSet, paths: &'a [String]) -> Vec<CheckReport<'a>> {
    paths
        .iter()
        .map(|path| {
            let ignored = rules.matches_path(path);
            let decided = rules.explain(path);
            log_match_debug!(
                "Checked path",
                path = %path,
                ignored,
                rule = ?decided.map(|r| r.source())
            );
            CheckReport {
                path,
                ignored,
                rule: decided.map(|r| r.source()),
                line: decided.map(|r| r.line()),
            }
        })
        .collect()
}

pub fn run(rules: &RuleSet, args: &CheckArgs) -> Result<ExitCode> {
    let reports = evaluate(rules, &args.paths);

    if args.quiet {
        let any_ignored = reports.iter().any(|r| r.ignored);
        return Ok(if any_ignored {
            ExitCode::SUCCESS
        } else {
            ExitCode::from(1)
        });
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(ExitCode::SUCCESS);
    }

    for report in &reports {
        let status = if report.ignored { "ignored" } else { "included" };
        match (report.line, report.rule) {
            (Some(line), Some(rule)) => println!("{}\t{}\t{}:{}", report.path, status, line, rule),
            _ => println!("{}\t{}", report.path, status),
        }
    }
    Ok(ExitCode::SUCCESS)
}
