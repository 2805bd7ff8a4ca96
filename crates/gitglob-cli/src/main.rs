//! # gitglob CLI
//!
//! Command-line interface for testing paths against ignore-file rules.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gitglob::RuleSet;
use gitglob_config::{init_logging, log_cli_debug, Config, LogLevel};

mod check;
mod source;

use source::RuleSource;

/// gitglob - match paths against .gitignore-style rules
#[derive(Parser)]
#[command(name = "gitglob")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Rules file (defaults to the configured ignore file)
    #[arg(short, long, global = true, value_name = "PATH")]
    file: Option<PathBuf>,

    /// Extra rule line, applied after the file's rules (repeatable)
    #[arg(short = 'r', long = "rule", global = true, value_name = "LINE")]
    rules: Vec<String>,

    /// Use only --rule lines, do not read a rules file
    #[arg(long, global = true)]
    no_file: bool,

    /// Fail on rules that produce an invalid pattern
    #[arg(long, global = true)]
    strict: bool,

    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report whether each path is ignored
    Check(check::CheckArgs),

    /// List compiled rules with their generated patterns
    Rules,

    /// Print the effective configuration as TOML
    Config {
        /// Print the built-in defaults instead
        #[arg(long)]
        default: bool,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let logging = init_logging(cli.log_level.unwrap_or_default());
    gitglob_config::reload().context("Failed to load configuration")?;
    let config = gitglob_config::config().clone();
    if cli.log_level.is_none() {
        logging.set_level(config.log.level);
    }
    log_cli_debug!("Configuration loaded", config = ?config);

    match cli.command {
        Commands::Config { default } => {
            if default {
                print!("{}", Config::default_toml());
            } else {
                let rendered =
                    toml::to_string_pretty(&config).context("Failed to render configuration")?;
                print!("{rendered}");
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Rules => {
            let source = RuleSource::resolve(&config, cli.file, cli.no_file, cli.rules, cli.strict);
            let rules = source.load()?;
            print_rules(&rules);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Check(args) => {
            let source = RuleSource::resolve(&config, cli.file, cli.no_file, cli.rules, cli.strict);
            let rules = source.load()?;
            check::run(&rules, &args)
        }
    }
}

fn print_rules(rules: &RuleSet) {
    for rule in rules.rules() {
        println!(
            "{:>4}  {:<24}  {}",
            rule.line(),
            rule.source(),
            rule.pattern().as_str()
        );
    }
    for diagnostic in rules.diagnostics() {
        println!("skipped {diagnostic}");
    }
}
