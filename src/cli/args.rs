//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::Parser;

use rooda::config::{CliFlags, LogLevel};

use super::output::CliError;

/// rooda - run OODA-loop procedures against an AI command line tool
#[derive(Parser, Debug)]
#[command(name = "rooda")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Procedure to run (see --list-procedures)
    pub procedure: Option<String>,

    /// Maximum iterations
    #[arg(short = 'n', long, value_parser = clap::value_parser!(u32).range(1..), conflicts_with = "unlimited")]
    pub max_iterations: Option<u32>,

    /// Run until the AI signals completion
    #[arg(short, long)]
    pub unlimited: bool,

    /// Assemble and print the prompt without running anything
    #[arg(short, long)]
    pub dry_run: bool,

    /// AI command to run (overrides every alias)
    #[arg(long, value_name = "COMMAND")]
    pub ai_cmd: Option<String>,

    /// AI command alias from the merged alias map
    #[arg(long, value_name = "NAME")]
    pub ai_cmd_alias: Option<String>,

    /// Context text or file path (repeatable)
    #[arg(short, long = "context", value_name = "VALUE")]
    pub contexts: Vec<String>,

    /// Config file to use instead of ./rooda-config.yml
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Replace the observe phase (repeatable)
    #[arg(long, value_name = "FRAGMENT")]
    pub observe: Vec<String>,

    /// Replace the orient phase (repeatable)
    #[arg(long, value_name = "FRAGMENT")]
    pub orient: Vec<String>,

    /// Replace the decide phase (repeatable)
    #[arg(long, value_name = "FRAGMENT")]
    pub decide: Vec<String>,

    /// Replace the act phase (repeatable)
    #[arg(long, value_name = "FRAGMENT")]
    pub act: Vec<String>,

    /// Verbose output (debug logging, AI output shown)
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Log level: debug, info, warn or error
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// List available procedures and exit
    #[arg(long)]
    pub list_procedures: bool,
}

impl Cli {
    /// Reject flag values clap accepts but the run cannot use.
    pub fn validate(&self) -> Result<(), CliError> {
        let phases = [
            ("observe", &self.observe),
            ("orient", &self.orient),
            ("decide", &self.decide),
            ("act", &self.act),
        ];
        for (phase, values) in phases {
            if values.iter().any(|v| v.trim().is_empty()) {
                return Err(CliError::EmptyPhaseValue {
                    phase: phase.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Flag values as the library consumes them.
    pub fn to_flags(&self) -> CliFlags {
        CliFlags {
            max_iterations: self.max_iterations,
            unlimited: self.unlimited,
            ai_cmd: self.ai_cmd.clone(),
            ai_cmd_alias: self.ai_cmd_alias.clone(),
            contexts: self.contexts.clone(),
            config_path: self.config.clone(),
            observe: self.observe.clone(),
            orient: self.orient.clone(),
            decide: self.decide.clone(),
            act: self.act.clone(),
            log_level: self.log_level,
            verbose: self.verbose,
            quiet: self.quiet,
            dry_run: self.dry_run,
        }
    }
}
