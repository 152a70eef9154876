//! Terminal output for listings, dry runs and errors.

use colored::*;
use thiserror::Error;

use rooda::config::{AiCommand, Config, IterationSettings, Provenance};
use rooda::{ErrorKind, RoodaError};

/// Maximum width of a `--list-procedures` line.
const LIST_WIDTH: usize = 80;

/// Process exit codes.
pub mod exit {
    pub const SUCCESS: u8 = 0;
    pub const USER: u8 = 1;
    pub const CONFIG: u8 = 2;
    pub const EXECUTION: u8 = 3;
    pub const RESOLUTION: u8 = 4;
    pub const ASSEMBLY: u8 = 5;
}

/// Errors raised by the binary itself rather than the library.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("no procedure given\nAvailable: {}", .available.join(", "))]
    NoProcedure { available: Vec<String> },

    #[error("Empty inline content for --{phase}")]
    EmptyPhaseValue { phase: String },

    #[error("iteration loop is not available; use --dry-run to print the prompt")]
    LoopUnavailable,
}

/// Exit code for an error reaching `main`.
pub fn exit_code(err: &eyre::Report) -> u8 {
    if let Some(err) = err.downcast_ref::<RoodaError>() {
        return match err.kind() {
            ErrorKind::User => exit::USER,
            ErrorKind::Config => exit::CONFIG,
            ErrorKind::Resolution => exit::RESOLUTION,
            ErrorKind::Assembly => exit::ASSEMBLY,
            ErrorKind::Io => exit::EXECUTION,
        };
    }
    match err.downcast_ref::<CliError>() {
        Some(CliError::NoProcedure { .. } | CliError::EmptyPhaseValue { .. }) => exit::USER,
        Some(CliError::LoopUnavailable) | None => exit::EXECUTION,
    }
}

/// Print an error with its cause chain.
pub fn print_error(err: &eyre::Report) {
    eprintln!("{} {:#}", "Error:".red().bold(), err);
}

/// One `name  blurb` line, truncated to fit the listing width.
pub fn procedure_line(name: &str, blurb: &str, name_width: usize) -> String {
    let line = format!("  {:<width$}  {}", name, blurb, width = name_width);
    truncate(&line, LIST_WIDTH)
}

fn truncate(line: &str, width: usize) -> String {
    if line.chars().count() <= width {
        return line.to_string();
    }
    let kept: String = line.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", kept.trim_end())
}

pub fn print_procedures(config: &Config) {
    let name_width = config.procedures.keys().map(|n| n.len()).max().unwrap_or(0);
    println!("{}", "Available procedures:".bold());
    for (name, procedure) in &config.procedures {
        println!("{}", procedure_line(name, procedure.blurb(), name_width));
    }
}

pub fn print_provenance(provenance: &Provenance) {
    let width = provenance.iter().map(|(path, _)| path.len()).max().unwrap_or(0);
    println!("{}", "Configuration sources:".bold());
    for (path, source) in provenance.iter() {
        let file = source
            .file
            .as_ref()
            .map(|f| format!("  {}", f.display()))
            .unwrap_or_default();
        let tier = format!("{:<9}", source.tier.as_str());
        println!("  {:<width$}  {}{}", path, tier.cyan(), file, width = width);
    }
    println!();
}

pub fn print_dry_run(procedure: &str, command: &AiCommand, settings: &IterationSettings, prompt: &str) {
    println!("{} {}", "Procedure:".green().bold(), procedure);
    println!("{} {}", "AI command:".green().bold(), command.command);
    println!("{} {}", "Source:".green().bold(), command.source);
    let limit = settings
        .max_iterations
        .map(|n| n.to_string())
        .unwrap_or_else(|| "unlimited".to_string());
    println!("{} {} ({})", "Iterations:".green().bold(), limit, settings.mode);
    println!();
    print!("{}", prompt);
}
