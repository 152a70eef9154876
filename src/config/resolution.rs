//! Resolution of per-invocation values out of a merged `Config`.
//!
//! AI command precedence, first match wins:
//! 1. `--ai-cmd` flag
//! 2. `--ai-cmd-alias` flag
//! 3. `procedures.<name>.ai_cmd`
//! 4. `procedures.<name>.ai_cmd_alias`
//! 5. `loop.ai_cmd`
//! 6. `loop.ai_cmd_alias`
//!
//! An alias that is not in the merged alias map fails on the spot; it never
//! falls through to a lower step.

use std::fmt;

use super::{CliFlags, Config, ConfigTier, IterationMode, Procedure};
use crate::error::{Result, RoodaError};

/// The command to run and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiCommand {
    /// Full shell command line.
    pub command: String,
    /// Human-readable source, e.g. `--ai-cmd-alias flag=claude`.
    pub source: String,
}

impl fmt::Display for AiCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (from {})", self.command, self.source)
    }
}

/// Resolve the AI command for `procedure_name`.
///
/// A procedure name missing from `config` just skips steps 3 and 4; selecting
/// the procedure is the caller's job.
pub fn resolve_ai_command(config: &Config, procedure_name: &str, flags: &CliFlags) -> Result<AiCommand> {
    if let Some(command) = non_empty(&flags.ai_cmd) {
        return Ok(direct(command, "--ai-cmd flag"));
    }
    if let Some(alias) = non_empty(&flags.ai_cmd_alias) {
        return lookup_alias(config, alias, "--ai-cmd-alias flag");
    }

    if let Some(procedure) = config.procedures.get(procedure_name) {
        if let Some(command) = non_empty(&procedure.ai_cmd) {
            return Ok(direct(command, &format!("procedure.{}.ai_cmd", procedure_name)));
        }
        if let Some(alias) = non_empty(&procedure.ai_cmd_alias) {
            return lookup_alias(config, alias, &format!("procedure.{}.ai_cmd_alias", procedure_name));
        }
    }

    if let Some(command) = non_empty(&config.loop_config.ai_cmd) {
        return Ok(direct(command, "loop.ai_cmd"));
    }
    if let Some(alias) = non_empty(&config.loop_config.ai_cmd_alias) {
        return lookup_alias(config, alias, "loop.ai_cmd_alias");
    }

    Err(RoodaError::NoAiCommand {
        available: config.alias_names(),
    })
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn direct(command: &str, source: &str) -> AiCommand {
    log::debug!("AI command from {}", source);
    AiCommand {
        command: command.to_string(),
        source: source.to_string(),
    }
}

fn lookup_alias(config: &Config, alias: &str, source: &str) -> Result<AiCommand> {
    match config.ai_cmd_aliases.get(alias) {
        Some(command) => {
            log::debug!("AI command from {} via alias '{}'", source, alias);
            Ok(AiCommand {
                command: command.clone(),
                source: format!("{}={}", source, alias),
            })
        }
        None => Err(RoodaError::UnknownAlias {
            alias: alias.to_string(),
            source_desc: source.to_string(),
            available: config.alias_names(),
        }),
    }
}

/// Effective iteration limits for one procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IterationSettings {
    pub mode: IterationMode,
    /// `None` when `mode` is unlimited.
    pub max_iterations: Option<u32>,
    /// Seconds per iteration, `None` for no limit.
    pub iteration_timeout: Option<u64>,
    pub max_output_buffer: usize,
    pub failure_threshold: u32,
}

impl Config {
    /// Iteration settings for `procedure`.
    ///
    /// Procedure overrides beat loop values, except that a loop value set on
    /// the command line beats both.
    pub fn iteration_settings(&self, procedure: &Procedure) -> IterationSettings {
        let loop_config = &self.loop_config;
        let from_cli = |path: &str| self.provenance.tier_of(path) == Some(ConfigTier::Cli);

        let mode = if from_cli("loop.iteration_mode") {
            loop_config.iteration_mode
        } else {
            procedure.iteration_mode.unwrap_or(loop_config.iteration_mode)
        };

        let max_iterations = match mode {
            IterationMode::Unlimited => None,
            IterationMode::MaxIterations if from_cli("loop.default_max_iterations") => {
                loop_config.default_max_iterations
            }
            IterationMode::MaxIterations => procedure
                .default_max_iterations
                .or(loop_config.default_max_iterations),
        };

        IterationSettings {
            mode,
            max_iterations,
            iteration_timeout: procedure.iteration_timeout.or(loop_config.iteration_timeout),
            max_output_buffer: procedure.max_output_buffer.unwrap_or(loop_config.max_output_buffer),
            failure_threshold: loop_config.failure_threshold,
        }
    }
}
