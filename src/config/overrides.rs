//! Command-line flag values (highest-precedence tier).
//!
//! Parsed and validated by the CLI layer; the library takes them as given.

use std::path::PathBuf;

use super::{LogLevel, Phase};

/// Flag values supplied for one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliFlags {
    /// `--max-iterations`
    pub max_iterations: Option<u32>,

    /// `--unlimited`
    pub unlimited: bool,

    /// `--ai-cmd`
    pub ai_cmd: Option<String>,

    /// `--ai-cmd-alias`
    pub ai_cmd_alias: Option<String>,

    /// `--context`, in the order given.
    pub contexts: Vec<String>,

    /// `--config`: alternate workspace config file.
    pub config_path: Option<PathBuf>,

    /// `--observe`
    pub observe: Vec<String>,

    /// `--orient`
    pub orient: Vec<String>,

    /// `--decide`
    pub decide: Vec<String>,

    /// `--act`
    pub act: Vec<String>,

    /// `--log-level`
    pub log_level: Option<LogLevel>,

    pub verbose: bool,

    pub quiet: bool,

    pub dry_run: bool,
}

impl CliFlags {
    /// No flags set.
    pub fn none() -> Self {
        Self::default()
    }

    /// Fragment values given for `phase`.
    pub fn phase_fragments(&self, phase: Phase) -> &[String] {
        match phase {
            Phase::Observe => &self.observe,
            Phase::Orient => &self.orient,
            Phase::Decide => &self.decide,
            Phase::Act => &self.act,
        }
    }

    /// All `--context` values joined as one user-context string.
    ///
    /// Values are separated by a blank line, so the composer splits them back
    /// apart.
    pub fn user_context(&self) -> String {
        self.contexts
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Log level implied by `--log-level`, `--verbose` or `--quiet`.
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.log_level.is_some() {
            self.log_level
        } else if self.verbose {
            Some(LogLevel::Debug)
        } else if self.quiet {
            Some(LogLevel::Error)
        } else {
            None
        }
    }
}

/// Builder for CliFlags.
#[derive(Debug, Default)]
pub struct CliFlagsBuilder {
    flags: CliFlags,
}

impl CliFlagsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_iterations(mut self, value: u32) -> Self {
        self.flags.max_iterations = Some(value);
        self
    }

    pub fn unlimited(mut self) -> Self {
        self.flags.unlimited = true;
        self
    }

    pub fn ai_cmd(mut self, cmd: impl Into<String>) -> Self {
        self.flags.ai_cmd = Some(cmd.into());
        self
    }

    pub fn ai_cmd_alias(mut self, alias: impl Into<String>) -> Self {
        self.flags.ai_cmd_alias = Some(alias.into());
        self
    }

    pub fn context(mut self, value: impl Into<String>) -> Self {
        self.flags.contexts.push(value.into());
        self
    }

    pub fn config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.flags.config_path = Some(path.into());
        self
    }

    pub fn fragment(mut self, phase: Phase, value: impl Into<String>) -> Self {
        let list = match phase {
            Phase::Observe => &mut self.flags.observe,
            Phase::Orient => &mut self.flags.orient,
            Phase::Decide => &mut self.flags.decide,
            Phase::Act => &mut self.flags.act,
        };
        list.push(value.into());
        self
    }

    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.flags.log_level = Some(level);
        self
    }

    pub fn verbose(mut self) -> Self {
        self.flags.verbose = true;
        self
    }

    pub fn quiet(mut self) -> Self {
        self.flags.quiet = true;
        self
    }

    pub fn dry_run(mut self) -> Self {
        self.flags.dry_run = true;
        self
    }

    pub fn build(self) -> CliFlags {
        self.flags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_flags() {
        let flags = CliFlags::none();
        assert!(flags.max_iterations.is_none());
        assert!(flags.effective_log_level().is_none());
        assert_eq!(flags.user_context(), "");
    }

    #[test]
    fn test_builder() {
        let flags = CliFlagsBuilder::new()
            .max_iterations(10)
            .ai_cmd_alias("claude")
            .fragment(Phase::Act, "builtin:fragments/act/emit_success.md")
            .dry_run()
            .build();

        assert_eq!(flags.max_iterations, Some(10));
        assert_eq!(flags.ai_cmd_alias.as_deref(), Some("claude"));
        assert_eq!(flags.phase_fragments(Phase::Act).len(), 1);
        assert!(flags.phase_fragments(Phase::Observe).is_empty());
        assert!(flags.dry_run);
    }

    #[test]
    fn test_user_context_joins_with_blank_line() {
        let flags = CliFlagsBuilder::new()
            .context("task.md")
            .context("  ")
            .context("focus on auth\n")
            .build();
        assert_eq!(flags.user_context(), "task.md\n\nfocus on auth");
    }

    #[test]
    fn test_effective_log_level_precedence() {
        let flags = CliFlagsBuilder::new().verbose().log_level(LogLevel::Warn).build();
        assert_eq!(flags.effective_log_level(), Some(LogLevel::Warn));

        let flags = CliFlagsBuilder::new().verbose().build();
        assert_eq!(flags.effective_log_level(), Some(LogLevel::Debug));

        let flags = CliFlagsBuilder::new().quiet().build();
        assert_eq!(flags.effective_log_level(), Some(LogLevel::Error));
    }
}
