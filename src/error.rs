//! Error types for rooda
//!
//! Centralized error handling using thiserror. Every library component returns
//! one of these; only the binary decides how to report them.

use std::path::PathBuf;

use thiserror::Error;

/// Broad category of a failure, used by the CLI to pick an exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller asked for something that does not exist
    User,
    /// Config file content or a setting value is invalid
    Config,
    /// No AI command could be resolved
    Resolution,
    /// A prompt could not be assembled
    Assembly,
    /// Underlying I/O failure
    Io,
}

/// All error types that can occur in rooda
#[derive(Debug, Error)]
pub enum RoodaError {
    /// Config file is not valid YAML or does not match the schema
    #[error("failed to parse config file {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// A setting has an out-of-range or unparsable value
    #[error("invalid value for {setting} (from {origin}): {reason}")]
    InvalidSetting {
        setting: String,
        origin: String,
        reason: String,
    },

    /// Alias name not present in the merged alias map
    #[error("unknown AI command alias: {alias} (from {source_desc})\nAvailable: {}", .available.join(", "))]
    UnknownAlias {
        alias: String,
        source_desc: String,
        available: Vec<String>,
    },

    /// Nothing in the precedence chain named a command
    #[error(
        "no AI command configured\n\n\
         Set one via:\n  \
         --ai-cmd \"your-command\"           CLI flag (direct command)\n  \
         --ai-cmd-alias <name>             CLI flag (alias from config)\n  \
         ROODA_LOOP_AI_CMD=your-command    Environment variable\n  \
         ROODA_LOOP_AI_CMD_ALIAS=<name>    Environment variable\n  \
         loop.ai_cmd or loop.ai_cmd_alias  rooda-config.yml\n  \
         procedure.ai_cmd or ai_cmd_alias  rooda-config.yml\n\n\
         Available aliases: {}", .available.join(", ")
    )]
    NoAiCommand { available: Vec<String> },

    /// Procedure name not present in the merged procedure map
    #[error("unknown procedure: {name}\nAvailable: {}", .available.join(", "))]
    UnknownProcedure { name: String, available: Vec<String> },

    /// `builtin:` reference with no embedded resource behind it
    #[error("built-in fragment not found: {0}")]
    BuiltinFragmentNotFound(String),

    /// Filesystem fragment reference that does not resolve to a file
    #[error("fragment file not found: {reference} (resolved to {})", .resolved.display())]
    FragmentFileNotFound { reference: String, resolved: PathBuf },

    /// Fragment reference was the empty string
    #[error("fragment reference is empty")]
    EmptyFragmentReference,

    /// Fragment action with neither inline content nor a path
    #[error("fragment must specify either content or path")]
    EmptyFragmentAction,

    /// Template parse or render failure
    #[error("template error: {0}")]
    Template(String),

    /// Failure while composing one phase of a prompt
    #[error("failed to compose {phase} phase")]
    PhaseComposition {
        phase: String,
        #[source]
        source: Box<RoodaError>,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RoodaError {
    /// Classify this error for exit code selection.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ConfigParse { .. } | Self::InvalidSetting { .. } => ErrorKind::Config,
            Self::UnknownAlias { .. } | Self::NoAiCommand { .. } => ErrorKind::Resolution,
            Self::UnknownProcedure { .. } => ErrorKind::User,
            Self::BuiltinFragmentNotFound(_)
            | Self::FragmentFileNotFound { .. }
            | Self::EmptyFragmentReference
            | Self::EmptyFragmentAction
            | Self::Template(_)
            | Self::PhaseComposition { .. } => ErrorKind::Assembly,
            Self::Io(_) => ErrorKind::Io,
        }
    }

    pub(crate) fn invalid_setting(
        setting: impl Into<String>,
        origin: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidSetting {
            setting: setting.into(),
            origin: origin.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for rooda operations
pub type Result<T> = std::result::Result<T, RoodaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_alias_lists_available() {
        let err = RoodaError::UnknownAlias {
            alias: "nope".to_string(),
            source_desc: "--ai-cmd-alias flag".to_string(),
            available: vec!["claude".to_string(), "copilot".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "unknown AI command alias: nope (from --ai-cmd-alias flag)\nAvailable: claude, copilot"
        );
        assert_eq!(err.kind(), ErrorKind::Resolution);
    }

    #[test]
    fn test_no_ai_command_mentions_every_surface() {
        let err = RoodaError::NoAiCommand {
            available: vec!["claude".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.starts_with("no AI command configured"));
        assert!(msg.contains("--ai-cmd \"your-command\""));
        assert!(msg.contains("--ai-cmd-alias <name>"));
        assert!(msg.contains("ROODA_LOOP_AI_CMD=your-command"));
        assert!(msg.contains("ROODA_LOOP_AI_CMD_ALIAS=<name>"));
        assert!(msg.contains("loop.ai_cmd or loop.ai_cmd_alias"));
        assert!(msg.contains("procedure.ai_cmd or ai_cmd_alias"));
        assert!(msg.ends_with("Available aliases: claude"));
    }

    #[test]
    fn test_fragment_file_not_found_includes_resolved_path() {
        let err = RoodaError::FragmentFileNotFound {
            reference: "missing.md".to_string(),
            resolved: PathBuf::from("/work/missing.md"),
        };
        assert_eq!(
            err.to_string(),
            "fragment file not found: missing.md (resolved to /work/missing.md)"
        );
        assert_eq!(err.kind(), ErrorKind::Assembly);
    }

    #[test]
    fn test_phase_composition_wraps_cause() {
        let err = RoodaError::PhaseComposition {
            phase: "OBSERVE".to_string(),
            source: Box::new(RoodaError::EmptyFragmentAction),
        };
        assert_eq!(err.to_string(), "failed to compose OBSERVE phase");
        let cause = std::error::Error::source(&err).unwrap();
        assert_eq!(cause.to_string(), "fragment must specify either content or path");
        assert_eq!(err.kind(), ErrorKind::Assembly);
    }

    #[test]
    fn test_invalid_setting_is_config_kind() {
        let err = RoodaError::invalid_setting("loop.failure_threshold", "env", "must be >= 1");
        assert_eq!(
            err.to_string(),
            "invalid value for loop.failure_threshold (from env): must be >= 1"
        );
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: RoodaError = io_err.into();
        assert!(matches!(err, RoodaError::Io(_)));
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.to_string().contains("file not found"));
    }
}
