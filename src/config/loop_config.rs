//! Loop-level configuration.
//!
//! Process-wide defaults that every procedure inherits unless it overrides
//! them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Built-in default for `loop.default_max_iterations`.
pub const DEFAULT_MAX_ITERATIONS: u32 = 5;

/// Built-in default for `loop.max_output_buffer` (10 MiB).
pub const DEFAULT_MAX_OUTPUT_BUFFER: usize = 10 * 1024 * 1024;

/// Built-in default for `loop.failure_threshold`.
pub const DEFAULT_FAILURE_THRESHOLD: u32 = 3;

/// Smallest accepted output buffer cap in bytes.
pub const MIN_OUTPUT_BUFFER: usize = 1024;

/// Whether iterations are capped or run until a signal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum IterationMode {
    /// Run up to the configured maximum.
    #[default]
    #[serde(rename = "max-iterations", alias = "bounded")]
    MaxIterations,
    /// Run until a SUCCESS signal, the failure threshold, or interrupt.
    #[serde(rename = "unlimited")]
    Unlimited,
}

impl IterationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            IterationMode::MaxIterations => "max-iterations",
            IterationMode::Unlimited => "unlimited",
        }
    }
}

impl fmt::Display for IterationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IterationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "max-iterations" | "bounded" => Ok(IterationMode::MaxIterations),
            "unlimited" => Ok(IterationMode::Unlimited),
            other => Err(format!("unknown iteration mode '{}' (expected max-iterations or unlimited)", other)),
        }
    }
}

/// Verbosity of loop logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level '{}' (expected debug, info, warn or error)", other)),
        }
    }
}

/// Format for log line timestamps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimestampFormat {
    /// `[HH:MM:SS.mmm]`
    #[default]
    Time,
    /// Same as `Time`.
    TimeMs,
    /// `[+1.234s]` since process start
    Relative,
    /// RFC 3339 with milliseconds
    Iso,
    None,
}

impl TimestampFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimestampFormat::Time => "time",
            TimestampFormat::TimeMs => "time-ms",
            TimestampFormat::Relative => "relative",
            TimestampFormat::Iso => "iso",
            TimestampFormat::None => "none",
        }
    }
}

impl fmt::Display for TimestampFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimestampFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "time" => Ok(TimestampFormat::Time),
            "time-ms" => Ok(TimestampFormat::TimeMs),
            "relative" => Ok(TimestampFormat::Relative),
            "iso" => Ok(TimestampFormat::Iso),
            "none" => Ok(TimestampFormat::None),
            other => Err(format!(
                "unknown timestamp format '{}' (expected time, time-ms, relative, iso or none)",
                other
            )),
        }
    }
}

/// Effective loop settings after all tiers are merged.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LoopConfig {
    /// Bounded or unlimited iteration.
    pub iteration_mode: IterationMode,

    /// Maximum iterations in bounded mode. `None` only if explicitly cleared.
    pub default_max_iterations: Option<u32>,

    /// Per-iteration timeout in seconds. `None` means no timeout.
    pub iteration_timeout: Option<u64>,

    /// Cap on captured AI output in bytes.
    pub max_output_buffer: usize,

    /// Consecutive failures before the loop aborts.
    pub failure_threshold: u32,

    pub log_level: LogLevel,

    pub log_timestamp_format: TimestampFormat,

    /// Stream AI CLI output to the terminal.
    pub show_ai_output: bool,

    /// Default AI command (direct command string).
    pub ai_cmd: Option<String>,

    /// Default AI command alias, resolved against the alias map.
    pub ai_cmd_alias: Option<String>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            iteration_mode: IterationMode::default(),
            default_max_iterations: Some(DEFAULT_MAX_ITERATIONS),
            iteration_timeout: None,
            max_output_buffer: DEFAULT_MAX_OUTPUT_BUFFER,
            failure_threshold: DEFAULT_FAILURE_THRESHOLD,
            log_level: LogLevel::default(),
            log_timestamp_format: TimestampFormat::default(),
            show_ai_output: false,
            ai_cmd: None,
            ai_cmd_alias: None,
        }
    }
}
