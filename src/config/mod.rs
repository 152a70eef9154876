//! Configuration system for rooda.
//!
//! Five-tier configuration, lowest precedence first:
//! 1. Built-in defaults (compiled in)
//! 2. Global config (`$ROODA_CONFIG_HOME`, `$XDG_CONFIG_HOME/rooda` or the
//!    platform config dir, file `rooda-config.yml`)
//! 3. Workspace config (`./rooda-config.yml` or `--config <path>`)
//! 4. `ROODA_LOOP_*` environment variables
//! 5. CLI flags
//!
//! Every effective setting carries a provenance record naming the tier (and
//! file) it came from.

use std::collections::BTreeMap;

pub use self::environment::{CONFIG_FILE_NAME, CONFIG_HOME_VAR, ENV_PREFIX, Environment, XDG_CONFIG_HOME_VAR};
pub use self::loader::{ConfigLoader, load_config};
pub use self::loop_config::{
    DEFAULT_FAILURE_THRESHOLD, DEFAULT_MAX_ITERATIONS, DEFAULT_MAX_OUTPUT_BUFFER, IterationMode, LogLevel,
    LoopConfig, MIN_OUTPUT_BUFFER, TimestampFormat,
};
pub use self::merged::Config;
pub use self::overrides::{CliFlags, CliFlagsBuilder};
pub use self::procedure::{FragmentAction, Phase, Procedure};
pub use self::resolution::{AiCommand, IterationSettings, resolve_ai_command};
pub use self::schema::{ConfigFile, LoopSection, PhaseSpec, RawProcedure};
pub use self::tier::{ConfigSource, ConfigTier, Origin, Provenance};

mod environment;
mod loader;
mod loop_config;
mod merged;
mod overrides;
mod procedure;
mod resolution;
mod schema;
mod tier;

/// Built-in AI command aliases.
pub fn builtin_aliases() -> BTreeMap<String, String> {
    [
        ("claude", "claude -p --dangerously-skip-permissions"),
        ("copilot", "copilot --yolo"),
        (
            "cursor-agent",
            "cursor-agent -p -f --stream-partial-output --output-format stream-json",
        ),
        ("kiro-cli", "kiro-cli chat --no-interactive --trust-all-tools"),
    ]
    .into_iter()
    .map(|(name, command)| (name.to_string(), command.to_string()))
    .collect()
}
