//! The fully merged configuration.

use std::collections::BTreeMap;

use super::{ConfigTier, LoopConfig, Origin, Procedure, Provenance};
use crate::error::{Result, RoodaError};

/// Authoritative configuration for one invocation.
///
/// Built once by [`super::ConfigLoader`] and not mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Loop-level settings.
    pub loop_config: LoopConfig,

    /// Procedure name to canonical procedure.
    pub procedures: BTreeMap<String, Procedure>,

    /// Alias name to full command string.
    pub ai_cmd_aliases: BTreeMap<String, String>,

    /// Setting path to the source currently in effect.
    pub provenance: Provenance,
}

impl Default for Config {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Config {
    /// Pure built-in defaults with built-in provenance for every setting.
    pub fn builtin() -> Self {
        let origin = Origin::new(ConfigTier::BuiltIn);
        let loop_config = LoopConfig::default();
        let mut provenance = Provenance::new();
        record_loop_config(&mut provenance, &loop_config, &origin);

        let ai_cmd_aliases = super::builtin_aliases();
        for (name, command) in &ai_cmd_aliases {
            provenance.record(format!("ai_cmd_aliases.{}", name), &origin, command.as_str());
        }

        let procedures = crate::procedures::builtin_procedures();
        for (name, procedure) in &procedures {
            provenance.record(format!("procedures.{}", name), &origin, procedure.display.as_str());
        }

        Self {
            loop_config,
            procedures,
            ai_cmd_aliases,
            provenance,
        }
    }

    /// Look up a procedure by name.
    pub fn procedure(&self, name: &str) -> Result<&Procedure> {
        self.procedures.get(name).ok_or_else(|| RoodaError::UnknownProcedure {
            name: name.to_string(),
            available: self.procedure_names(),
        })
    }

    /// Procedure names, sorted.
    pub fn procedure_names(&self) -> Vec<String> {
        self.procedures.keys().cloned().collect()
    }

    /// Alias names, sorted.
    pub fn alias_names(&self) -> Vec<String> {
        self.ai_cmd_aliases.keys().cloned().collect()
    }
}

/// Record every loop field as supplied by `origin`.
fn record_loop_config(provenance: &mut Provenance, config: &LoopConfig, origin: &Origin) {
    provenance.record("loop.iteration_mode", origin, config.iteration_mode.as_str());
    provenance.record(
        "loop.default_max_iterations",
        origin,
        optional(config.default_max_iterations.map(u64::from)),
    );
    provenance.record("loop.iteration_timeout", origin, optional(config.iteration_timeout));
    provenance.record("loop.max_output_buffer", origin, config.max_output_buffer as u64);
    provenance.record("loop.failure_threshold", origin, u64::from(config.failure_threshold));
    provenance.record("loop.log_level", origin, config.log_level.as_str());
    provenance.record("loop.log_timestamp_format", origin, config.log_timestamp_format.as_str());
    provenance.record("loop.show_ai_output", origin, config.show_ai_output);
    provenance.record("loop.ai_cmd", origin, optional(config.ai_cmd.clone()));
    provenance.record("loop.ai_cmd_alias", origin, optional(config.ai_cmd_alias.clone()));
}

pub(crate) fn optional<T: Into<serde_yaml::Value>>(value: Option<T>) -> serde_yaml::Value {
    value.map(Into::into).unwrap_or(serde_yaml::Value::Null)
}
