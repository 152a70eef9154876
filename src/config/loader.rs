//! Multi-tier configuration merge.
//!
//! Tiers, lowest precedence first:
//! 1. Built-in defaults
//! 2. Global config file
//! 3. Workspace config file (or `--config` path)
//! 4. `ROODA_LOOP_*` environment variables
//! 5. CLI flags
//!
//! Loop settings merge per field. Aliases merge per key. Procedures merge per
//! name, a same-named procedure replacing the earlier one wholesale.

use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::merged::optional;
use super::schema::{ConfigFile, LoopSection, rebase_fragment_paths};
use super::{
    CONFIG_FILE_NAME, CliFlags, Config, ConfigTier, Environment, IterationMode, MIN_OUTPUT_BUFFER, Origin, Procedure,
};
use crate::error::{Result, RoodaError};

/// Loads and merges configuration for one invocation.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    env: Environment,
    workspace_dir: PathBuf,
}

impl ConfigLoader {
    /// Create a loader reading from `env` with `workspace_dir` as the
    /// workspace root.
    pub fn new(env: Environment, workspace_dir: impl Into<PathBuf>) -> Self {
        Self {
            env,
            workspace_dir: workspace_dir.into(),
        }
    }

    pub fn workspace_dir(&self) -> &Path {
        &self.workspace_dir
    }

    /// Workspace config path: `--config` if given, else `./rooda-config.yml`.
    pub fn workspace_config_path(&self, flags: &CliFlags) -> PathBuf {
        match &flags.config_path {
            Some(path) => self.workspace_dir.join(path),
            None => self.workspace_dir.join(CONFIG_FILE_NAME),
        }
    }

    /// Merge all five tiers into one `Config`.
    ///
    /// Missing files are skipped. Malformed files and out-of-range values are
    /// errors.
    pub fn load(&self, flags: &CliFlags) -> Result<Config> {
        let mut config = Config::builtin();

        match self.env.global_config_path() {
            Some(path) => self.apply_file(&mut config, &path, ConfigTier::Global)?,
            None => log::debug!("No global config directory could be determined"),
        }

        let workspace_path = self.workspace_config_path(flags);
        self.apply_file(&mut config, &workspace_path, ConfigTier::Workspace)?;

        let env_section = self.env_loop_section()?;
        apply_loop_section(&mut config, &env_section, &Origin::new(ConfigTier::Env))?;

        apply_loop_section(&mut config, &cli_loop_section(flags), &Origin::new(ConfigTier::Cli))?;

        Ok(config)
    }

    /// Apply one config file tier. Missing files are a no-op.
    fn apply_file(&self, config: &mut Config, path: &Path, tier: ConfigTier) -> Result<()> {
        let Some(file) = ConfigFile::read(path)? else {
            log::debug!("No {} config at {}", tier, path.display());
            return Ok(());
        };
        log::debug!("Loaded {} config from {}", tier, path.display());

        let origin = Origin::file(tier, path);
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));

        if let Some(section) = &file.loop_config {
            apply_loop_section(config, section, &origin)?;
        }

        if let Some(aliases) = file.ai_cmd_aliases {
            for (name, command) in aliases {
                log::debug!("Alias '{}' set by {}", name, origin);
                config
                    .provenance
                    .record(format!("ai_cmd_aliases.{}", name), &origin, command.as_str());
                config.ai_cmd_aliases.insert(name, command);
            }
        }

        if let Some(procedures) = file.procedures {
            for (name, raw) in procedures {
                let mut procedure = raw.normalize();
                rebase_fragment_paths(&mut procedure, base_dir);
                validate_procedure(&name, &procedure, &origin)?;
                if config.procedures.contains_key(&name) {
                    log::debug!("Procedure '{}' replaced by {}", name, origin);
                }
                config
                    .provenance
                    .record(format!("procedures.{}", name), &origin, procedure.display.as_str());
                config.procedures.insert(name, procedure);
            }
        }

        Ok(())
    }

    /// Collect `ROODA_LOOP_*` variables into a loop section.
    fn env_loop_section(&self) -> Result<LoopSection> {
        Ok(LoopSection {
            iteration_mode: self.env_setting("iteration_mode")?,
            default_max_iterations: self.env_setting("default_max_iterations")?,
            iteration_timeout: self.env_setting("iteration_timeout")?,
            max_output_buffer: self.env_setting("max_output_buffer")?,
            failure_threshold: self.env_setting("failure_threshold")?,
            log_level: self.env_setting("log_level")?,
            log_timestamp_format: self.env_setting("log_timestamp_format")?,
            show_ai_output: self.env_setting::<EnvBool>("show_ai_output")?.map(|b| b.0),
            ai_cmd: self.env_setting("ai_cmd")?,
            ai_cmd_alias: self.env_setting("ai_cmd_alias")?,
        })
    }

    fn env_setting<T>(&self, field: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: Display,
    {
        let var = Environment::setting_var("loop", field);
        match self.env.get(&var) {
            None => Ok(None),
            Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|e| {
                RoodaError::invalid_setting(format!("loop.{}", field), format!("env {}", var), e.to_string())
            }),
        }
    }
}

/// Load configuration using the process environment and current directory.
pub fn load_config(flags: &CliFlags) -> Result<Config> {
    let workspace_dir = std::env::current_dir()?;
    ConfigLoader::new(Environment::from_process(), workspace_dir).load(flags)
}

/// Boolean as accepted from an environment variable.
struct EnvBool(bool);

impl FromStr for EnvBool {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(EnvBool(true)),
            "0" | "false" | "no" | "off" => Ok(EnvBool(false)),
            other => Err(format!("expected a boolean, got '{}'", other)),
        }
    }
}

/// Loop section implied by CLI flags.
fn cli_loop_section(flags: &CliFlags) -> LoopSection {
    LoopSection {
        iteration_mode: if flags.unlimited {
            Some(IterationMode::Unlimited)
        } else {
            flags.max_iterations.map(|_| IterationMode::MaxIterations)
        },
        default_max_iterations: flags.max_iterations,
        log_level: flags.effective_log_level(),
        show_ai_output: flags.verbose.then_some(true),
        ai_cmd: flags.ai_cmd.clone().filter(|s| !s.is_empty()),
        ai_cmd_alias: flags.ai_cmd_alias.clone().filter(|s| !s.is_empty()),
        ..Default::default()
    }
}

/// Apply every field present in `section`, recording `origin` for each.
fn apply_loop_section(config: &mut Config, section: &LoopSection, origin: &Origin) -> Result<()> {
    let loop_config = &mut config.loop_config;
    let provenance = &mut config.provenance;

    if let Some(mode) = section.iteration_mode {
        loop_config.iteration_mode = mode;
        provenance.record("loop.iteration_mode", origin, mode.as_str());
    }
    if let Some(n) = section.default_max_iterations {
        check_min("loop.default_max_iterations", u64::from(n), 1, origin)?;
        loop_config.default_max_iterations = Some(n);
        provenance.record("loop.default_max_iterations", origin, u64::from(n));
    }
    if let Some(secs) = section.iteration_timeout {
        check_min("loop.iteration_timeout", secs, 1, origin)?;
        loop_config.iteration_timeout = Some(secs);
        provenance.record("loop.iteration_timeout", origin, secs);
    }
    if let Some(bytes) = section.max_output_buffer {
        check_min("loop.max_output_buffer", bytes as u64, MIN_OUTPUT_BUFFER as u64, origin)?;
        loop_config.max_output_buffer = bytes;
        provenance.record("loop.max_output_buffer", origin, bytes as u64);
    }
    if let Some(n) = section.failure_threshold {
        check_min("loop.failure_threshold", u64::from(n), 1, origin)?;
        loop_config.failure_threshold = n;
        provenance.record("loop.failure_threshold", origin, u64::from(n));
    }
    if let Some(level) = section.log_level {
        loop_config.log_level = level;
        provenance.record("loop.log_level", origin, level.as_str());
    }
    if let Some(format) = section.log_timestamp_format {
        loop_config.log_timestamp_format = format;
        provenance.record("loop.log_timestamp_format", origin, format.as_str());
    }
    if let Some(show) = section.show_ai_output {
        loop_config.show_ai_output = show;
        provenance.record("loop.show_ai_output", origin, show);
    }
    if let Some(cmd) = section.ai_cmd.as_ref().filter(|s| !s.is_empty()) {
        loop_config.ai_cmd = Some(cmd.clone());
        provenance.record("loop.ai_cmd", origin, optional(Some(cmd.as_str())));
    }
    if let Some(alias) = section.ai_cmd_alias.as_ref().filter(|s| !s.is_empty()) {
        loop_config.ai_cmd_alias = Some(alias.clone());
        provenance.record("loop.ai_cmd_alias", origin, alias.as_str());
    }

    Ok(())
}

/// Check the bounds on a procedure's optional overrides.
fn validate_procedure(name: &str, procedure: &Procedure, origin: &Origin) -> Result<()> {
    if let Some(n) = procedure.default_max_iterations {
        check_min(
            &format!("procedures.{}.default_max_iterations", name),
            u64::from(n),
            1,
            origin,
        )?;
    }
    if let Some(secs) = procedure.iteration_timeout {
        check_min(&format!("procedures.{}.iteration_timeout", name), secs, 1, origin)?;
    }
    if let Some(bytes) = procedure.max_output_buffer {
        check_min(
            &format!("procedures.{}.max_output_buffer", name),
            bytes as u64,
            MIN_OUTPUT_BUFFER as u64,
            origin,
        )?;
    }
    Ok(())
}

fn check_min(setting: &str, value: u64, min: u64, origin: &Origin) -> Result<()> {
    if value < min {
        return Err(RoodaError::invalid_setting(
            setting,
            origin.to_string(),
            format!("must be >= {}, got {}", min, value),
        ));
    }
    Ok(())
}
