//! Environment snapshot and config file locations.
//!
//! The merger never calls `std::env` itself; it reads from an `Environment`
//! captured once by the caller, so tests can supply their own.

use std::collections::HashMap;
use std::path::PathBuf;

/// Config file name used for both global and workspace tiers.
pub const CONFIG_FILE_NAME: &str = "rooda-config.yml";

/// Overrides the global config directory outright.
pub const CONFIG_HOME_VAR: &str = "ROODA_CONFIG_HOME";

/// XDG base; `rooda/` is appended.
pub const XDG_CONFIG_HOME_VAR: &str = "XDG_CONFIG_HOME";

/// Prefix for every rooda setting variable.
pub const ENV_PREFIX: &str = "ROODA_";

/// Subdirectory of the config home holding rooda's files.
const CONFIG_SUBDIR: &str = "rooda";

/// Snapshot of environment variables.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    vars: HashMap<String, String>,
}

impl Environment {
    /// Capture the current process environment.
    pub fn from_process() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    /// Build an environment from explicit pairs.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            vars: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    /// Value of `name`, treating empty strings as unset.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str).filter(|v| !v.is_empty())
    }

    /// `ROODA_<SECTION>_<FIELD>` for a section and snake_case field.
    pub fn setting_var(section: &str, field: &str) -> String {
        format!("{}{}_{}", ENV_PREFIX, section.to_uppercase(), field.to_uppercase())
    }

    /// Directory holding the global config file.
    ///
    /// `$ROODA_CONFIG_HOME`, else `$XDG_CONFIG_HOME/rooda`, else the platform
    /// config directory joined with `rooda`.
    pub fn global_config_dir(&self) -> Option<PathBuf> {
        if let Some(dir) = self.get(CONFIG_HOME_VAR) {
            return Some(PathBuf::from(dir));
        }
        if let Some(xdg) = self.get(XDG_CONFIG_HOME_VAR) {
            return Some(PathBuf::from(xdg).join(CONFIG_SUBDIR));
        }
        dirs::config_dir().map(|dir| dir.join(CONFIG_SUBDIR))
    }

    /// Full path of the global config file.
    pub fn global_config_path(&self) -> Option<PathBuf> {
        self.global_config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
    }
}
