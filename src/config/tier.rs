//! Configuration tiers and provenance tracking.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// One of the five ranked configuration sources, lowest precedence first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConfigTier {
    /// Compiled-in default value.
    BuiltIn,
    /// `<config_dir>/rooda-config.yml`
    Global,
    /// `./rooda-config.yml` or the `--config` path
    Workspace,
    /// `ROODA_*` environment variables
    Env,
    /// Command-line flag values
    Cli,
}

impl ConfigTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigTier::BuiltIn => "built-in",
            ConfigTier::Global => "global",
            ConfigTier::Workspace => "workspace",
            ConfigTier::Env => "env",
            ConfigTier::Cli => "cli",
        }
    }

    /// Whether values from this tier come out of a file.
    pub fn is_file_backed(&self) -> bool {
        matches!(self, ConfigTier::Global | ConfigTier::Workspace)
    }
}

impl fmt::Display for ConfigTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a tier's values were read from.
///
/// Carries the file path for global/workspace tiers; `None` otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    pub tier: ConfigTier,
    pub file: Option<PathBuf>,
}

impl Origin {
    pub fn new(tier: ConfigTier) -> Self {
        Self { tier, file: None }
    }

    pub fn file(tier: ConfigTier, path: impl Into<PathBuf>) -> Self {
        Self {
            tier,
            file: Some(path.into()),
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file {
            Some(path) => write!(f, "{} {}", self.tier, path.display()),
            None => write!(f, "{}", self.tier),
        }
    }
}

/// One provenance record: which tier/file supplied the value now in effect.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigSource {
    pub tier: ConfigTier,
    /// Empty unless `tier` is global or workspace.
    pub file: Option<PathBuf>,
    pub value: serde_yaml::Value,
}

/// Setting path (e.g. `loop.default_max_iterations`) to the source in effect.
///
/// Built incrementally as tiers are applied; a later `record` for the same
/// path replaces the earlier one.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Provenance {
    entries: BTreeMap<String, ConfigSource>,
}

impl Provenance {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `origin` supplied `value` for `path`.
    pub fn record(&mut self, path: impl Into<String>, origin: &Origin, value: impl Into<serde_yaml::Value>) {
        let file = if origin.tier.is_file_backed() {
            origin.file.clone()
        } else {
            None
        };
        self.entries.insert(
            path.into(),
            ConfigSource {
                tier: origin.tier,
                file,
                value: value.into(),
            },
        );
    }

    pub fn get(&self, path: &str) -> Option<&ConfigSource> {
        self.entries.get(path)
    }

    /// Tier that supplied `path`, if recorded.
    pub fn tier_of(&self, path: &str) -> Option<ConfigTier> {
        self.entries.get(path).map(|s| s.tier)
    }

    /// File that supplied `path`, if it came from a file-backed tier.
    pub fn file_of(&self, path: &str) -> Option<&Path> {
        self.entries.get(path).and_then(|s| s.file.as_deref())
    }

    /// Entries in setting-path order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigSource)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_ordering_matches_precedence() {
        assert!(ConfigTier::BuiltIn < ConfigTier::Global);
        assert!(ConfigTier::Global < ConfigTier::Workspace);
        assert!(ConfigTier::Workspace < ConfigTier::Env);
        assert!(ConfigTier::Env < ConfigTier::Cli);
    }

    #[test]
    fn test_tier_display() {
        assert_eq!(ConfigTier::BuiltIn.to_string(), "built-in");
        assert_eq!(ConfigTier::Global.to_string(), "global");
        assert_eq!(ConfigTier::Workspace.to_string(), "workspace");
        assert_eq!(ConfigTier::Env.to_string(), "env");
        assert_eq!(ConfigTier::Cli.to_string(), "cli");
    }

    #[test]
    fn test_record_replaces_previous_entry() {
        let mut provenance = Provenance::new();
        provenance.record("loop.failure_threshold", &Origin::new(ConfigTier::BuiltIn), 3u64);
        provenance.record(
            "loop.failure_threshold",
            &Origin::file(ConfigTier::Workspace, "/w/rooda-config.yml"),
            5u64,
        );

        assert_eq!(provenance.len(), 1);
        let source = provenance.get("loop.failure_threshold").unwrap();
        assert_eq!(source.tier, ConfigTier::Workspace);
        assert_eq!(source.file, Some(PathBuf::from("/w/rooda-config.yml")));
        assert_eq!(source.value, serde_yaml::Value::from(5u64));
    }

    #[test]
    fn test_file_dropped_for_non_file_tiers() {
        let mut provenance = Provenance::new();
        let origin = Origin {
            tier: ConfigTier::Env,
            file: Some(PathBuf::from("/ignored")),
        };
        provenance.record("loop.ai_cmd", &origin, "x");
        assert!(provenance.file_of("loop.ai_cmd").is_none());
        assert_eq!(provenance.tier_of("loop.ai_cmd"), Some(ConfigTier::Env));
    }

    #[test]
    fn test_origin_display() {
        assert_eq!(Origin::new(ConfigTier::Cli).to_string(), "cli");
        assert_eq!(
            Origin::file(ConfigTier::Global, "/home/u/.config/rooda/rooda-config.yml").to_string(),
            "global /home/u/.config/rooda/rooda-config.yml"
        );
    }
}
