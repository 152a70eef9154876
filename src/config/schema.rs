//! On-disk config file schema and the procedure schema normalizer.
//!
//! Every field is optional here so the merger can tell "absent" from "set to
//! the default". Procedure phases accept two generations of schema:
//!
//! ```yaml
//! procedures:
//!   legacy:
//!     observe: prompts/observe.md          # single path string
//!   canonical:
//!     observe:
//!       - path: prompts/observe.md         # list of fragment actions
//!       - content: "Inline text"
//! ```
//!
//! [`RawProcedure::normalize`] turns both into [`Procedure`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::{FragmentAction, IterationMode, LogLevel, Phase, Procedure, TimestampFormat};
use crate::error::{Result, RoodaError};
use crate::prompt::BUILTIN_PREFIX;

/// Top-level shape of `rooda-config.yml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(rename = "loop")]
    pub loop_config: Option<LoopSection>,
    pub procedures: Option<BTreeMap<String, RawProcedure>>,
    pub ai_cmd_aliases: Option<BTreeMap<String, String>>,
}

impl ConfigFile {
    /// Parse YAML content. `path` is only used in the error.
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        // An empty or comment-only file is a valid, empty config.
        if content
            .lines()
            .map(str::trim)
            .all(|line| line.is_empty() || line.starts_with('#'))
        {
            return Ok(Self::default());
        }
        let parsed: Option<Self> = serde_yaml::from_str(content).map_err(|e| RoodaError::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(parsed.unwrap_or_default())
    }

    /// Read and parse a config file. `Ok(None)` if it does not exist.
    pub fn read(path: &Path) -> Result<Option<Self>> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Self::parse(&content, path).map(Some)
    }
}

/// `loop:` section as written in a file. Absent keys stay `None`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoopSection {
    pub iteration_mode: Option<IterationMode>,
    pub default_max_iterations: Option<u32>,
    pub iteration_timeout: Option<u64>,
    pub max_output_buffer: Option<usize>,
    pub failure_threshold: Option<u32>,
    pub log_level: Option<LogLevel>,
    pub log_timestamp_format: Option<TimestampFormat>,
    pub show_ai_output: Option<bool>,
    pub ai_cmd: Option<String>,
    pub ai_cmd_alias: Option<String>,
}

/// A phase value in either schema generation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PhaseSpec {
    /// Legacy form: one fragment, used as a path.
    Legacy(String),
    /// Canonical form: ordered fragment actions.
    Fragments(Vec<FragmentAction>),
}

impl Default for PhaseSpec {
    fn default() -> Self {
        PhaseSpec::Fragments(Vec::new())
    }
}

impl PhaseSpec {
    pub fn normalize(self) -> Vec<FragmentAction> {
        match self {
            PhaseSpec::Legacy(path) => vec![FragmentAction::from_path(path)],
            PhaseSpec::Fragments(actions) => actions,
        }
    }
}

/// A procedure as written in a file, before normalization.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawProcedure {
    pub display: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub observe: PhaseSpec,
    pub orient: PhaseSpec,
    pub decide: PhaseSpec,
    pub act: PhaseSpec,
    pub iteration_mode: Option<IterationMode>,
    pub default_max_iterations: Option<u32>,
    pub iteration_timeout: Option<u64>,
    pub max_output_buffer: Option<usize>,
    pub ai_cmd: Option<String>,
    pub ai_cmd_alias: Option<String>,
}

impl RawProcedure {
    /// Convert to canonical form. Canonical input passes through unchanged.
    pub fn normalize(self) -> Procedure {
        Procedure {
            display: self.display.unwrap_or_default(),
            summary: self.summary.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            observe: self.observe.normalize(),
            orient: self.orient.normalize(),
            decide: self.decide.normalize(),
            act: self.act.normalize(),
            iteration_mode: self.iteration_mode,
            default_max_iterations: self.default_max_iterations,
            iteration_timeout: self.iteration_timeout,
            max_output_buffer: self.max_output_buffer,
            ai_cmd: self.ai_cmd.filter(|s| !s.is_empty()),
            ai_cmd_alias: self.ai_cmd_alias.filter(|s| !s.is_empty()),
        }
    }
}

/// Rebase relative filesystem fragment paths onto `base_dir`.
///
/// `builtin:` references and absolute paths are left alone.
pub fn rebase_fragment_paths(procedure: &mut Procedure, base_dir: &Path) {
    for phase in Phase::ALL {
        for action in procedure.fragments_mut(phase) {
            if let Some(path) = &action.path
                && !path.is_empty()
                && !path.starts_with(BUILTIN_PREFIX)
                && Path::new(path).is_relative()
            {
                let rebased: PathBuf = base_dir.join(path);
                action.path = Some(rebased.to_string_lossy().into_owned());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> ConfigFile {
        ConfigFile::parse(yaml, Path::new("test.yml")).unwrap()
    }

    #[test]
    fn test_legacy_string_phases_normalize_to_single_path() {
        let file = parse(
            r#"
procedures:
  bootstrap:
    display: "Bootstrap Repository"
    observe: prompts/observe_bootstrap.md
    orient: prompts/orient_bootstrap.md
    decide: prompts/decide_bootstrap.md
    act: prompts/act_bootstrap.md
    default_max_iterations: 1
"#,
        );
        let proc = file.procedures.unwrap().remove("bootstrap").unwrap().normalize();

        assert_eq!(proc.display, "Bootstrap Repository");
        assert_eq!(proc.observe, vec![FragmentAction::from_path("prompts/observe_bootstrap.md")]);
        assert_eq!(proc.orient, vec![FragmentAction::from_path("prompts/orient_bootstrap.md")]);
        assert_eq!(proc.decide, vec![FragmentAction::from_path("prompts/decide_bootstrap.md")]);
        assert_eq!(proc.act, vec![FragmentAction::from_path("prompts/act_bootstrap.md")]);
        assert_eq!(proc.default_max_iterations, Some(1));
    }

    #[test]
    fn test_canonical_phases_pass_through() {
        let file = parse(
            r#"
procedures:
  build:
    observe:
      - path: prompts/observe_plan.md
      - content: "Look at the plan"
        parameters:
          depth: 2
    act: []
"#,
        );
        let proc = file.procedures.unwrap().remove("build").unwrap().normalize();

        assert_eq!(proc.observe.len(), 2);
        assert_eq!(proc.observe[0], FragmentAction::from_path("prompts/observe_plan.md"));
        assert_eq!(
            proc.observe[1],
            FragmentAction::from_content("Look at the plan").with_parameter("depth", 2)
        );
        assert!(proc.orient.is_empty());
        assert!(proc.act.is_empty());
    }

    #[test]
    fn test_mixed_generations_in_one_file() {
        let file = parse(
            r#"
procedures:
  bootstrap:
    observe: prompts/observe_bootstrap.md
  build:
    observe:
      - path: prompts/observe_plan.md
      - path: prompts/observe_specs.md
"#,
        );
        let mut procs = file.procedures.unwrap();
        let bootstrap = procs.remove("bootstrap").unwrap().normalize();
        let build = procs.remove("build").unwrap().normalize();
        assert_eq!(bootstrap.observe.len(), 1);
        assert_eq!(build.observe.len(), 2);
    }

    #[test]
    fn test_loop_section_absent_fields_stay_none() {
        let file = parse("loop:\n  failure_threshold: 5\n");
        let section = file.loop_config.unwrap();
        assert_eq!(section.failure_threshold, Some(5));
        assert!(section.default_max_iterations.is_none());
        assert!(section.iteration_mode.is_none());
    }

    #[test]
    fn test_invalid_yaml_is_parse_error() {
        let err = ConfigFile::parse("loop:\n  default_max_iterations: [invalid\n", Path::new("bad.yml")).unwrap_err();
        assert!(matches!(err, RoodaError::ConfigParse { .. }));
        assert!(err.to_string().contains("bad.yml"));
    }

    #[test]
    fn test_wrong_type_is_parse_error() {
        let result = ConfigFile::parse("loop:\n  failure_threshold: many\n", Path::new("bad.yml"));
        assert!(matches!(result, Err(RoodaError::ConfigParse { .. })));
    }

    #[test]
    fn test_unknown_top_level_key_is_parse_error() {
        let result = ConfigFile::parse("procedure:\n  x: {}\n", Path::new("typo.yml"));
        assert!(matches!(result, Err(RoodaError::ConfigParse { .. })));
    }

    #[test]
    fn test_empty_file_is_empty_config() {
        let file = parse("# nothing here\n");
        assert!(file.loop_config.is_none());
        assert!(file.procedures.is_none());
        assert!(file.ai_cmd_aliases.is_none());
    }

    #[test]
    fn test_rebase_fragment_paths() {
        let mut proc = Procedure {
            observe: vec![
                FragmentAction::from_path("prompts/a.md"),
                FragmentAction::from_path("builtin:fragments/observe/read_specs.md"),
                FragmentAction::from_path("/abs/b.md"),
                FragmentAction::from_content("inline"),
            ],
            ..Default::default()
        };
        rebase_fragment_paths(&mut proc, Path::new("/cfg"));

        assert_eq!(proc.observe[0].path.as_deref(), Some("/cfg/prompts/a.md"));
        assert_eq!(
            proc.observe[1].path.as_deref(),
            Some("builtin:fragments/observe/read_specs.md")
        );
        assert_eq!(proc.observe[2].path.as_deref(), Some("/abs/b.md"));
        assert!(proc.observe[3].path.is_none());
    }
}
