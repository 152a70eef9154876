//! Procedure definitions.
//!
//! A procedure is four ordered fragment lists, one per OODA phase, plus
//! optional overrides of the loop-level settings.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{CliFlags, IterationMode};
use crate::prompt::BUILTIN_PREFIX;

/// One unit of prompt content.
///
/// At least one of `content` or `path` must be set for the action to
/// assemble. When both are set, `content` wins.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct FragmentAction {
    /// Inline prompt text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// `builtin:` reference or filesystem path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Template parameters. Empty means the text is used verbatim.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, serde_json::Value>,
}

impl FragmentAction {
    pub fn from_path(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            ..Default::default()
        }
    }

    pub fn from_content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }
}

/// The four fixed OODA phases, in prompt order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Observe,
    Orient,
    Decide,
    Act,
}

impl Phase {
    pub const ALL: [Phase; 4] = [Phase::Observe, Phase::Orient, Phase::Decide, Phase::Act];

    /// Lowercase key used in config files and flags.
    pub fn key(&self) -> &'static str {
        match self {
            Phase::Observe => "observe",
            Phase::Orient => "orient",
            Phase::Decide => "decide",
            Phase::Act => "act",
        }
    }

    /// Uppercase label used in prompt section headers.
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Observe => "OBSERVE",
            Phase::Orient => "ORIENT",
            Phase::Decide => "DECIDE",
            Phase::Act => "ACT",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A named unit of work in canonical form.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Procedure {
    pub display: String,
    pub summary: String,
    pub description: String,

    pub observe: Vec<FragmentAction>,
    pub orient: Vec<FragmentAction>,
    pub decide: Vec<FragmentAction>,
    pub act: Vec<FragmentAction>,

    /// `None` inherits `loop.iteration_mode`.
    pub iteration_mode: Option<IterationMode>,
    /// `None` inherits; >= 1 when set.
    pub default_max_iterations: Option<u32>,
    /// Seconds. `None` inherits; >= 1 when set.
    pub iteration_timeout: Option<u64>,
    /// Bytes. `None` inherits; >= 1024 when set.
    pub max_output_buffer: Option<usize>,
    pub ai_cmd: Option<String>,
    pub ai_cmd_alias: Option<String>,
}

impl Procedure {
    pub fn fragments(&self, phase: Phase) -> &[FragmentAction] {
        match phase {
            Phase::Observe => &self.observe,
            Phase::Orient => &self.orient,
            Phase::Decide => &self.decide,
            Phase::Act => &self.act,
        }
    }

    pub fn fragments_mut(&mut self, phase: Phase) -> &mut Vec<FragmentAction> {
        match phase {
            Phase::Observe => &mut self.observe,
            Phase::Orient => &mut self.orient,
            Phase::Decide => &mut self.decide,
            Phase::Act => &mut self.act,
        }
    }

    /// Short text for listings: summary, else description.
    pub fn blurb(&self) -> &str {
        if !self.summary.is_empty() {
            &self.summary
        } else {
            &self.description
        }
    }

    /// Replace each phase the CLI supplied fragments for.
    ///
    /// A value is a path reference if it has the `builtin:` prefix or names an
    /// existing file under `base_dir`; anything else is inline content.
    pub fn with_phase_overrides(mut self, flags: &CliFlags, base_dir: &Path) -> Self {
        for phase in Phase::ALL {
            let values = flags.phase_fragments(phase);
            if values.is_empty() {
                continue;
            }
            log::debug!("Replacing {} phase with {} fragment(s) from flags", phase, values.len());
            *self.fragments_mut(phase) = values
                .iter()
                .map(|value| {
                    if value.starts_with(BUILTIN_PREFIX) || base_dir.join(value).is_file() {
                        FragmentAction::from_path(value.clone())
                    } else {
                        FragmentAction::from_content(value.clone())
                    }
                })
                .collect();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_phase_order_and_labels() {
        let labels: Vec<_> = Phase::ALL.iter().map(|p| p.label()).collect();
        assert_eq!(labels, vec!["OBSERVE", "ORIENT", "DECIDE", "ACT"]);
        assert_eq!(Phase::Decide.key(), "decide");
    }

    #[test]
    fn test_fragment_action_yaml() {
        let yaml = r#"
content: "Hello {{name}}"
parameters:
  name: World
  count: 3
"#;
        let action: FragmentAction = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(action.content.as_deref(), Some("Hello {{name}}"));
        assert!(action.path.is_none());
        assert_eq!(action.parameters["name"], serde_json::json!("World"));
        assert_eq!(action.parameters["count"], serde_json::json!(3));
    }

    #[test]
    fn test_fragment_action_rejects_unknown_field() {
        let result: Result<FragmentAction, _> = serde_yaml::from_str("pth: typo.md");
        assert!(result.is_err());
    }

    #[test]
    fn test_blurb_prefers_summary() {
        let mut proc = Procedure {
            description: "Long description".to_string(),
            ..Default::default()
        };
        assert_eq!(proc.blurb(), "Long description");
        proc.summary = "Short".to_string();
        assert_eq!(proc.blurb(), "Short");
    }

    #[test]
    fn test_phase_overrides_replace_only_given_phases() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("custom.md"), "# Custom").unwrap();

        let proc = Procedure {
            observe: vec![FragmentAction::from_path("builtin:fragments/observe/read_specs.md")],
            act: vec![FragmentAction::from_content("original act")],
            ..Default::default()
        };
        let flags = CliFlags {
            observe: vec![
                "custom.md".to_string(),
                "builtin:fragments/observe/read_impl.md".to_string(),
                "just look around".to_string(),
            ],
            ..Default::default()
        };

        let proc = proc.with_phase_overrides(&flags, temp_dir.path());
        assert_eq!(
            proc.observe,
            vec![
                FragmentAction::from_path("custom.md"),
                FragmentAction::from_path("builtin:fragments/observe/read_impl.md"),
                FragmentAction::from_content("just look around"),
            ]
        );
        assert_eq!(proc.act, vec![FragmentAction::from_content("original act")]);
    }
}
