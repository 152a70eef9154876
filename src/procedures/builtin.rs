//! The built-in procedure set.
//!
//! Each procedure lists fragment names per phase; `fragments/<phase>/<name>.md`
//! must exist in the embedded fragment table.

use std::collections::BTreeMap;

use crate::config::{FragmentAction, Phase, Procedure};
use crate::prompt::BUILTIN_PREFIX;

/// Fragment names for each phase, in order.
struct Phases<'a> {
    observe: &'a [&'a str],
    orient: &'a [&'a str],
    decide: &'a [&'a str],
    act: &'a [&'a str],
}

fn builtin_refs(phase: Phase, names: &[&str]) -> Vec<FragmentAction> {
    names
        .iter()
        .map(|name| FragmentAction::from_path(format!("{}fragments/{}/{}.md", BUILTIN_PREFIX, phase.key(), name)))
        .collect()
}

fn procedure(display: &str, summary: &str, description: &str, phases: Phases<'_>) -> Procedure {
    Procedure {
        display: display.to_string(),
        summary: summary.to_string(),
        description: description.to_string(),
        observe: builtin_refs(Phase::Observe, phases.observe),
        orient: builtin_refs(Phase::Orient, phases.orient),
        decide: builtin_refs(Phase::Decide, phases.decide),
        act: builtin_refs(Phase::Act, phases.act),
        ..Default::default()
    }
}

const PLAN_DECIDE: &[&str] = &["break_down_into_tasks", "prioritize_tasks", "check_if_blocked"];
const PLAN_ACT: &[&str] = &["write_draft_plan", "emit_success"];
const AUDIT_DECIDE: &[&str] = &["identify_issues", "prioritize_findings"];
const REPORT_ACT: &[&str] = &["write_audit_report", "emit_success"];
const GAP_ACT: &[&str] = &["write_gap_report", "emit_success"];

/// All built-in procedures by name.
pub fn builtin_procedures() -> BTreeMap<String, Procedure> {
    let mut procedures = BTreeMap::new();
    let mut add = |name: &str, procedure: Procedure| {
        procedures.insert(name.to_string(), procedure);
    };

    add(
        "agents-sync",
        procedure(
            "Agents Sync",
            "Synchronize AGENTS.md with actual repository state",
            "Detects drift between documented and actual repository configuration, then updates AGENTS.md to match reality",
            Phases {
                observe: &[
                    "read_agents_md",
                    "scan_repo_structure",
                    "detect_build_system",
                    "detect_work_tracking",
                ],
                orient: &["compare_detected_vs_documented", "identify_drift"],
                decide: &["determine_sections_to_update", "check_if_blocked"],
                act: &["write_agents_md", "commit_changes", "emit_success"],
            },
        ),
    );

    add(
        "build",
        procedure(
            "Build",
            "Implement a task from work tracking",
            "Picks a ready task, implements it, runs tests, and marks it complete",
            Phases {
                observe: &[
                    "read_agents_md",
                    "query_work_tracking",
                    "read_specs",
                    "read_impl",
                    "read_task_details",
                ],
                orient: &[
                    "understand_task_requirements",
                    "search_codebase",
                    "identify_affected_files",
                ],
                decide: &["pick_task", "plan_implementation_approach", "check_if_blocked"],
                act: &[
                    "modify_files",
                    "run_tests",
                    "update_work_tracking",
                    "commit_changes",
                    "emit_success",
                ],
            },
        ),
    );

    add(
        "publish-plan",
        procedure(
            "Publish Plan",
            "Import draft plan into work tracking system",
            "Takes a draft plan and creates work items in the configured work tracking system",
            Phases {
                observe: &["read_agents_md", "read_draft_plan", "query_work_tracking"],
                orient: &["parse_plan_tasks", "map_to_work_tracking_format"],
                decide: &["determine_import_strategy", "check_if_blocked"],
                act: &["create_work_items", "update_draft_plan_status", "emit_success"],
            },
        ),
    );

    add(
        "audit-spec",
        procedure(
            "Audit Specifications",
            "Audit specification files for quality issues",
            "Reviews spec files against quality criteria and generates audit report",
            Phases {
                observe: &["read_agents_md", "read_specs"],
                orient: &["evaluate_against_quality_criteria"],
                decide: AUDIT_DECIDE,
                act: REPORT_ACT,
            },
        ),
    );

    add(
        "audit-impl",
        procedure(
            "Audit Implementation",
            "Audit implementation files for quality issues",
            "Reviews implementation files, runs tests and lints, generates audit report",
            Phases {
                observe: &["read_agents_md", "read_impl", "run_tests", "run_lints"],
                orient: &["evaluate_against_quality_criteria"],
                decide: AUDIT_DECIDE,
                act: REPORT_ACT,
            },
        ),
    );

    add(
        "audit-agents",
        procedure(
            "Audit Agents Configuration",
            "Audit AGENTS.md for accuracy and completeness",
            "Verifies AGENTS.md matches repository state and commands work correctly",
            Phases {
                observe: &[
                    "read_agents_md",
                    "scan_repo_structure",
                    "detect_build_system",
                    "verify_commands",
                ],
                orient: &["compare_documented_vs_actual", "identify_drift"],
                decide: &["categorize_drift_severity"],
                act: REPORT_ACT,
            },
        ),
    );

    add(
        "audit-spec-to-impl",
        procedure(
            "Audit Spec to Implementation Gap",
            "Find specifications not implemented in code",
            "Identifies features specified but not yet implemented",
            Phases {
                observe: &["read_agents_md", "read_specs", "read_impl"],
                orient: &["identify_specified_but_not_implemented"],
                decide: &["prioritize_gaps_by_impact"],
                act: GAP_ACT,
            },
        ),
    );

    add(
        "audit-impl-to-spec",
        procedure(
            "Audit Implementation to Spec Gap",
            "Find implementation not covered by specifications",
            "Identifies code that exists but is not documented in specifications",
            Phases {
                observe: &["read_agents_md", "read_impl", "read_specs"],
                orient: &["identify_implemented_but_not_specified"],
                decide: &["prioritize_gaps_by_impact"],
                act: GAP_ACT,
            },
        ),
    );

    add(
        "draft-plan-spec-feat",
        procedure(
            "Draft Plan: Spec Feature",
            "Create plan for new specification feature",
            "Analyzes feature requirements and creates implementation plan focused on specifications",
            Phases {
                observe: &["read_agents_md", "read_task_input", "read_specs", "read_impl"],
                orient: &["understand_feature_requirements", "identify_affected_specs"],
                decide: PLAN_DECIDE,
                act: PLAN_ACT,
            },
        ),
    );

    add(
        "draft-plan-spec-fix",
        procedure(
            "Draft Plan: Spec Bug Fix",
            "Create plan for specification bug fix",
            "Analyzes bug root cause and creates fix plan focused on specifications",
            Phases {
                observe: &["read_agents_md", "read_task_input", "read_specs", "read_impl"],
                orient: &["understand_bug_root_cause", "identify_spec_deficiencies"],
                decide: PLAN_DECIDE,
                act: PLAN_ACT,
            },
        ),
    );

    add(
        "draft-plan-spec-refactor",
        procedure(
            "Draft Plan: Spec Refactor",
            "Create plan for specification refactoring",
            "Identifies structural issues in specs and creates refactoring plan",
            Phases {
                observe: &["read_agents_md", "read_task_input", "read_specs"],
                orient: &["identify_structural_issues", "identify_duplication"],
                decide: PLAN_DECIDE,
                act: PLAN_ACT,
            },
        ),
    );

    add(
        "draft-plan-spec-chore",
        procedure(
            "Draft Plan: Spec Maintenance",
            "Create plan for specification maintenance tasks",
            "Identifies maintenance needs in specs and creates chore plan",
            Phases {
                observe: &["read_agents_md", "read_task_input", "read_specs"],
                orient: &["identify_maintenance_needs"],
                decide: PLAN_DECIDE,
                act: PLAN_ACT,
            },
        ),
    );

    add(
        "draft-plan-impl-feat",
        procedure(
            "Draft Plan: Implementation Feature",
            "Create plan for new implementation feature",
            "Analyzes feature requirements and creates implementation plan focused on code",
            Phases {
                observe: &["read_agents_md", "read_task_input", "read_specs", "read_impl"],
                orient: &["understand_feature_requirements", "identify_affected_code"],
                decide: PLAN_DECIDE,
                act: PLAN_ACT,
            },
        ),
    );

    add(
        "draft-plan-impl-fix",
        procedure(
            "Draft Plan: Implementation Bug Fix",
            "Create plan for implementation bug fix",
            "Analyzes bug root cause and creates fix plan focused on code",
            Phases {
                observe: &["read_agents_md", "read_task_input", "read_specs", "read_impl"],
                orient: &["understand_bug_root_cause", "identify_affected_code"],
                decide: PLAN_DECIDE,
                act: PLAN_ACT,
            },
        ),
    );

    add(
        "draft-plan-impl-refactor",
        procedure(
            "Draft Plan: Implementation Refactor",
            "Create plan for code refactoring",
            "Identifies code smells and complexity issues, creates refactoring plan",
            Phases {
                observe: &["read_agents_md", "read_task_input", "read_impl"],
                orient: &["identify_code_smells", "identify_complexity_issues"],
                decide: PLAN_DECIDE,
                act: PLAN_ACT,
            },
        ),
    );

    add(
        "draft-plan-impl-chore",
        procedure(
            "Draft Plan: Implementation Maintenance",
            "Create plan for code maintenance tasks",
            "Identifies maintenance needs in code and creates chore plan",
            Phases {
                observe: &["read_agents_md", "read_task_input", "read_impl"],
                orient: &["identify_maintenance_needs"],
                decide: PLAN_DECIDE,
                act: PLAN_ACT,
            },
        ),
    );

    procedures
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::{assemble_prompt, builtin_fragment};
    use std::path::Path;

    #[test]
    fn test_sixteen_procedures() {
        let procedures = builtin_procedures();
        assert_eq!(procedures.len(), 16);
        for name in [
            "agents-sync",
            "build",
            "publish-plan",
            "audit-spec",
            "audit-impl",
            "audit-agents",
            "audit-spec-to-impl",
            "audit-impl-to-spec",
            "draft-plan-spec-feat",
            "draft-plan-spec-fix",
            "draft-plan-spec-refactor",
            "draft-plan-spec-chore",
            "draft-plan-impl-feat",
            "draft-plan-impl-fix",
            "draft-plan-impl-refactor",
            "draft-plan-impl-chore",
        ] {
            assert!(procedures.contains_key(name), "missing {}", name);
        }
    }

    #[test]
    fn test_every_reference_is_embedded() {
        for (name, procedure) in builtin_procedures() {
            for phase in Phase::ALL {
                for action in procedure.fragments(phase) {
                    let path = action.path.as_deref().unwrap();
                    assert!(builtin_fragment(path).is_some(), "{}: {} not embedded", name, path);
                }
            }
        }
    }

    #[test]
    fn test_every_procedure_assembles() {
        for (name, procedure) in builtin_procedures() {
            let prompt = assemble_prompt(&procedure, "", Path::new(".")).unwrap();
            for phase in Phase::ALL {
                assert!(
                    prompt.contains(&format!("=== {} ===", phase.label())),
                    "{} missing {} section",
                    name,
                    phase.label()
                );
            }
            assert!(prompt.contains("<promise>SUCCESS</promise>"), "{} never asks for a signal", name);
        }
    }

    #[test]
    fn test_build_procedure_shape() {
        let procedures = builtin_procedures();
        let build = &procedures["build"];
        assert_eq!(build.display, "Build");
        assert_eq!(build.observe.len(), 5);
        assert_eq!(
            build.act.last().and_then(|a| a.path.as_deref()),
            Some("builtin:fragments/act/emit_success.md")
        );
        assert!(build.ai_cmd.is_none());
        assert!(build.default_max_iterations.is_none());
    }
}
