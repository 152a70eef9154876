//! Built-in prompt fragments
//!
//! Compiled into the binary from `fragments/<phase>/*.md` and addressed as
//! `builtin:fragments/<phase>/<name>.md`. Reference strings are stable.

/// Scheme prefix marking a reference to an embedded fragment.
pub const BUILTIN_PREFIX: &str = "builtin:";

macro_rules! fragments {
    ($($path:literal),* $(,)?) => {
        &[$(($path, include_str!(concat!("../../", $path)))),*]
    };
}

/// Path (relative to the crate root) to fragment text.
static FRAGMENTS: &[(&str, &str)] = fragments![
    "fragments/observe/detect_build_system.md",
    "fragments/observe/detect_work_tracking.md",
    "fragments/observe/query_work_tracking.md",
    "fragments/observe/read_agents_md.md",
    "fragments/observe/read_draft_plan.md",
    "fragments/observe/read_impl.md",
    "fragments/observe/read_specs.md",
    "fragments/observe/read_task_details.md",
    "fragments/observe/read_task_input.md",
    "fragments/observe/run_lints.md",
    "fragments/observe/run_tests.md",
    "fragments/observe/scan_repo_structure.md",
    "fragments/observe/study_agents_md.md",
    "fragments/observe/verify_commands.md",
    "fragments/orient/compare_detected_vs_documented.md",
    "fragments/orient/compare_documented_vs_actual.md",
    "fragments/orient/evaluate_against_quality_criteria.md",
    "fragments/orient/identify_affected_code.md",
    "fragments/orient/identify_affected_files.md",
    "fragments/orient/identify_affected_specs.md",
    "fragments/orient/identify_code_smells.md",
    "fragments/orient/identify_complexity_issues.md",
    "fragments/orient/identify_drift.md",
    "fragments/orient/identify_duplication.md",
    "fragments/orient/identify_implemented_but_not_specified.md",
    "fragments/orient/identify_maintenance_needs.md",
    "fragments/orient/identify_spec_deficiencies.md",
    "fragments/orient/identify_specified_but_not_implemented.md",
    "fragments/orient/identify_structural_issues.md",
    "fragments/orient/map_to_work_tracking_format.md",
    "fragments/orient/parse_plan_tasks.md",
    "fragments/orient/search_codebase.md",
    "fragments/orient/understand_bug_root_cause.md",
    "fragments/orient/understand_feature_requirements.md",
    "fragments/orient/understand_task_requirements.md",
    "fragments/decide/break_down_into_tasks.md",
    "fragments/decide/categorize_drift_severity.md",
    "fragments/decide/check_if_blocked.md",
    "fragments/decide/determine_import_strategy.md",
    "fragments/decide/determine_sections_to_update.md",
    "fragments/decide/identify_issues.md",
    "fragments/decide/pick_task.md",
    "fragments/decide/plan_implementation_approach.md",
    "fragments/decide/prioritize_findings.md",
    "fragments/decide/prioritize_gaps_by_impact.md",
    "fragments/decide/prioritize_tasks.md",
    "fragments/act/commit_changes.md",
    "fragments/act/create_work_items.md",
    "fragments/act/emit_signal.md",
    "fragments/act/emit_success.md",
    "fragments/act/modify_files.md",
    "fragments/act/run_tests.md",
    "fragments/act/update_draft_plan_status.md",
    "fragments/act/update_work_tracking.md",
    "fragments/act/write_agents_md.md",
    "fragments/act/write_audit_report.md",
    "fragments/act/write_draft_plan.md",
    "fragments/act/write_gap_report.md",
];

/// Text of an embedded fragment.
///
/// Accepts the reference with or without the `builtin:` prefix.
pub fn builtin_fragment(reference: &str) -> Option<&'static str> {
    let path = reference.strip_prefix(BUILTIN_PREFIX).unwrap_or(reference);
    FRAGMENTS
        .iter()
        .find(|(candidate, _)| *candidate == path)
        .map(|(_, text)| *text)
}

/// Every embedded fragment reference, prefix included.
pub fn builtin_fragment_refs() -> impl Iterator<Item = String> {
    FRAGMENTS.iter().map(|(path, _)| format!("{}{}", BUILTIN_PREFIX, path))
}
