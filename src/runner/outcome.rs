//! Iteration outcome classification.
//!
//! Decision table, first matching row wins:
//!
//! | failure marker | success marker | exit code | outcome  |
//! |----------------|----------------|-----------|----------|
//! | yes            | any            | any       | failure  |
//! | no             | yes            | any       | job-done |
//! | no             | no             | 0         | success  |
//! | no             | no             | nonzero   | failure  |

use std::fmt;

/// Marker the AI emits when the whole job is done.
pub const SUCCESS_SIGNAL: &str = "<promise>SUCCESS</promise>";

/// Marker the AI emits when it is blocked.
pub const FAILURE_SIGNAL: &str = "<promise>FAILURE</promise>";

/// What one AI command execution produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IterationResult {
    pub exit_code: i32,
    /// Combined stdout and stderr.
    pub output: String,
}

impl IterationResult {
    pub fn new(exit_code: i32, output: impl Into<String>) -> Self {
        Self {
            exit_code,
            output: output.into(),
        }
    }
}

/// Outcome of one iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IterationOutcome {
    /// Iteration finished cleanly; the loop continues
    Success,
    /// AI signalled the whole job is done; the loop stops successfully
    JobDone,
    /// Iteration failed; counts toward the failure threshold
    Failure,
}

impl IterationOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            IterationOutcome::Success => "success",
            IterationOutcome::JobDone => "job-done",
            IterationOutcome::Failure => "failure",
        }
    }

    /// Whether the loop should stop after this outcome regardless of limits.
    pub fn is_terminal(&self) -> bool {
        matches!(self, IterationOutcome::JobDone)
    }
}

impl fmt::Display for IterationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify one execution.
pub fn classify(result: &IterationResult) -> IterationOutcome {
    if result.output.contains(FAILURE_SIGNAL) {
        IterationOutcome::Failure
    } else if result.output.contains(SUCCESS_SIGNAL) {
        IterationOutcome::JobDone
    } else if result.exit_code == 0 {
        IterationOutcome::Success
    } else {
        IterationOutcome::Failure
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_exit_no_signal_is_success() {
        assert_eq!(classify(&IterationResult::new(0, "did some work")), IterationOutcome::Success);
    }

    #[test]
    fn test_success_signal_is_job_done() {
        let result = IterationResult::new(0, format!("all done\n{}\n", SUCCESS_SIGNAL));
        assert_eq!(classify(&result), IterationOutcome::JobDone);
    }

    #[test]
    fn test_success_signal_overrides_nonzero_exit() {
        let result = IterationResult::new(1, SUCCESS_SIGNAL);
        assert_eq!(classify(&result), IterationOutcome::JobDone);
    }

    #[test]
    fn test_failure_signal_with_clean_exit() {
        let result = IterationResult::new(0, format!("blocked: missing input {}", FAILURE_SIGNAL));
        assert_eq!(classify(&result), IterationOutcome::Failure);
    }

    #[test]
    fn test_failure_wins_over_success() {
        let output = format!("{}\n{}", SUCCESS_SIGNAL, FAILURE_SIGNAL);
        for exit_code in [0, 1, 137] {
            assert_eq!(
                classify(&IterationResult::new(exit_code, output.clone())),
                IterationOutcome::Failure
            );
        }
    }

    #[test]
    fn test_nonzero_exit_no_signal_is_failure() {
        assert_eq!(classify(&IterationResult::new(2, "")), IterationOutcome::Failure);
    }

    #[test]
    fn test_partial_marker_is_not_a_signal() {
        assert_eq!(
            classify(&IterationResult::new(0, "<promise>SUCCESS")),
            IterationOutcome::Success
        );
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(IterationOutcome::Success.to_string(), "success");
        assert_eq!(IterationOutcome::JobDone.to_string(), "job-done");
        assert_eq!(IterationOutcome::Failure.to_string(), "failure");
        assert!(IterationOutcome::JobDone.is_terminal());
        assert!(!IterationOutcome::Failure.is_terminal());
    }
}
