//! Runner module - classifies the result of one AI command execution.
//!
//! The loop driver that spawns the AI command lives outside the library; it
//! feeds each execution's exit code and output through [`classify`].

mod outcome;

pub use outcome::{FAILURE_SIGNAL, IterationOutcome, IterationResult, SUCCESS_SIGNAL, classify};
